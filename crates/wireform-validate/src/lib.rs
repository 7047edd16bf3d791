//! # Wireform validation
//!
//! Structural validation of dynamic values against type descriptors. The
//! validator walks the same shape taxonomy as the codec engine — the two
//! are kept in lock-step deliberately, so a change to one shape's
//! semantics must be mirrored in the other — but is independent of any
//! wire representation.
//!
//! Validation stops at the first violation and reports it with a
//! root-to-leaf path. Constraint annotations (`MinLen`, `MaxLen`,
//! `MinValue`, `MaxValue`, `Pattern`) are enforced after the value's shape
//! is confirmed.

use wireform_schema::{
    Annotation, Bindings, ScalarKind, Shape, TypeDescriptor, ValidationError, Value, resolve,
};

/// Validate a value against a descriptor outside any generic context.
pub fn validate(value: &Value, descriptor: &TypeDescriptor) -> Result<(), ValidationError> {
    validate_with(value, descriptor, &Bindings::root())
}

/// Validate a value under capture bindings, as generic codecs do.
pub fn validate_with(
    value: &Value,
    descriptor: &TypeDescriptor,
    bindings: &Bindings<'_>,
) -> Result<(), ValidationError> {
    validate_shape(value, descriptor, bindings)?;
    validate_constraints(value, descriptor)
}

fn validate_shape(
    value: &Value,
    descriptor: &TypeDescriptor,
    bindings: &Bindings<'_>,
) -> Result<(), ValidationError> {
    match descriptor.shape() {
        Shape::Any => Ok(()),

        Shape::Scalar(kind) => match ScalarKind::of(value) {
            Some(actual) if actual == *kind => Ok(()),
            _ => Err(ValidationError::mismatch(kind.name(), value)),
        },

        Shape::Optional(inner) => {
            if value.is_null() {
                Ok(())
            } else {
                validate_with(value, inner, bindings)
            }
        }

        Shape::Union(alternatives) => {
            // First-match, like the union codec: a failed branch is a
            // local event, not an error.
            for alternative in alternatives {
                if validate_with(value, alternative, bindings).is_ok() {
                    return Ok(());
                }
            }
            Err(ValidationError::mismatch("a union alternative", value))
        }

        Shape::Literal(members) => {
            // Membership is kind-sensitive: Int(1) never satisfies a
            // Bool(true) member.
            if members.contains(value) {
                Ok(())
            } else {
                Err(ValidationError::mismatch("a literal member", value))
            }
        }

        Shape::Tuple(elements) => {
            let Value::Tuple(items) = value else {
                return Err(ValidationError::mismatch("tuple", value));
            };
            if items.len() != elements.len() {
                return Err(ValidationError::new(format!(
                    "expecting {} elements; received {}",
                    elements.len(),
                    items.len()
                )));
            }
            for (index, (item, element)) in items.iter().zip(elements).enumerate() {
                validate_with(item, element, bindings).map_err(|e| e.in_index(index))?;
            }
            Ok(())
        }

        Shape::TupleVariadic(element) => {
            let Value::Tuple(items) = value else {
                return Err(ValidationError::mismatch("tuple", value));
            };
            for (index, item) in items.iter().enumerate() {
                validate_with(item, element, bindings).map_err(|e| e.in_index(index))?;
            }
            Ok(())
        }

        Shape::Sequence(element) => {
            let Value::List(items) = value else {
                return Err(ValidationError::mismatch("sequence", value));
            };
            for (index, item) in items.iter().enumerate() {
                validate_with(item, element, bindings).map_err(|e| e.in_index(index))?;
            }
            Ok(())
        }

        Shape::Set(element) => {
            let Value::Set(items) = value else {
                return Err(ValidationError::mismatch("set", value));
            };
            for (index, item) in items.iter().enumerate() {
                validate_with(item, element, bindings).map_err(|e| e.in_index(index))?;
            }
            Ok(())
        }

        Shape::Mapping(key_type, value_type) => {
            let Value::Map(entries) = value else {
                return Err(ValidationError::mismatch("mapping", value));
            };
            for (key, item) in entries {
                let rendered = render_key(key);
                validate_with(key, key_type, bindings).map_err(|e| {
                    ValidationError::new(format!(
                        "invalid mapping key: {}",
                        e.message().unwrap_or("wrong shape")
                    ))
                    .in_key(rendered.clone())
                })?;
                validate_with(item, value_type, bindings)
                    .map_err(|e| e.in_key(rendered))?;
            }
            Ok(())
        }

        Shape::Record(record) => {
            let Value::Record(entries) = value else {
                return Err(ValidationError::mismatch("record", value));
            };
            let fields = record.defined_fields().map_err(|e| {
                ValidationError::new(e.to_string())
            })?;
            for field in fields {
                match entries.get(field.name()) {
                    Some(item) => {
                        validate_with(item, field.descriptor(), bindings)
                            .map_err(|e| e.in_field(field.name().to_string()))?;
                    }
                    None if field.is_optional() => {}
                    None => {
                        return Err(ValidationError::new("missing required field")
                            .in_field(field.name().to_string()));
                    }
                }
            }
            Ok(())
        }

        Shape::Generic { origin, args } => {
            if origin.params().len() != args.len() {
                return Err(ValidationError::new(format!(
                    "generic {} takes {} type arguments; received {}",
                    origin.name(),
                    origin.params().len(),
                    args.len()
                )));
            }
            let frame: Vec<(String, TypeDescriptor)> = origin
                .params()
                .iter()
                .cloned()
                .zip(args.iter().map(|arg| resolve(arg, bindings)))
                .collect();
            let nested = bindings.nested(&frame);
            validate_shape(value, &TypeDescriptor::record(origin.clone()), &nested)
        }

        Shape::TypeVar(_) => {
            let target = resolve(descriptor, bindings);
            match target.shape() {
                // Unbound parameters validate as `any`, mirroring codecs.
                Shape::TypeVar(_) => Ok(()),
                _ => validate_with(value, &target, bindings),
            }
        }
    }
}

fn validate_constraints(
    value: &Value,
    descriptor: &TypeDescriptor,
) -> Result<(), ValidationError> {
    for annotation in descriptor.metadata() {
        match annotation {
            Annotation::MinLen(min) => {
                let length = sized(value)?;
                if length < *min {
                    return Err(ValidationError::new(format!("minimum length: {min}")));
                }
            }
            Annotation::MaxLen(max) => {
                let length = sized(value)?;
                if length > *max {
                    return Err(ValidationError::new(format!("maximum length: {max}")));
                }
            }
            Annotation::MinValue(min) => {
                if compare(value, min)?.is_lt() {
                    return Err(ValidationError::new(format!(
                        "minimum value: {}",
                        render_key(min)
                    )));
                }
            }
            Annotation::MaxValue(max) => {
                if compare(value, max)?.is_gt() {
                    return Err(ValidationError::new(format!(
                        "maximum value: {}",
                        render_key(max)
                    )));
                }
            }
            Annotation::Pattern(pattern) => {
                let Value::Str(text) = value else {
                    return Err(ValidationError::mismatch("str for pattern match", value));
                };
                if !pattern.is_match(text) {
                    return Err(ValidationError::new(format!(
                        "does not match pattern: {}",
                        pattern.as_str()
                    )));
                }
            }
            Annotation::Description(_) | Annotation::Example(_) | Annotation::Deprecated => {}
        }
    }
    Ok(())
}

fn sized(value: &Value) -> Result<usize, ValidationError> {
    value
        .length()
        .ok_or_else(|| ValidationError::mismatch("a sized value", value))
}

fn compare(value: &Value, bound: &Value) -> Result<std::cmp::Ordering, ValidationError> {
    // Bounds only compare within one scalar kind; comparing an int to a
    // string bound is a declaration error surfaced at validation time.
    if ScalarKind::of(value) != ScalarKind::of(bound) || ScalarKind::of(value).is_none() {
        return Err(ValidationError::mismatch(
            &format!("a {} comparable with its bound", bound.kind_name()),
            value,
        ));
    }
    Ok(value.cmp(bound))
}

/// Plain rendering of a scalar for paths and messages.
fn render_key(value: &Value) -> String {
    match value {
        Value::Str(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Decimal(d) => d.to_string(),
        Value::Date(d) => d.to_string(),
        Value::DateTime(d) => d.to_rfc3339(),
        Value::Uuid(u) => u.to_string(),
        other => other.kind_name().to_string(),
    }
}
