//! Descriptor resolution.
//!
//! [`resolve`] substitutes captured type parameters into a descriptor,
//! producing the concrete descriptor a codec registry is keyed by.
//! [`synthesize`] is the inverse direction: given a runtime value, produce
//! the descriptor its shape implies, which is how the `any` codec selects
//! behavior.

use crate::bindings::Bindings;
use crate::descriptor::{Shape, TypeDescriptor};
use crate::value::Value;

/// Substitute capture bindings into a descriptor.
///
/// Type variables resolve through the bindings, following chained bindings
/// (a parameter bound to another parameter) to a fixpoint. An unbound type
/// variable is returned unchanged — deferred resolution, valid only inside
/// a generic context. Record descriptors are left intact: fields containing
/// type variables resolve at processing time, under the bindings the
/// enclosing generic pushes.
pub fn resolve(descriptor: &TypeDescriptor, bindings: &Bindings<'_>) -> TypeDescriptor {
    let metadata = descriptor.metadata().to_vec();
    let resolved = match descriptor.shape() {
        Shape::TypeVar(name) => {
            let mut current = name.as_str();
            let mut seen = vec![current];
            loop {
                match bindings.lookup(current) {
                    Some(bound) => match bound.shape() {
                        Shape::TypeVar(next) if !seen.contains(&next.as_str()) => {
                            seen.push(next.as_str());
                            current = next.as_str();
                        }
                        _ => return bound.clone().with_metadata(metadata),
                    },
                    None => return TypeDescriptor::type_var(current).with_metadata(metadata),
                }
            }
        }
        Shape::Optional(inner) => TypeDescriptor::optional(resolve(inner, bindings)),
        Shape::Union(alternatives) => {
            TypeDescriptor::union(alternatives.iter().map(|a| resolve(a, bindings)))
        }
        Shape::Tuple(elements) => {
            TypeDescriptor::tuple(elements.iter().map(|e| resolve(e, bindings)))
        }
        Shape::TupleVariadic(element) => {
            TypeDescriptor::variadic_tuple(resolve(element, bindings))
        }
        Shape::Sequence(element) => TypeDescriptor::sequence(resolve(element, bindings)),
        Shape::Set(element) => TypeDescriptor::set(resolve(element, bindings)),
        Shape::Mapping(key, value) => {
            TypeDescriptor::mapping(resolve(key, bindings), resolve(value, bindings))
        }
        Shape::Generic { origin, args } => {
            TypeDescriptor::generic(origin.clone(), args.iter().map(|a| resolve(a, bindings)))
        }
        Shape::Scalar(_) | Shape::Literal(_) | Shape::Record(_) | Shape::Any => {
            descriptor.bare()
        }
    };
    // The TypeVar arm returned above; every other arm re-attaches metadata.
    resolved.with_metadata(metadata)
}

/// The descriptor implied by a runtime value's shape.
///
/// Containers synthesize open element types (`any`), and records synthesize
/// as open string-keyed mappings: a bare field map carries no nominal type
/// to recover.
pub fn synthesize(value: &Value) -> TypeDescriptor {
    match value {
        Value::Null => TypeDescriptor::null(),
        Value::Bool(_) => TypeDescriptor::bool(),
        Value::Int(_) => TypeDescriptor::int(),
        Value::Float(_) => TypeDescriptor::float(),
        Value::Decimal(_) => TypeDescriptor::decimal(),
        Value::Str(_) => TypeDescriptor::str(),
        Value::Bytes(_) => TypeDescriptor::bytes(),
        Value::Date(_) => TypeDescriptor::date(),
        Value::DateTime(_) => TypeDescriptor::datetime(),
        Value::Uuid(_) => TypeDescriptor::uuid(),
        Value::List(_) => TypeDescriptor::sequence(TypeDescriptor::any()),
        Value::Tuple(_) => TypeDescriptor::variadic_tuple(TypeDescriptor::any()),
        Value::Set(_) => TypeDescriptor::set(TypeDescriptor::any()),
        Value::Map(_) | Value::Record(_) => {
            TypeDescriptor::mapping(TypeDescriptor::str(), TypeDescriptor::any())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::Frame;

    #[test]
    fn unbound_typevar_is_deferred() {
        let t = TypeDescriptor::type_var("T");
        assert_eq!(resolve(&t, &Bindings::root()), t);
    }

    #[test]
    fn bound_typevar_substitutes() {
        let frame: Frame = vec![("T".to_string(), TypeDescriptor::int())];
        let root = Bindings::root();
        let ctx = root.nested(&frame);
        assert_eq!(
            resolve(&TypeDescriptor::type_var("T"), &ctx),
            TypeDescriptor::int()
        );
    }

    #[test]
    fn substitution_reaches_nested_args() {
        let frame: Frame = vec![("T".to_string(), TypeDescriptor::str())];
        let root = Bindings::root();
        let ctx = root.nested(&frame);
        let desc = TypeDescriptor::sequence(TypeDescriptor::optional(
            TypeDescriptor::type_var("T"),
        ));
        assert_eq!(
            resolve(&desc, &ctx),
            TypeDescriptor::sequence(TypeDescriptor::optional(TypeDescriptor::str()))
        );
    }

    #[test]
    fn chained_bindings_resolve_to_fixpoint() {
        let frame: Frame = vec![
            ("T".to_string(), TypeDescriptor::type_var("U")),
            ("U".to_string(), TypeDescriptor::bool()),
        ];
        let root = Bindings::root();
        let ctx = root.nested(&frame);
        assert_eq!(
            resolve(&TypeDescriptor::type_var("T"), &ctx),
            TypeDescriptor::bool()
        );
    }

    #[test]
    fn synthesized_scalars() {
        assert_eq!(synthesize(&Value::Int(1)), TypeDescriptor::int());
        assert_eq!(
            synthesize(&Value::list([Value::Int(1)])),
            TypeDescriptor::sequence(TypeDescriptor::any())
        );
    }
}
