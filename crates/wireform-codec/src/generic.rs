//! Generic instantiation and type-variable codecs.
//!
//! `Page<T>` encodes by binding `T` to its concrete argument in a capture
//! frame and delegating to the unparameterized `Page` record codec, whose
//! type-variable fields resolve through that frame at processing time.
//! Frames are pushed for exactly one call and shadow outer frames, so
//! nested generics never leak bindings across sibling subtrees.

use crate::engine::Engine;
use crate::registry::ChildCodec;
use crate::wire::{Codec, Wire};
use std::sync::Arc;
use wireform_schema::{
    Bindings, DecodeError, EncodeError, Frame, RecordType, TypeDescriptor, Value, resolve,
};

pub struct GenericCodec<W: Wire> {
    origin: Arc<RecordType>,
    args: Vec<TypeDescriptor>,
    origin_codec: ChildCodec<W>,
}

impl<W: Wire> GenericCodec<W> {
    pub fn new(engine: &Engine, origin: Arc<RecordType>, args: Vec<TypeDescriptor>) -> Self {
        let origin_codec = ChildCodec::new(engine, TypeDescriptor::record(origin.clone()));
        Self {
            origin,
            args,
            origin_codec,
        }
    }

    /// The capture frame for one call: formal parameters bound to the
    /// arguments, with the arguments themselves resolved against the
    /// enclosing bindings first (an argument may be an outer parameter).
    fn frame(&self, bindings: &Bindings<'_>) -> Frame {
        self.origin
            .params()
            .iter()
            .cloned()
            .zip(self.args.iter().map(|arg| resolve(arg, bindings)))
            .collect()
    }
}

impl<W: Wire> Codec<W> for GenericCodec<W> {
    fn encode(&self, value: &Value, bindings: &Bindings<'_>) -> Result<W::Repr, EncodeError> {
        let frame = self.frame(bindings);
        let nested = bindings.nested(&frame);
        self.origin_codec.encode(value, &nested)
    }

    fn decode(&self, repr: W::Repr, bindings: &Bindings<'_>) -> Result<Value, DecodeError> {
        let frame = self.frame(bindings);
        let nested = bindings.nested(&frame);
        self.origin_codec.decode(repr, &nested)
    }

    fn content_type(&self) -> &'static str {
        self.origin_codec
            .content_type()
            .unwrap_or(W::DEFAULT_CONTENT_TYPE)
    }
}

/// Codec for an open type parameter.
///
/// The binding is looked up at call time; an unbound parameter degrades to
/// the `any` codec, mirroring the resolver's documented fallback.
pub struct TypeVarCodec<W: Wire> {
    name: String,
    engine: Engine,
    _wire: std::marker::PhantomData<fn() -> W>,
}

impl<W: Wire> TypeVarCodec<W> {
    pub fn new(engine: &Engine, name: String) -> Self {
        Self {
            name,
            engine: engine.clone(),
            _wire: std::marker::PhantomData,
        }
    }

    fn target(&self, bindings: &Bindings<'_>) -> TypeDescriptor {
        let resolved = resolve(&TypeDescriptor::type_var(self.name.clone()), bindings);
        match resolved.shape() {
            wireform_schema::Shape::TypeVar(_) => TypeDescriptor::any(),
            _ => resolved,
        }
    }
}

impl<W: Wire> Codec<W> for TypeVarCodec<W> {
    fn encode(&self, value: &Value, bindings: &Bindings<'_>) -> Result<W::Repr, EncodeError> {
        let target = self.target(bindings);
        let codec = self
            .engine
            .codec::<W>(&target)
            .map_err(|err| EncodeError::new(err.to_string()))?;
        codec.encode(value, bindings)
    }

    fn decode(&self, repr: W::Repr, bindings: &Bindings<'_>) -> Result<Value, DecodeError> {
        let target = self.target(bindings);
        let codec = self
            .engine
            .codec::<W>(&target)
            .map_err(|err| DecodeError::new(err.to_string()))?;
        codec.decode(repr, bindings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wireform_schema::Field;

    fn page() -> Arc<RecordType> {
        RecordType::new_generic(
            "Page",
            ["T"],
            vec![
                Field::new(
                    "items",
                    TypeDescriptor::sequence(TypeDescriptor::type_var("T")),
                ),
                Field::new(
                    "cursor",
                    TypeDescriptor::optional(TypeDescriptor::str()),
                ),
            ],
        )
    }

    #[test]
    fn generic_binds_parameters_for_fields() {
        let engine = Engine::new();
        let descriptor = TypeDescriptor::generic(page(), [TypeDescriptor::int()]);
        let codec = engine.json_codec(&descriptor).unwrap();
        let root = Bindings::root();
        let value = Value::record([
            ("items", Value::list([Value::Int(1), Value::Int(2)])),
            ("cursor", Value::Null),
        ]);
        let encoded = codec.encode(&value, &root).unwrap();
        assert_eq!(encoded, serde_json::json!({"items": [1, 2]}));
        assert_eq!(codec.decode(encoded, &root).unwrap(), value);
    }

    #[test]
    fn nested_generics_shadow_without_leaking() {
        let engine = Engine::new();
        // Page<Page<str>>: the inner instantiation rebinds T for its own
        // subtree only.
        let inner = TypeDescriptor::generic(page(), [TypeDescriptor::str()]);
        let outer = TypeDescriptor::generic(page(), [inner]);
        let codec = engine.json_codec(&outer).unwrap();
        let root = Bindings::root();
        let value = Value::record([
            (
                "items",
                Value::list([Value::record([
                    ("items", Value::list([Value::from("a")])),
                    ("cursor", Value::from("next")),
                ])]),
            ),
            ("cursor", Value::Null),
        ]);
        let encoded = codec.encode(&value, &root).unwrap();
        assert_eq!(
            encoded,
            serde_json::json!({"items": [{"items": ["a"], "cursor": "next"}]})
        );
        assert_eq!(codec.decode(encoded, &root).unwrap(), value);
    }

    #[test]
    fn unbound_parameter_degrades_to_any() {
        let engine = Engine::new();
        let descriptor = TypeDescriptor::type_var("T");
        let codec = engine.json_codec(&descriptor).unwrap();
        let root = Bindings::root();
        assert_eq!(
            codec.encode(&Value::Int(5), &root).unwrap(),
            serde_json::json!(5)
        );
    }

    #[test]
    fn generic_argument_may_reference_outer_parameter() {
        let engine = Engine::new();
        // Wrapper<U> whose field is Page<U>.
        let wrapper = RecordType::new_generic(
            "Wrapper",
            ["U"],
            vec![Field::new(
                "page",
                TypeDescriptor::generic(page(), [TypeDescriptor::type_var("U")]),
            )],
        );
        let descriptor = TypeDescriptor::generic(wrapper, [TypeDescriptor::bool()]);
        let codec = engine.json_codec(&descriptor).unwrap();
        let root = Bindings::root();
        let value = Value::record([(
            "page",
            Value::record([
                ("items", Value::list([Value::Bool(true)])),
                ("cursor", Value::Null),
            ]),
        )]);
        let encoded = codec.encode(&value, &root).unwrap();
        assert_eq!(
            encoded,
            serde_json::json!({"page": {"items": [true]}})
        );
        assert_eq!(codec.decode(encoded, &root).unwrap(), value);
    }
}
