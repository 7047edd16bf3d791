//! # Wireform codec engine
//!
//! Type-directed value processing: given a [`TypeDescriptor`], the engine
//! produces codecs converting in-memory [`Value`]s to and from three wire
//! representations — text, binary, and JSON — and memoizes each codec per
//! exact descriptor.
//!
//! ## Architecture
//!
//! ```text
//! Engine                  ← three sealed registries, one per wire
//!     │
//! Registry<W>             ← ordered (predicate, factory) matchers + cache
//!     │
//! Codec<W>                ← encode / decode / content_type
//!     │
//! ChildCodec<W>           ← lazily resolved composite children
//! ```
//!
//! Composite codecs delegate to children obtained from the same engine;
//! children resolve lazily so self-referential record types terminate.
//! Set encodings are sorted and deterministic; unions and literals follow
//! a first-match policy in declared order.
//!
//! ## Example
//!
//! ```
//! use wireform_codec::{Json, engine};
//! use wireform_schema::{Bindings, TypeDescriptor, Value};
//!
//! let descriptor = TypeDescriptor::set(TypeDescriptor::int());
//! let codec = engine().codec::<Json>(&descriptor)?;
//! let value = Value::set([Value::Int(3), Value::Int(1), Value::Int(2)]);
//! let encoded = codec.encode(&value, &Bindings::root())?;
//! assert_eq!(encoded, serde_json::json!([1, 2, 3]));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod any;
mod bridge;
pub mod csv;
mod defaults;
mod engine;
mod generic;
mod iterable;
mod literal;
mod mapping;
pub mod patch;
mod record;
pub mod registry;
mod scalar;
pub mod tabular;
mod tuple;
mod union;
mod wire;

pub use engine::{Engine, EngineBuilder, engine};
pub use registry::{ChildCodec, Matcher};
pub use wire::{Binary, Codec, Json, Text, Wire};

use wireform_schema::{Bindings, DecodeError, EncodeError, TypeDescriptor, Value};

/// Encode a value with the default engine and root bindings.
pub fn encode<W: Wire>(descriptor: &TypeDescriptor, value: &Value) -> Result<W::Repr, EncodeError> {
    let codec = engine()
        .codec::<W>(descriptor)
        .map_err(|err| EncodeError::new(err.to_string()))?;
    codec.encode(value, &Bindings::root())
}

/// Decode a representation with the default engine and root bindings.
pub fn decode<W: Wire>(descriptor: &TypeDescriptor, repr: W::Repr) -> Result<Value, DecodeError> {
    let codec = engine()
        .codec::<W>(descriptor)
        .map_err(|err| DecodeError::new(err.to_string()))?;
    codec.decode(repr, &Bindings::root())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_level_helpers_use_the_shared_engine() {
        let descriptor = TypeDescriptor::sequence(TypeDescriptor::int());
        let value = Value::list([Value::Int(1), Value::Int(2)]);
        let encoded = encode::<Text>(&descriptor, &value).unwrap();
        assert_eq!(encoded, "1,2");
        assert_eq!(decode::<Text>(&descriptor, encoded).unwrap(), value);
    }

    #[test]
    fn content_types_label_the_binary_wire() {
        let engine = Engine::new();
        let cases = [
            (TypeDescriptor::str(), "text/plain; charset=UTF-8"),
            (TypeDescriptor::bytes(), "application/octet-stream"),
            (
                TypeDescriptor::sequence(TypeDescriptor::int()),
                "application/json",
            ),
            (
                TypeDescriptor::optional(TypeDescriptor::mapping(
                    TypeDescriptor::str(),
                    TypeDescriptor::int(),
                )),
                "application/json",
            ),
        ];
        for (descriptor, expected) in cases {
            let codec = engine.binary_codec(&descriptor).unwrap();
            assert_eq!(codec.content_type(), expected);
        }
    }

    #[test]
    fn invalid_literals_fail_resolution() {
        let engine = Engine::new();
        let err = engine
            .json_codec(&TypeDescriptor::literal([Value::list([])]))
            .err()
            .unwrap();
        assert_eq!(
            err.to_string(),
            "literal member must be a scalar; received list"
        );
    }
}
