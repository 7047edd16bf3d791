//! The `any` codec.
//!
//! Encoding inspects the runtime value, synthesizes the descriptor its
//! shape implies, and delegates to that descriptor's codec. Record values
//! degrade to string-keyed maps first — a bare field map carries no
//! nominal record type to recover.
//!
//! Decoding cannot know a target shape: the text wire yields the string
//! itself, the binary wire the bytes themselves, and the JSON wire maps
//! the document structurally (integral numbers to int, fractional to
//! float, arrays to lists, objects to string-keyed maps).

use crate::engine::Engine;
use crate::wire::{Binary, Codec, Json, Text, Wire};
use std::collections::BTreeMap;
use wireform_schema::{Bindings, DecodeError, EncodeError, Value, synthesize};

pub struct AnyCodec {
    engine: Engine,
}

impl AnyCodec {
    pub fn new(engine: &Engine) -> Self {
        Self {
            engine: engine.clone(),
        }
    }

    fn encode_with<W: Wire>(
        &self,
        value: &Value,
        bindings: &Bindings<'_>,
    ) -> Result<W::Repr, EncodeError> {
        let value = match value {
            Value::Record(fields) => Value::Map(
                fields
                    .iter()
                    .map(|(name, item)| (Value::Str(name.clone()), item.clone()))
                    .collect(),
            ),
            other => other.clone(),
        };
        let descriptor = synthesize(&value);
        let codec = self
            .engine
            .codec::<W>(&descriptor)
            .map_err(|err| EncodeError::new(err.to_string()))?;
        codec.encode(&value, bindings)
    }
}

impl Codec<Text> for AnyCodec {
    fn encode(&self, value: &Value, bindings: &Bindings<'_>) -> Result<String, EncodeError> {
        self.encode_with::<Text>(value, bindings)
    }

    fn decode(&self, repr: String, _: &Bindings<'_>) -> Result<Value, DecodeError> {
        Ok(Value::Str(repr))
    }
}

impl Codec<Binary> for AnyCodec {
    fn encode(&self, value: &Value, bindings: &Bindings<'_>) -> Result<Vec<u8>, EncodeError> {
        self.encode_with::<Binary>(value, bindings)
    }

    fn decode(&self, repr: Vec<u8>, _: &Bindings<'_>) -> Result<Value, DecodeError> {
        Ok(Value::Bytes(repr))
    }
}

impl Codec<Json> for AnyCodec {
    fn encode(
        &self,
        value: &Value,
        bindings: &Bindings<'_>,
    ) -> Result<serde_json::Value, EncodeError> {
        self.encode_with::<Json>(value, bindings)
    }

    fn decode(&self, repr: serde_json::Value, _: &Bindings<'_>) -> Result<Value, DecodeError> {
        Ok(structural(repr))
    }
}

/// Structural JSON-to-value mapping used when no type directs the decode.
fn structural(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else {
                Value::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        serde_json::Value::String(s) => Value::Str(s),
        serde_json::Value::Array(items) => {
            Value::List(items.into_iter().map(structural).collect())
        }
        serde_json::Value::Object(entries) => Value::Map(
            entries
                .into_iter()
                .map(|(key, item)| (Value::Str(key), structural(item)))
                .collect::<BTreeMap<_, _>>(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wireform_schema::TypeDescriptor;

    #[test]
    fn encode_follows_runtime_shape() {
        let engine = Engine::new();
        let codec = engine.json_codec(&TypeDescriptor::any()).unwrap();
        let root = Bindings::root();
        assert_eq!(
            codec.encode(&Value::Int(5), &root).unwrap(),
            serde_json::json!(5)
        );
        assert_eq!(
            codec
                .encode(&Value::list([Value::from("a"), Value::Int(1)]), &root)
                .unwrap(),
            serde_json::json!(["a", 1])
        );
    }

    #[test]
    fn record_values_encode_as_objects() {
        let engine = Engine::new();
        let codec = engine.json_codec(&TypeDescriptor::any()).unwrap();
        let value = Value::record([("n", Value::Int(1))]);
        assert_eq!(
            codec.encode(&value, &Bindings::root()).unwrap(),
            serde_json::json!({"n": 1})
        );
    }

    #[test]
    fn json_decode_is_structural() {
        let engine = Engine::new();
        let codec = engine.json_codec(&TypeDescriptor::any()).unwrap();
        let decoded = codec
            .decode(
                serde_json::json!({"a": [1, 2.5, "x", null]}),
                &Bindings::root(),
            )
            .unwrap();
        assert_eq!(
            decoded,
            Value::map([(
                Value::from("a"),
                Value::list([
                    Value::Int(1),
                    Value::Float(2.5),
                    Value::from("x"),
                    Value::Null
                ])
            )])
        );
    }

    #[test]
    fn text_decode_yields_the_string() {
        let engine = Engine::new();
        let codec = engine.text_codec(&TypeDescriptor::any()).unwrap();
        assert_eq!(
            codec.decode("anything".to_string(), &Bindings::root()).unwrap(),
            Value::from("anything")
        );
    }
}
