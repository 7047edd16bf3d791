//! Mapping codecs.
//!
//! A mapping's JSON form is an object. JSON object keys are always
//! strings, so keys pass through the key type's **text** codec even when
//! the outer representation is JSON — the engine's one sanctioned
//! cross-wire call. Values use the value type's codec for the current
//! wire. (Text and binary forms are the JSON document, via the bridges.)

use crate::registry::ChildCodec;
use crate::wire::{Codec, Json, Text};
use std::collections::BTreeMap;
use wireform_schema::{Bindings, DecodeError, EncodeError, Value};

pub struct JsonMappingCodec {
    key: ChildCodec<Text>,
    value: ChildCodec<Json>,
}

impl JsonMappingCodec {
    pub fn new(key: ChildCodec<Text>, value: ChildCodec<Json>) -> Self {
        Self { key, value }
    }
}

impl Codec<Json> for JsonMappingCodec {
    fn encode(
        &self,
        value: &Value,
        bindings: &Bindings<'_>,
    ) -> Result<serde_json::Value, EncodeError> {
        let Value::Map(entries) = value else {
            return Err(EncodeError::mismatch("mapping", value));
        };
        // serde_json's map is key-ordered, and `entries` iterates in value
        // order, so object output is deterministic.
        let mut object = serde_json::Map::new();
        for (key, item) in entries {
            let key_text = self.key.encode(key, bindings)?;
            let item_json = self
                .value
                .encode(item, bindings)
                .map_err(|e| e.in_key(key_text.clone()))?;
            object.insert(key_text, item_json);
        }
        Ok(serde_json::Value::Object(object))
    }

    fn decode(
        &self,
        repr: serde_json::Value,
        bindings: &Bindings<'_>,
    ) -> Result<Value, DecodeError> {
        let serde_json::Value::Object(object) = repr else {
            return Err(DecodeError::new(format!(
                "expecting an object; received {}",
                crate::scalar::json_kind(&repr)
            )));
        };
        let mut entries = BTreeMap::new();
        for (key_text, item_json) in object {
            let key = self
                .key
                .decode(key_text.clone(), bindings)
                .map_err(|e| e.in_key(key_text.clone()))?;
            let item = self
                .value
                .decode(item_json, bindings)
                .map_err(|e| e.in_key(key_text))?;
            entries.insert(key, item);
        }
        Ok(Value::Map(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Engine;
    use wireform_schema::TypeDescriptor;

    #[test]
    fn non_string_keys_become_object_keys() {
        let engine = Engine::new();
        let descriptor = TypeDescriptor::mapping(TypeDescriptor::int(), TypeDescriptor::str());
        let codec = engine.json_codec(&descriptor).unwrap();
        let root = Bindings::root();
        let value = Value::map([
            (Value::Int(2), Value::from("b")),
            (Value::Int(1), Value::from("a")),
        ]);
        let encoded = codec.encode(&value, &root).unwrap();
        assert_eq!(encoded, serde_json::json!({"1": "a", "2": "b"}));
        assert_eq!(codec.decode(encoded, &root).unwrap(), value);
    }

    #[test]
    fn text_form_is_the_json_document() {
        let engine = Engine::new();
        let descriptor = TypeDescriptor::mapping(TypeDescriptor::str(), TypeDescriptor::int());
        let codec = engine.text_codec(&descriptor).unwrap();
        let root = Bindings::root();
        let value = Value::map([(Value::from("n"), Value::Int(1))]);
        let encoded = codec.encode(&value, &root).unwrap();
        assert_eq!(encoded, "{\"n\":1}");
        assert_eq!(codec.decode(encoded, &root).unwrap(), value);
    }

    #[test]
    fn value_errors_name_their_key() {
        let engine = Engine::new();
        let descriptor = TypeDescriptor::mapping(TypeDescriptor::str(), TypeDescriptor::int());
        let codec = engine.json_codec(&descriptor).unwrap();
        let err = codec
            .decode(serde_json::json!({"n": "not an int"}), &Bindings::root())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "cannot decode at [n]: expecting a number; received string"
        );
    }

    #[test]
    fn undecodable_keys_are_errors() {
        let engine = Engine::new();
        let descriptor = TypeDescriptor::mapping(TypeDescriptor::int(), TypeDescriptor::str());
        let codec = engine.json_codec(&descriptor).unwrap();
        assert!(
            codec
                .decode(serde_json::json!({"x": "a"}), &Bindings::root())
                .is_err()
        );
    }
}
