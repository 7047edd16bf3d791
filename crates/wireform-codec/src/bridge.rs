//! Wire bridges.
//!
//! Mappings, records, and generic instantiations have a natural JSON form;
//! their text form is that JSON document as a string and their binary form
//! is the same document as UTF-8 bytes. Tuples, sequences, and sets use the
//! JSON bridge only on the binary wire (their text form is a CSV row).

use crate::registry::ChildCodec;
use crate::wire::{Binary, Codec, Json, Text};
use wireform_schema::{Bindings, DecodeError, EncodeError, Value};

/// Text codec that round-trips through the descriptor's JSON codec.
pub struct JsonText {
    json: ChildCodec<Json>,
}

impl JsonText {
    pub fn new(json: ChildCodec<Json>) -> Self {
        Self { json }
    }
}

impl Codec<Text> for JsonText {
    fn encode(&self, value: &Value, bindings: &Bindings<'_>) -> Result<String, EncodeError> {
        Ok(self.json.encode(value, bindings)?.to_string())
    }

    fn decode(&self, repr: String, bindings: &Bindings<'_>) -> Result<Value, DecodeError> {
        let document: serde_json::Value = serde_json::from_str(&repr)
            .map_err(|err| DecodeError::new(format!("malformed JSON document: {err}")))?;
        self.json.decode(document, bindings)
    }
}

/// Binary codec that round-trips through the descriptor's JSON codec.
pub struct JsonBytes {
    json: ChildCodec<Json>,
}

impl JsonBytes {
    pub fn new(json: ChildCodec<Json>) -> Self {
        Self { json }
    }
}

impl Codec<Binary> for JsonBytes {
    fn encode(&self, value: &Value, bindings: &Bindings<'_>) -> Result<Vec<u8>, EncodeError> {
        Ok(self.json.encode(value, bindings)?.to_string().into_bytes())
    }

    fn decode(&self, repr: Vec<u8>, bindings: &Bindings<'_>) -> Result<Value, DecodeError> {
        let document: serde_json::Value = serde_json::from_slice(&repr)
            .map_err(|err| DecodeError::new(format!("malformed JSON document: {err}")))?;
        self.json.decode(document, bindings)
    }

    fn content_type(&self) -> &'static str {
        "application/json"
    }
}
