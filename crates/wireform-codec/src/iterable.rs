//! Sequence and set codecs.
//!
//! Sequences preserve order through encode and decode. Sets sort their
//! elements before encoding — encoding is a pure function of the set's
//! contents, and downstream hashing and diffing rely on byte-identical
//! output — and reject duplicate decoded elements, which indicate the
//! source was not set-like.
//!
//! The text form is one CSV row; the JSON form is an array. Strings and
//! byte strings are never treated as element iterables.

use crate::csv;
use crate::registry::ChildCodec;
use crate::wire::{Codec, Json, Text};
use std::collections::BTreeSet;
use wireform_schema::{Bindings, DecodeError, EncodeError, Value};

/// Ordered element views for encoding: a list in input order, or a set in
/// value order.
fn elements<'v>(value: &'v Value, set: bool) -> Result<Vec<&'v Value>, EncodeError> {
    match (value, set) {
        (Value::List(items), false) => Ok(items.iter().collect()),
        // BTreeSet iterates in ascending value order, which is exactly the
        // sorted-before-encode invariant.
        (Value::Set(items), true) => Ok(items.iter().collect()),
        (other, false) => Err(EncodeError::mismatch("sequence", other)),
        (other, true) => Err(EncodeError::mismatch("set", other)),
    }
}

fn collect(items: Vec<Value>, set: bool) -> Result<Value, DecodeError> {
    if !set {
        return Ok(Value::List(items));
    }
    let mut out = BTreeSet::new();
    for item in items {
        if !out.insert(item) {
            return Err(DecodeError::new("duplicate element in set"));
        }
    }
    Ok(Value::Set(out))
}

/// CSV-row sequence/set codec for the text wire.
pub struct TextIterableCodec {
    element: ChildCodec<Text>,
    set: bool,
}

impl TextIterableCodec {
    pub fn new(element: ChildCodec<Text>, set: bool) -> Self {
        Self { element, set }
    }
}

impl Codec<Text> for TextIterableCodec {
    fn encode(&self, value: &Value, bindings: &Bindings<'_>) -> Result<String, EncodeError> {
        let items = elements(value, self.set)?;
        let mut fields = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            fields.push(
                self.element
                    .encode(item, bindings)
                    .map_err(|e| e.in_index(index))?,
            );
        }
        Ok(csv::encode_row(&fields))
    }

    fn decode(&self, repr: String, bindings: &Bindings<'_>) -> Result<Value, DecodeError> {
        let fields = csv::decode_row(&repr)?;
        let mut items = Vec::with_capacity(fields.len());
        for (index, field) in fields.into_iter().enumerate() {
            items.push(
                self.element
                    .decode(field, bindings)
                    .map_err(|e| e.in_index(index))?,
            );
        }
        collect(items, self.set)
    }
}

/// JSON-array sequence/set codec.
pub struct JsonIterableCodec {
    element: ChildCodec<Json>,
    set: bool,
}

impl JsonIterableCodec {
    pub fn new(element: ChildCodec<Json>, set: bool) -> Self {
        Self { element, set }
    }
}

impl Codec<Json> for JsonIterableCodec {
    fn encode(
        &self,
        value: &Value,
        bindings: &Bindings<'_>,
    ) -> Result<serde_json::Value, EncodeError> {
        let items = elements(value, self.set)?;
        let mut encoded = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            encoded.push(
                self.element
                    .encode(item, bindings)
                    .map_err(|e| e.in_index(index))?,
            );
        }
        Ok(serde_json::Value::Array(encoded))
    }

    fn decode(
        &self,
        repr: serde_json::Value,
        bindings: &Bindings<'_>,
    ) -> Result<Value, DecodeError> {
        let serde_json::Value::Array(elements) = repr else {
            return Err(DecodeError::new(format!(
                "expecting an array; received {}",
                crate::scalar::json_kind(&repr)
            )));
        };
        let mut items = Vec::with_capacity(elements.len());
        for (index, element) in elements.into_iter().enumerate() {
            items.push(
                self.element
                    .decode(element, bindings)
                    .map_err(|e| e.in_index(index))?,
            );
        }
        collect(items, self.set)
    }
}
