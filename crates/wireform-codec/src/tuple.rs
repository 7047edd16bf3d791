//! Tuple codecs: fixed arity and variadic.
//!
//! Fixed tuples apply child codec `i` to element `i` and demand exact
//! arity; variadic tuples apply one child codec to every element. The text
//! form is one CSV row; the JSON form is an array. (The binary form is the
//! JSON array as bytes, supplied by the bridge.)

use crate::csv;
use crate::registry::ChildCodec;
use crate::wire::{Codec, Json, Text, Wire};
use wireform_schema::{Bindings, DecodeError, EncodeError, Value};

pub enum TupleArity<W: Wire> {
    Fixed(Vec<ChildCodec<W>>),
    Variadic(ChildCodec<W>),
}

impl<W: Wire> TupleArity<W> {
    fn check(&self, actual: usize) -> Result<(), String> {
        match self {
            TupleArity::Fixed(elements) if elements.len() != actual => Err(format!(
                "expecting {} elements; received {actual}",
                elements.len()
            )),
            _ => Ok(()),
        }
    }

    fn element(&self, index: usize) -> Option<&ChildCodec<W>> {
        match self {
            TupleArity::Fixed(elements) => elements.get(index),
            TupleArity::Variadic(element) => Some(element),
        }
    }
}

fn tuple_items<'v>(value: &'v Value) -> Result<&'v [Value], EncodeError> {
    match value {
        Value::Tuple(items) => Ok(items),
        other => Err(EncodeError::mismatch("tuple", other)),
    }
}

/// CSV-row tuple codec for the text wire.
pub struct TextTupleCodec {
    arity: TupleArity<Text>,
}

impl TextTupleCodec {
    pub fn new(arity: TupleArity<Text>) -> Self {
        Self { arity }
    }
}

impl Codec<Text> for TextTupleCodec {
    fn encode(&self, value: &Value, bindings: &Bindings<'_>) -> Result<String, EncodeError> {
        let items = tuple_items(value)?;
        self.arity.check(items.len()).map_err(EncodeError::new)?;
        let mut fields = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let codec = self
                .arity
                .element(index)
                .ok_or_else(|| EncodeError::bare())?;
            fields.push(codec.encode(item, bindings).map_err(|e| e.in_index(index))?);
        }
        Ok(csv::encode_row(&fields))
    }

    fn decode(&self, repr: String, bindings: &Bindings<'_>) -> Result<Value, DecodeError> {
        let fields = csv::decode_row(&repr)?;
        self.arity.check(fields.len()).map_err(DecodeError::new)?;
        let mut items = Vec::with_capacity(fields.len());
        for (index, field) in fields.into_iter().enumerate() {
            let codec = self
                .arity
                .element(index)
                .ok_or_else(|| DecodeError::bare())?;
            items.push(codec.decode(field, bindings).map_err(|e| e.in_index(index))?);
        }
        Ok(Value::Tuple(items))
    }
}

/// JSON-array tuple codec.
pub struct JsonTupleCodec {
    arity: TupleArity<Json>,
}

impl JsonTupleCodec {
    pub fn new(arity: TupleArity<Json>) -> Self {
        Self { arity }
    }
}

impl Codec<Json> for JsonTupleCodec {
    fn encode(
        &self,
        value: &Value,
        bindings: &Bindings<'_>,
    ) -> Result<serde_json::Value, EncodeError> {
        let items = tuple_items(value)?;
        self.arity.check(items.len()).map_err(EncodeError::new)?;
        let mut encoded = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let codec = self
                .arity
                .element(index)
                .ok_or_else(|| EncodeError::bare())?;
            encoded.push(codec.encode(item, bindings).map_err(|e| e.in_index(index))?);
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
        self.arity.check(elements.len()).map_err(DecodeError::new)?;
        let mut items = Vec::with_capacity(elements.len());
        for (index, element) in elements.into_iter().enumerate() {
            let codec = self
                .arity
                .element(index)
                .ok_or_else(|| DecodeError::bare())?;
            items.push(
                codec
                    .decode(element, bindings)
                    .map_err(|e| e.in_index(index))?,
            );
        }
        Ok(Value::Tuple(items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Engine;
    use wireform_schema::TypeDescriptor;

    fn pair() -> TypeDescriptor {
        TypeDescriptor::tuple([TypeDescriptor::str(), TypeDescriptor::int()])
    }

    #[test]
    fn fixed_tuple_round_trips_as_csv() {
        let engine = Engine::new();
        let codec = engine.text_codec(&pair()).unwrap();
        let root = Bindings::root();
        let value = Value::tuple([Value::from("a,b"), Value::Int(7)]);
        let encoded = codec.encode(&value, &root).unwrap();
        assert_eq!(encoded, "\"a,b\",7");
        assert_eq!(codec.decode(encoded, &root).unwrap(), value);
    }

    #[test]
    fn arity_mismatch_fails_both_ways() {
        let engine = Engine::new();
        let codec = engine.text_codec(&pair()).unwrap();
        let root = Bindings::root();
        assert!(codec.encode(&Value::tuple([Value::from("a")]), &root).is_err());
        assert!(codec.decode("a,1,extra".to_string(), &root).is_err());
    }

    #[test]
    fn variadic_tuple_takes_any_length() {
        let engine = Engine::new();
        let descriptor = TypeDescriptor::variadic_tuple(TypeDescriptor::int());
        let codec = engine.text_codec(&descriptor).unwrap();
        let root = Bindings::root();
        let value = Value::tuple([Value::Int(1), Value::Int(2), Value::Int(3)]);
        assert_eq!(codec.encode(&value, &root).unwrap(), "1,2,3");
        assert_eq!(codec.decode("1,2,3".to_string(), &root).unwrap(), value);
        assert_eq!(
            codec.decode(String::new(), &root).unwrap(),
            Value::tuple([])
        );
    }

    #[test]
    fn element_errors_carry_positions() {
        let engine = Engine::new();
        let codec = engine.json_codec(&pair()).unwrap();
        let err = codec
            .decode(serde_json::json!(["ok", "not an int"]), &Bindings::root())
            .unwrap_err();
        assert_eq!(err.to_string(), "cannot decode at [1]: expecting a number; received string");
    }
}
