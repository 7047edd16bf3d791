//! Scalar codecs.
//!
//! One codec struct per scalar kind, each implemented for all three wires.
//! The binary form of every scalar except `bytes` is the UTF-8 encoding of
//! its text form; `bytes` is raw on the binary wire and base64 elsewhere.
//!
//! Scalar codecs never attach path segments — enclosing composite codecs
//! prepend the segment for the failing child.

use crate::wire::{Binary, Codec, Json, Text, Wire};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;
use std::str::FromStr;
use std::sync::Arc;
use wireform_schema::{Bindings, DecodeError, EncodeError, ScalarKind, Value};

/// Text content type shared by every scalar except raw bytes.
const TEXT_CONTENT_TYPE: &str = "text/plain; charset=UTF-8";

// Binary delegation to the text form, shared by all scalars but bytes.
fn binary_from_text<C: Codec<Text>>(
    codec: &C,
    value: &Value,
    bindings: &Bindings<'_>,
) -> Result<Vec<u8>, EncodeError> {
    Codec::<Text>::encode(codec, value, bindings).map(String::into_bytes)
}

fn binary_to_text<C: Codec<Text>>(
    codec: &C,
    repr: Vec<u8>,
    bindings: &Bindings<'_>,
) -> Result<Value, DecodeError> {
    let text = String::from_utf8(repr)
        .map_err(|_| DecodeError::new("expecting UTF-8 encoded bytes"))?;
    Codec::<Text>::decode(codec, text, bindings)
}

// JSON delegation to the text form, for scalars whose JSON form is a string.
fn json_from_text<C: Codec<Text>>(
    codec: &C,
    value: &Value,
    bindings: &Bindings<'_>,
) -> Result<JsonValue, EncodeError> {
    Codec::<Text>::encode(codec, value, bindings).map(JsonValue::String)
}

fn json_to_text<C: Codec<Text>>(
    codec: &C,
    repr: JsonValue,
    bindings: &Bindings<'_>,
    expecting: &str,
) -> Result<Value, DecodeError> {
    match repr {
        JsonValue::String(s) => Codec::<Text>::decode(codec, s, bindings),
        other => Err(DecodeError::new(format!(
            "expecting {expecting}; received {}",
            json_kind(&other)
        ))),
    }
}

pub(crate) fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

macro_rules! text_content_type {
    () => {
        fn content_type(&self) -> &'static str {
            TEXT_CONTENT_TYPE
        }
    };
}

/// Unicode character strings.
pub struct StrCodec;

impl Codec<Text> for StrCodec {
    fn encode(&self, value: &Value, _: &Bindings<'_>) -> Result<String, EncodeError> {
        match value {
            Value::Str(s) => Ok(s.clone()),
            other => Err(EncodeError::mismatch("str", other)),
        }
    }

    fn decode(&self, repr: String, _: &Bindings<'_>) -> Result<Value, DecodeError> {
        Ok(Value::Str(repr))
    }
}

impl Codec<Binary> for StrCodec {
    fn encode(&self, value: &Value, b: &Bindings<'_>) -> Result<Vec<u8>, EncodeError> {
        binary_from_text(self, value, b)
    }

    fn decode(&self, repr: Vec<u8>, b: &Bindings<'_>) -> Result<Value, DecodeError> {
        binary_to_text(self, repr, b)
    }

    text_content_type!();
}

impl Codec<Json> for StrCodec {
    fn encode(&self, value: &Value, b: &Bindings<'_>) -> Result<JsonValue, EncodeError> {
        json_from_text(self, value, b)
    }

    fn decode(&self, repr: JsonValue, b: &Bindings<'_>) -> Result<Value, DecodeError> {
        json_to_text(self, repr, b, "a string")
    }
}

/// Byte sequences: raw on the binary wire, base64 text elsewhere.
///
/// The base64 form uses the standard alphabet with no line breaks.
pub struct BytesCodec;

impl Codec<Text> for BytesCodec {
    fn encode(&self, value: &Value, _: &Bindings<'_>) -> Result<String, EncodeError> {
        match value {
            Value::Bytes(data) => Ok(BASE64.encode(data)),
            other => Err(EncodeError::mismatch("bytes", other)),
        }
    }

    fn decode(&self, repr: String, _: &Bindings<'_>) -> Result<Value, DecodeError> {
        BASE64
            .decode(repr.as_bytes())
            .map(Value::Bytes)
            .map_err(|_| DecodeError::new("expecting a base64-encoded value"))
    }
}

impl Codec<Binary> for BytesCodec {
    fn encode(&self, value: &Value, _: &Bindings<'_>) -> Result<Vec<u8>, EncodeError> {
        match value {
            Value::Bytes(data) => Ok(data.clone()),
            other => Err(EncodeError::mismatch("bytes", other)),
        }
    }

    fn decode(&self, repr: Vec<u8>, _: &Bindings<'_>) -> Result<Value, DecodeError> {
        Ok(Value::Bytes(repr))
    }
}

impl Codec<Json> for BytesCodec {
    fn encode(&self, value: &Value, b: &Bindings<'_>) -> Result<JsonValue, EncodeError> {
        json_from_text(self, value, b)
    }

    fn decode(&self, repr: JsonValue, b: &Bindings<'_>) -> Result<Value, DecodeError> {
        json_to_text(self, repr, b, "a base64 string")
    }
}

/// Signed integers.
pub struct IntCodec;

impl Codec<Text> for IntCodec {
    fn encode(&self, value: &Value, _: &Bindings<'_>) -> Result<String, EncodeError> {
        match value {
            Value::Int(i) => Ok(i.to_string()),
            other => Err(EncodeError::mismatch("int", other)),
        }
    }

    fn decode(&self, repr: String, _: &Bindings<'_>) -> Result<Value, DecodeError> {
        repr.parse::<i64>()
            .map(Value::Int)
            .map_err(|_| DecodeError::new("expecting an integer"))
    }
}

impl Codec<Binary> for IntCodec {
    fn encode(&self, value: &Value, b: &Bindings<'_>) -> Result<Vec<u8>, EncodeError> {
        binary_from_text(self, value, b)
    }

    fn decode(&self, repr: Vec<u8>, b: &Bindings<'_>) -> Result<Value, DecodeError> {
        binary_to_text(self, repr, b)
    }

    text_content_type!();
}

impl Codec<Json> for IntCodec {
    fn encode(&self, value: &Value, _: &Bindings<'_>) -> Result<JsonValue, EncodeError> {
        match value {
            Value::Int(i) => Ok(JsonValue::from(*i)),
            other => Err(EncodeError::mismatch("int", other)),
        }
    }

    fn decode(&self, repr: JsonValue, _: &Bindings<'_>) -> Result<Value, DecodeError> {
        // Booleans are structurally numeric in some languages; they are
        // rejected here regardless.
        let JsonValue::Number(number) = repr else {
            return Err(DecodeError::new(format!(
                "expecting a number; received {}",
                json_kind(&repr)
            )));
        };
        if let Some(i) = number.as_i64() {
            return Ok(Value::Int(i));
        }
        if let Some(f) = number.as_f64() {
            // An exact-integer float such as 1.0 decodes as 1; any
            // fractional part is an error, not a rounding.
            if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
                return Ok(Value::Int(f as i64));
            }
        }
        Err(DecodeError::new("expecting an integer"))
    }
}

/// IEEE 754 double-precision floats.
pub struct FloatCodec;

impl Codec<Text> for FloatCodec {
    fn encode(&self, value: &Value, _: &Bindings<'_>) -> Result<String, EncodeError> {
        match value {
            Value::Float(f) => Ok(f.to_string()),
            other => Err(EncodeError::mismatch("float", other)),
        }
    }

    fn decode(&self, repr: String, _: &Bindings<'_>) -> Result<Value, DecodeError> {
        repr.parse::<f64>()
            .map(Value::Float)
            .map_err(|_| DecodeError::new("expecting a floating point number"))
    }
}

impl Codec<Binary> for FloatCodec {
    fn encode(&self, value: &Value, b: &Bindings<'_>) -> Result<Vec<u8>, EncodeError> {
        binary_from_text(self, value, b)
    }

    fn decode(&self, repr: Vec<u8>, b: &Bindings<'_>) -> Result<Value, DecodeError> {
        binary_to_text(self, repr, b)
    }

    text_content_type!();
}

impl Codec<Json> for FloatCodec {
    fn encode(&self, value: &Value, _: &Bindings<'_>) -> Result<JsonValue, EncodeError> {
        match value {
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(JsonValue::Number)
                .ok_or_else(|| {
                    EncodeError::new("non-finite float has no JSON representation")
                }),
            other => Err(EncodeError::mismatch("float", other)),
        }
    }

    fn decode(&self, repr: JsonValue, _: &Bindings<'_>) -> Result<Value, DecodeError> {
        // Integers widen to float; everything else is rejected.
        let JsonValue::Number(number) = repr else {
            return Err(DecodeError::new(format!(
                "expecting a number; received {}",
                json_kind(&repr)
            )));
        };
        number
            .as_f64()
            .map(Value::Float)
            .ok_or_else(|| DecodeError::new("expecting a floating point number"))
    }
}

/// Arbitrary-precision decimal numbers.
///
/// Decimals are strings in every representation: a native JSON number
/// would round-trip through binary floating point and lose precision.
pub struct DecimalCodec;

impl Codec<Text> for DecimalCodec {
    fn encode(&self, value: &Value, _: &Bindings<'_>) -> Result<String, EncodeError> {
        match value {
            Value::Decimal(d) => Ok(d.to_string()),
            other => Err(EncodeError::mismatch("decimal", other)),
        }
    }

    fn decode(&self, repr: String, _: &Bindings<'_>) -> Result<Value, DecodeError> {
        Decimal::from_str(&repr)
            .map(Value::Decimal)
            .map_err(|_| DecodeError::new("expecting a string containing a decimal number"))
    }
}

impl Codec<Binary> for DecimalCodec {
    fn encode(&self, value: &Value, b: &Bindings<'_>) -> Result<Vec<u8>, EncodeError> {
        binary_from_text(self, value, b)
    }

    fn decode(&self, repr: Vec<u8>, b: &Bindings<'_>) -> Result<Value, DecodeError> {
        binary_to_text(self, repr, b)
    }

    text_content_type!();
}

impl Codec<Json> for DecimalCodec {
    fn encode(&self, value: &Value, b: &Bindings<'_>) -> Result<JsonValue, EncodeError> {
        json_from_text(self, value, b)
    }

    fn decode(&self, repr: JsonValue, b: &Bindings<'_>) -> Result<Value, DecodeError> {
        json_to_text(self, repr, b, "a string containing a decimal number")
    }
}

/// Booleans: the text form is exactly `true` or `false`.
pub struct BoolCodec;

impl Codec<Text> for BoolCodec {
    fn encode(&self, value: &Value, _: &Bindings<'_>) -> Result<String, EncodeError> {
        match value {
            Value::Bool(b) => Ok(if *b { "true" } else { "false" }.to_string()),
            other => Err(EncodeError::mismatch("bool", other)),
        }
    }

    fn decode(&self, repr: String, _: &Bindings<'_>) -> Result<Value, DecodeError> {
        match repr.as_str() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(DecodeError::new("expecting true or false")),
        }
    }
}

impl Codec<Binary> for BoolCodec {
    fn encode(&self, value: &Value, b: &Bindings<'_>) -> Result<Vec<u8>, EncodeError> {
        binary_from_text(self, value, b)
    }

    fn decode(&self, repr: Vec<u8>, b: &Bindings<'_>) -> Result<Value, DecodeError> {
        binary_to_text(self, repr, b)
    }

    text_content_type!();
}

impl Codec<Json> for BoolCodec {
    fn encode(&self, value: &Value, _: &Bindings<'_>) -> Result<JsonValue, EncodeError> {
        match value {
            Value::Bool(b) => Ok(JsonValue::Bool(*b)),
            other => Err(EncodeError::mismatch("bool", other)),
        }
    }

    fn decode(&self, repr: JsonValue, _: &Bindings<'_>) -> Result<Value, DecodeError> {
        match repr {
            JsonValue::Bool(b) => Ok(Value::Bool(b)),
            other => Err(DecodeError::new(format!(
                "expecting a boolean; received {}",
                json_kind(&other)
            ))),
        }
    }
}

/// The null value: an empty string on the text wire.
pub struct NullCodec;

impl Codec<Text> for NullCodec {
    fn encode(&self, value: &Value, _: &Bindings<'_>) -> Result<String, EncodeError> {
        match value {
            Value::Null => Ok(String::new()),
            other => Err(EncodeError::mismatch("null", other)),
        }
    }

    fn decode(&self, repr: String, _: &Bindings<'_>) -> Result<Value, DecodeError> {
        if repr.is_empty() {
            Ok(Value::Null)
        } else {
            Err(DecodeError::new("expecting an empty string"))
        }
    }
}

impl Codec<Binary> for NullCodec {
    fn encode(&self, value: &Value, b: &Bindings<'_>) -> Result<Vec<u8>, EncodeError> {
        binary_from_text(self, value, b)
    }

    fn decode(&self, repr: Vec<u8>, b: &Bindings<'_>) -> Result<Value, DecodeError> {
        binary_to_text(self, repr, b)
    }

    text_content_type!();
}

impl Codec<Json> for NullCodec {
    fn encode(&self, value: &Value, _: &Bindings<'_>) -> Result<JsonValue, EncodeError> {
        match value {
            Value::Null => Ok(JsonValue::Null),
            other => Err(EncodeError::mismatch("null", other)),
        }
    }

    fn decode(&self, repr: JsonValue, _: &Bindings<'_>) -> Result<Value, DecodeError> {
        match repr {
            JsonValue::Null => Ok(Value::Null),
            other => Err(DecodeError::new(format!(
                "expecting null; received {}",
                json_kind(&other)
            ))),
        }
    }
}

/// Calendar dates in RFC 3339 full-date form, e.g. `2018-06-16`.
pub struct DateCodec;

impl Codec<Text> for DateCodec {
    fn encode(&self, value: &Value, _: &Bindings<'_>) -> Result<String, EncodeError> {
        match value {
            Value::Date(d) => Ok(d.to_string()),
            other => Err(EncodeError::mismatch("date", other)),
        }
    }

    fn decode(&self, repr: String, _: &Bindings<'_>) -> Result<Value, DecodeError> {
        NaiveDate::from_str(&repr)
            .map(Value::Date)
            .map_err(|_| DecodeError::new("expecting an RFC 3339 date"))
    }
}

impl Codec<Binary> for DateCodec {
    fn encode(&self, value: &Value, b: &Bindings<'_>) -> Result<Vec<u8>, EncodeError> {
        binary_from_text(self, value, b)
    }

    fn decode(&self, repr: Vec<u8>, b: &Bindings<'_>) -> Result<Value, DecodeError> {
        binary_to_text(self, repr, b)
    }

    text_content_type!();
}

impl Codec<Json> for DateCodec {
    fn encode(&self, value: &Value, b: &Bindings<'_>) -> Result<JsonValue, EncodeError> {
        json_from_text(self, value, b)
    }

    fn decode(&self, repr: JsonValue, b: &Bindings<'_>) -> Result<Value, DecodeError> {
        json_to_text(self, repr, b, "an RFC 3339 date string")
    }
}

/// Timestamps in RFC 3339 form, always normalized to UTC.
///
/// Encoding emits a trailing `Z` rather than `+00:00`. A decoded value
/// with no timezone offset is interpreted as UTC.
pub struct DateTimeCodec;

impl Codec<Text> for DateTimeCodec {
    fn encode(&self, value: &Value, _: &Bindings<'_>) -> Result<String, EncodeError> {
        match value {
            Value::DateTime(dt) => Ok(dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            other => Err(EncodeError::mismatch("datetime", other)),
        }
    }

    fn decode(&self, repr: String, _: &Bindings<'_>) -> Result<Value, DecodeError> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(&repr) {
            return Ok(Value::DateTime(dt.with_timezone(&Utc)));
        }
        // A zone-less timestamp is interpreted as UTC.
        NaiveDateTime::parse_from_str(&repr, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| Value::DateTime(naive.and_utc()))
            .map_err(|_| DecodeError::new("expecting an RFC 3339 date-time"))
    }
}

impl Codec<Binary> for DateTimeCodec {
    fn encode(&self, value: &Value, b: &Bindings<'_>) -> Result<Vec<u8>, EncodeError> {
        binary_from_text(self, value, b)
    }

    fn decode(&self, repr: Vec<u8>, b: &Bindings<'_>) -> Result<Value, DecodeError> {
        binary_to_text(self, repr, b)
    }

    text_content_type!();
}

impl Codec<Json> for DateTimeCodec {
    fn encode(&self, value: &Value, b: &Bindings<'_>) -> Result<JsonValue, EncodeError> {
        json_from_text(self, value, b)
    }

    fn decode(&self, repr: JsonValue, b: &Bindings<'_>) -> Result<Value, DecodeError> {
        json_to_text(self, repr, b, "an RFC 3339 date-time string")
    }
}

/// Universally unique identifiers, hyphenated lowercase.
pub struct UuidCodec;

impl Codec<Text> for UuidCodec {
    fn encode(&self, value: &Value, _: &Bindings<'_>) -> Result<String, EncodeError> {
        match value {
            Value::Uuid(u) => Ok(u.to_string()),
            other => Err(EncodeError::mismatch("uuid", other)),
        }
    }

    fn decode(&self, repr: String, _: &Bindings<'_>) -> Result<Value, DecodeError> {
        uuid::Uuid::parse_str(&repr)
            .map(Value::Uuid)
            .map_err(|_| DecodeError::new("expecting a UUID"))
    }
}

impl Codec<Binary> for UuidCodec {
    fn encode(&self, value: &Value, b: &Bindings<'_>) -> Result<Vec<u8>, EncodeError> {
        binary_from_text(self, value, b)
    }

    fn decode(&self, repr: Vec<u8>, b: &Bindings<'_>) -> Result<Value, DecodeError> {
        binary_to_text(self, repr, b)
    }

    text_content_type!();
}

impl Codec<Json> for UuidCodec {
    fn encode(&self, value: &Value, b: &Bindings<'_>) -> Result<JsonValue, EncodeError> {
        json_from_text(self, value, b)
    }

    fn decode(&self, repr: JsonValue, b: &Bindings<'_>) -> Result<Value, DecodeError> {
        json_to_text(self, repr, b, "a UUID string")
    }
}

/// The scalar codec for a kind, usable on any wire.
pub fn codec_for<W: Wire>(kind: ScalarKind) -> Arc<dyn Codec<W>>
where
    StrCodec: Codec<W>,
    BytesCodec: Codec<W>,
    IntCodec: Codec<W>,
    FloatCodec: Codec<W>,
    DecimalCodec: Codec<W>,
    BoolCodec: Codec<W>,
    NullCodec: Codec<W>,
    DateCodec: Codec<W>,
    DateTimeCodec: Codec<W>,
    UuidCodec: Codec<W>,
{
    match kind {
        ScalarKind::Str => Arc::new(StrCodec),
        ScalarKind::Bytes => Arc::new(BytesCodec),
        ScalarKind::Int => Arc::new(IntCodec),
        ScalarKind::Float => Arc::new(FloatCodec),
        ScalarKind::Decimal => Arc::new(DecimalCodec),
        ScalarKind::Bool => Arc::new(BoolCodec),
        ScalarKind::Null => Arc::new(NullCodec),
        ScalarKind::Date => Arc::new(DateCodec),
        ScalarKind::DateTime => Arc::new(DateTimeCodec),
        ScalarKind::Uuid => Arc::new(UuidCodec),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn root() -> Bindings<'static> {
        Bindings::root()
    }

    #[test]
    fn bytes_text_is_base64() {
        let value = Value::bytes(*b"Hello Wireform");
        let encoded = Codec::<Text>::encode(&BytesCodec, &value, &root()).unwrap();
        assert_eq!(encoded, "SGVsbG8gV2lyZWZvcm0=");
        assert_eq!(
            Codec::<Text>::decode(&BytesCodec, encoded, &root()).unwrap(),
            value
        );
        assert!(Codec::<Text>::decode(&BytesCodec, "not base64!".to_string(), &root()).is_err());
    }

    #[test]
    fn bool_text_accepts_exactly_true_false() {
        assert_eq!(
            Codec::<Text>::decode(&BoolCodec, "true".to_string(), &root()).unwrap(),
            Value::Bool(true)
        );
        for malformed in ["True", "1", "yes", ""] {
            assert!(Codec::<Text>::decode(&BoolCodec, malformed.to_string(), &root()).is_err());
        }
    }

    #[test]
    fn json_int_rejects_fraction_and_bool() {
        let decode = |v: JsonValue| Codec::<Json>::decode(&IntCodec, v, &root());
        assert_eq!(decode(serde_json::json!(5)).unwrap(), Value::Int(5));
        assert_eq!(decode(serde_json::json!(1.0)).unwrap(), Value::Int(1));
        assert!(decode(serde_json::json!(1.5)).is_err());
        assert!(decode(serde_json::json!(true)).is_err());
        assert!(decode(serde_json::json!("5")).is_err());
    }

    #[test]
    fn decimal_is_a_string_in_json() {
        let value = Value::Decimal(Decimal::from_str("3.14").unwrap());
        let encoded = Codec::<Json>::encode(&DecimalCodec, &value, &root()).unwrap();
        assert_eq!(encoded, serde_json::json!("3.14"));
        assert!(
            Codec::<Json>::decode(&DecimalCodec, serde_json::json!(3.14), &root()).is_err()
        );
    }

    #[test]
    fn datetime_normalizes_to_utc_z() {
        let dt = Utc.with_ymd_and_hms(2018, 6, 16, 12, 34, 56).unwrap();
        let encoded =
            Codec::<Text>::encode(&DateTimeCodec, &Value::DateTime(dt), &root()).unwrap();
        assert_eq!(encoded, "2018-06-16T12:34:56Z");

        // Offset input normalizes; zone-less input is interpreted as UTC.
        let offset = Codec::<Text>::decode(
            &DateTimeCodec,
            "2018-06-16T14:34:56+02:00".to_string(),
            &root(),
        )
        .unwrap();
        assert_eq!(offset, Value::DateTime(dt));
        let naive =
            Codec::<Text>::decode(&DateTimeCodec, "2018-06-16T12:34:56".to_string(), &root())
                .unwrap();
        assert_eq!(naive, Value::DateTime(dt));
    }

    #[test]
    fn null_text_is_empty_string() {
        assert_eq!(
            Codec::<Text>::encode(&NullCodec, &Value::Null, &root()).unwrap(),
            ""
        );
        assert!(Codec::<Text>::decode(&NullCodec, "x".to_string(), &root()).is_err());
    }

    #[test]
    fn encode_rejects_mismatched_runtime_kind() {
        assert!(Codec::<Text>::encode(&IntCodec, &Value::from("5"), &root()).is_err());
        assert!(Codec::<Json>::encode(&BoolCodec, &Value::Int(1), &root()).is_err());
    }

    #[test]
    fn binary_scalars_are_utf8_of_text() {
        let encoded = Codec::<Binary>::encode(&IntCodec, &Value::Int(42), &root()).unwrap();
        assert_eq!(encoded, b"42");
        assert_eq!(
            Codec::<Binary>::decode(&IntCodec, b"42".to_vec(), &root()).unwrap(),
            Value::Int(42)
        );
        assert_eq!(Codec::<Binary>::content_type(&IntCodec), TEXT_CONTENT_TYPE);
        assert_eq!(
            Codec::<Binary>::content_type(&BytesCodec),
            "application/octet-stream"
        );
    }
}
