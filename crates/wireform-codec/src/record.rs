//! Record codecs.
//!
//! A record encodes as a JSON object of its declared fields under their
//! wire names. Optional fields that are absent (or null) are omitted from
//! the output rather than encoded as null — a deliberate asymmetry with
//! decode, which resolves a missing optional field to null and fails a
//! missing required field with that field's name as the error path.
//!
//! Field codecs are resolved lazily, on first use: a record may contain a
//! field of its own type, and eager resolution would recurse forever.

use crate::registry::ChildCodec;
use crate::engine::Engine;
use crate::wire::{Codec, Json};
use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};
use wireform_schema::{
    Bindings, DecodeError, EncodeError, RecordType, ResolveError, TypeDescriptor, Value,
};

struct FieldCodec {
    name: String,
    wire_name: String,
    optional: bool,
    codec: ChildCodec<Json>,
}

pub struct JsonRecordCodec {
    record: Arc<RecordType>,
    engine: Engine,
    fields: OnceLock<Result<Vec<FieldCodec>, ResolveError>>,
}

impl JsonRecordCodec {
    pub fn new(record: Arc<RecordType>, engine: Engine) -> Self {
        Self {
            record,
            engine,
            fields: OnceLock::new(),
        }
    }

    fn field_codecs(&self) -> Result<&[FieldCodec], ResolveError> {
        self.fields
            .get_or_init(|| {
                let fields = self.record.defined_fields()?;
                Ok(fields
                    .iter()
                    .map(|field| FieldCodec {
                        name: field.name().to_string(),
                        wire_name: field.wire_name().to_string(),
                        optional: field.is_optional(),
                        codec: ChildCodec::new(&self.engine, field.descriptor().clone()),
                    })
                    .collect())
            })
            .as_deref()
            .map_err(Clone::clone)
    }
}

impl Codec<Json> for JsonRecordCodec {
    fn encode(
        &self,
        value: &Value,
        bindings: &Bindings<'_>,
    ) -> Result<serde_json::Value, EncodeError> {
        let Value::Record(entries) = value else {
            return Err(EncodeError::mismatch("record", value));
        };
        let fields = self
            .field_codecs()
            .map_err(|err| EncodeError::new(err.to_string()))?;
        let mut object = serde_json::Map::new();
        for field in fields {
            match entries.get(&field.name) {
                // Absent optional fields are omitted, not encoded as null.
                Some(Value::Null) | None if field.optional => {}
                Some(item) => {
                    let encoded = field
                        .codec
                        .encode(item, bindings)
                        .map_err(|e| e.in_field(field.name.clone()))?;
                    object.insert(field.wire_name.clone(), encoded);
                }
                None => {
                    return Err(EncodeError::new("missing required field")
                        .in_field(field.name.clone()));
                }
            }
        }
        Ok(serde_json::Value::Object(object))
    }

    fn decode(
        &self,
        repr: serde_json::Value,
        bindings: &Bindings<'_>,
    ) -> Result<Value, DecodeError> {
        let serde_json::Value::Object(mut object) = repr else {
            return Err(DecodeError::new(format!(
                "expecting an object; received {}",
                crate::scalar::json_kind(&repr)
            )));
        };
        let fields = self
            .field_codecs()
            .map_err(|err| DecodeError::new(err.to_string()))?;
        let mut entries = BTreeMap::new();
        for field in fields {
            match object.remove(&field.wire_name) {
                Some(item) => {
                    let decoded = field
                        .codec
                        .decode(item, bindings)
                        .map_err(|e| e.in_field(field.name.clone()))?;
                    entries.insert(field.name.clone(), decoded);
                }
                None if field.optional => {
                    entries.insert(field.name.clone(), Value::Null);
                }
                None => {
                    return Err(DecodeError::new("missing required field")
                        .in_field(field.name.clone()));
                }
            }
        }
        // Undeclared keys in the representation are ignored: records are
        // closed types.
        Ok(Value::Record(entries))
    }
}
