//! Tabular text codecs.
//!
//! Text-wire codecs for values destined for spreadsheets and CSV exports:
//! currency, percent, and fixed-point renderings of numeric types, plus a
//! row codec that lays a record out as an ordered list of column strings.

use crate::csv;
use crate::engine::Engine;
use crate::wire::{Codec, Text};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::Arc;
use wireform_schema::{
    Bindings, DecodeError, EncodeError, RecordType, ResolveError, Value,
};

/// Format a numeric value, optionally at fixed-point precision.
///
/// With no precision, trailing fractional zeros are trimmed.
fn format_number(value: &Value, precision: Option<u32>) -> Result<String, EncodeError> {
    let text = match (value, precision) {
        (Value::Int(i), None) => i.to_string(),
        (Value::Int(i), Some(p)) => format!("{:.*}", p as usize, *i as f64),
        (Value::Float(f), None) => f.to_string(),
        (Value::Float(f), Some(p)) => format!("{:.*}", p as usize, f),
        (Value::Decimal(d), None) => d.normalize().to_string(),
        (Value::Decimal(d), Some(p)) => format!("{:.*}", p as usize, d.round_dp(p)),
        (other, _) => return Err(EncodeError::mismatch("a number", other)),
    };
    Ok(text)
}

fn round_value(value: Value, precision: Option<u32>) -> Value {
    match (value, precision) {
        (Value::Float(f), Some(p)) => {
            let scale = 10f64.powi(p as i32);
            Value::Float((f * scale).round() / scale)
        }
        (Value::Decimal(d), Some(p)) => Value::Decimal(d.round_dp(p)),
        (value, _) => value,
    }
}

/// A currency rendering of a numeric type: optional prefix and suffix
/// adornments around a fixed-point number. Null encodes as the empty
/// string.
pub struct CurrencyCodec {
    inner: Arc<dyn Codec<Text>>,
    prefix: String,
    suffix: String,
    precision: Option<u32>,
}

impl CurrencyCodec {
    pub fn new(
        engine: &Engine,
        descriptor: &wireform_schema::TypeDescriptor,
        prefix: impl Into<String>,
        suffix: impl Into<String>,
        precision: Option<u32>,
    ) -> Result<Self, ResolveError> {
        Ok(Self {
            inner: engine.text_codec(descriptor)?,
            prefix: prefix.into(),
            suffix: suffix.into(),
            precision,
        })
    }
}

impl Codec<Text> for CurrencyCodec {
    fn encode(&self, value: &Value, _: &Bindings<'_>) -> Result<String, EncodeError> {
        if value.is_null() {
            return Ok(String::new());
        }
        Ok(format!(
            "{}{}{}",
            self.prefix,
            format_number(value, self.precision)?,
            self.suffix
        ))
    }

    fn decode(&self, repr: String, bindings: &Bindings<'_>) -> Result<Value, DecodeError> {
        let mut stripped = repr.as_str();
        if let Some(rest) = stripped.strip_prefix(self.prefix.as_str()) {
            stripped = rest;
        }
        if let Some(rest) = stripped.strip_suffix(self.suffix.as_str()) {
            stripped = rest;
        }
        let decoded = self.inner.decode(stripped.to_string(), bindings)?;
        Ok(round_value(decoded, self.precision))
    }
}

/// A percentage rendering of a fractional numeric type: the value times
/// one hundred, at fixed-point precision, with a trailing `%`.
pub struct PercentCodec {
    inner: Arc<dyn Codec<Text>>,
    precision: u32,
}

impl PercentCodec {
    pub fn new(
        engine: &Engine,
        descriptor: &wireform_schema::TypeDescriptor,
        precision: u32,
    ) -> Result<Self, ResolveError> {
        Ok(Self {
            inner: engine.text_codec(descriptor)?,
            precision,
        })
    }
}

impl Codec<Text> for PercentCodec {
    fn encode(&self, value: &Value, _: &Bindings<'_>) -> Result<String, EncodeError> {
        let scaled = match value {
            Value::Int(i) => Value::Int(i * 100),
            Value::Float(f) => Value::Float(f * 100.0),
            Value::Decimal(d) => Value::Decimal(d * Decimal::from(100)),
            other => return Err(EncodeError::mismatch("a number", other)),
        };
        Ok(format!(
            "{}%",
            format_number(&scaled, Some(self.precision))?
        ))
    }

    fn decode(&self, repr: String, bindings: &Bindings<'_>) -> Result<Value, DecodeError> {
        let stripped = repr.strip_suffix('%').unwrap_or(&repr);
        let decoded = self.inner.decode(stripped.to_string(), bindings)?;
        let fraction = match decoded {
            Value::Float(f) => Value::Float(f / 100.0),
            Value::Decimal(d) => Value::Decimal(d / Decimal::from(100)),
            other => other,
        };
        Ok(round_value(fraction, Some(self.precision + 2)))
    }
}

/// A fixed-point rendering of a numeric type.
pub struct FixedCodec {
    inner: Arc<dyn Codec<Text>>,
    precision: u32,
}

impl FixedCodec {
    pub fn new(
        engine: &Engine,
        descriptor: &wireform_schema::TypeDescriptor,
        precision: u32,
    ) -> Result<Self, ResolveError> {
        Ok(Self {
            inner: engine.text_codec(descriptor)?,
            precision,
        })
    }
}

impl Codec<Text> for FixedCodec {
    fn encode(&self, value: &Value, _: &Bindings<'_>) -> Result<String, EncodeError> {
        if value.is_null() {
            return Ok(String::new());
        }
        format_number(value, Some(self.precision))
    }

    fn decode(&self, repr: String, bindings: &Bindings<'_>) -> Result<Value, DecodeError> {
        let decoded = self.inner.decode(repr, bindings)?;
        Ok(round_value(decoded, Some(self.precision)))
    }
}

struct Column {
    name: String,
    /// Field this column maps to; unmapped columns encode empty and are
    /// ignored on decode.
    field: Option<MappedField>,
}

struct MappedField {
    name: String,
    optional: bool,
    codec: Arc<dyn Codec<Text>>,
}

/// Encodes a record to and from an ordered row of column strings.
pub struct RowCodec {
    columns: Vec<Column>,
    field_names: Vec<(String, bool)>,
}

impl RowCodec {
    pub fn builder(record: Arc<RecordType>) -> RowCodecBuilder {
        RowCodecBuilder {
            record,
            columns: None,
            fields: BTreeMap::new(),
            codecs: BTreeMap::new(),
        }
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|column| column.name.as_str())
    }

    /// Encode a record as one row. Null in an optional field becomes an
    /// empty cell.
    pub fn encode(&self, value: &Value, bindings: &Bindings<'_>) -> Result<Vec<String>, EncodeError> {
        let Value::Record(entries) = value else {
            return Err(EncodeError::mismatch("record", value));
        };
        let mut row = Vec::with_capacity(self.columns.len());
        for column in &self.columns {
            let Some(mapped) = &column.field else {
                row.push(String::new());
                continue;
            };
            match entries.get(&mapped.name) {
                Some(Value::Null) | None if mapped.optional => row.push(String::new()),
                Some(item) => row.push(
                    mapped
                        .codec
                        .encode(item, bindings)
                        .map_err(|e| e.in_field(mapped.name.clone()))?,
                ),
                None => {
                    return Err(EncodeError::new("missing required field")
                        .in_field(mapped.name.clone()));
                }
            }
        }
        Ok(row)
    }

    /// Decode one row into a record. Empty cells in optional fields decode
    /// to null; unmapped columns are ignored.
    pub fn decode(&self, row: &[String], bindings: &Bindings<'_>) -> Result<Value, DecodeError> {
        let mut entries = BTreeMap::new();
        for (column, cell) in self.columns.iter().zip(row) {
            let Some(mapped) = &column.field else {
                continue;
            };
            if cell.is_empty() && mapped.optional {
                entries.insert(mapped.name.clone(), Value::Null);
            } else {
                let decoded = mapped
                    .codec
                    .decode(cell.clone(), bindings)
                    .map_err(|e| e.in_field(mapped.name.clone()))?;
                entries.insert(mapped.name.clone(), decoded);
            }
        }
        for (name, optional) in &self.field_names {
            if !entries.contains_key(name) {
                if *optional {
                    entries.insert(name.clone(), Value::Null);
                } else {
                    return Err(
                        DecodeError::new("missing required field").in_field(name.clone())
                    );
                }
            }
        }
        Ok(Value::Record(entries))
    }

    /// Encode a record as one CSV line.
    pub fn encode_line(&self, value: &Value, bindings: &Bindings<'_>) -> Result<String, EncodeError> {
        Ok(csv::encode_row(&self.encode(value, bindings)?))
    }

    /// Decode one CSV line into a record.
    pub fn decode_line(&self, line: &str, bindings: &Bindings<'_>) -> Result<Value, DecodeError> {
        self.decode(&csv::decode_row(line)?, bindings)
    }
}

/// Assembles a [`RowCodec`]: column selection and order, column-to-field
/// mapping, and per-column codec overrides.
pub struct RowCodecBuilder {
    record: Arc<RecordType>,
    columns: Option<Vec<String>>,
    fields: BTreeMap<String, String>,
    codecs: BTreeMap<String, Arc<dyn Codec<Text>>>,
}

impl RowCodecBuilder {
    /// Select columns and their order. Defaults to all fields in
    /// declaration order.
    pub fn columns(mut self, columns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Map a column to a differently named field.
    pub fn map_column(mut self, column: impl Into<String>, field: impl Into<String>) -> Self {
        self.fields.insert(column.into(), field.into());
        self
    }

    /// Override the codec used for one column.
    pub fn column_codec(mut self, column: impl Into<String>, codec: Arc<dyn Codec<Text>>) -> Self {
        self.codecs.insert(column.into(), codec);
        self
    }

    pub fn build(mut self, engine: &Engine) -> Result<RowCodec, ResolveError> {
        let fields = self.record.defined_fields()?;
        let column_names = self.columns.take().unwrap_or_else(|| {
            fields.iter().map(|field| field.name().to_string()).collect()
        });
        let mut columns = Vec::with_capacity(column_names.len());
        for name in column_names {
            let field_name = self.fields.get(&name).cloned().unwrap_or_else(|| name.clone());
            let field = match self.record.field(&field_name) {
                Some(field) => {
                    let codec = match self.codecs.remove(&name) {
                        Some(codec) => codec,
                        None => engine.text_codec(field.descriptor())?,
                    };
                    Some(MappedField {
                        name: field_name,
                        optional: field.is_optional(),
                        codec,
                    })
                }
                None => None,
            };
            columns.push(Column { name, field });
        }
        let field_names = fields
            .iter()
            .map(|field| (field.name().to_string(), field.is_optional()))
            .collect();
        Ok(RowCodec {
            columns,
            field_names,
        })
    }
}
