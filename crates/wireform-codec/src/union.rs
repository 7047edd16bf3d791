//! Union and optional codecs.
//!
//! A union tries each alternative's codec in declared order and the first
//! success wins, for encode and decode alike. The greed is deliberate and
//! documented: `int | float` given `1` resolves to whichever alternative
//! was declared first, as part of the type's contract. Failed branches are
//! expected local events, not errors; only exhaustion raises.
//!
//! An optional type is the two-alternative case with null tried first.

use crate::wire::{Codec, Wire};
use crate::registry::ChildCodec;
use wireform_schema::{Bindings, DecodeError, EncodeError, Value};

pub struct UnionCodec<W: Wire> {
    alternatives: Vec<ChildCodec<W>>,
    /// Index of the alternative whose content type labels the union.
    content_from: usize,
}

impl<W: Wire> UnionCodec<W> {
    /// A union over alternatives in declared order.
    pub fn new(alternatives: Vec<ChildCodec<W>>) -> Self {
        Self {
            alternatives,
            content_from: 0,
        }
    }

    /// The optional form: null first, but labeled by the inner type.
    pub fn optional(null: ChildCodec<W>, inner: ChildCodec<W>) -> Self {
        Self {
            alternatives: vec![null, inner],
            content_from: 1,
        }
    }
}

impl<W: Wire> Codec<W> for UnionCodec<W> {
    fn encode(&self, value: &Value, bindings: &Bindings<'_>) -> Result<W::Repr, EncodeError> {
        for alternative in &self.alternatives {
            if let Ok(repr) = alternative.encode(value, bindings) {
                return Ok(repr);
            }
        }
        Err(EncodeError::new(format!(
            "value matches no union alternative; received {}",
            value.kind_name()
        )))
    }

    fn decode(&self, repr: W::Repr, bindings: &Bindings<'_>) -> Result<Value, DecodeError> {
        for alternative in &self.alternatives {
            if let Ok(value) = alternative.decode(repr.clone(), bindings) {
                return Ok(value);
            }
        }
        Err(DecodeError::new("value matches no union alternative"))
    }

    fn content_type(&self) -> &'static str {
        self.alternatives
            .get(self.content_from)
            .and_then(|alternative| alternative.content_type().ok())
            .unwrap_or(W::DEFAULT_CONTENT_TYPE)
    }
}
