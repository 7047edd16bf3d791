//! Literal codecs.
//!
//! A literal type is a finite set of exact scalar members, possibly of
//! mixed kinds: `1 | "a" | true`. Membership is kind-sensitive — the
//! integer `1` and the boolean `true` are distinct members even where
//! other type systems conflate them.

use crate::registry::ChildCodec;
use crate::wire::{Codec, Wire};
use wireform_schema::{Bindings, DecodeError, EncodeError, ScalarKind, Value};

pub struct LiteralCodec<W: Wire> {
    members: Vec<Value>,
    /// One scalar codec per distinct member kind, in first-appearance order.
    kinds: Vec<(ScalarKind, ChildCodec<W>)>,
}

impl<W: Wire> LiteralCodec<W> {
    pub fn new(members: Vec<Value>, kinds: Vec<(ScalarKind, ChildCodec<W>)>) -> Self {
        Self { members, kinds }
    }

    fn member_error(&self) -> String {
        format!(
            "expecting one of {} literal members",
            self.members.len()
        )
    }
}

impl<W: Wire> Codec<W> for LiteralCodec<W> {
    fn encode(&self, value: &Value, bindings: &Bindings<'_>) -> Result<W::Repr, EncodeError> {
        // Value equality is kind-sensitive, so Int(1) never matches a
        // Bool(true) member.
        if !self.members.contains(value) {
            return Err(EncodeError::new(self.member_error()));
        }
        let kind = ScalarKind::of(value)
            .ok_or_else(|| EncodeError::mismatch("a scalar literal member", value))?;
        let codec = self
            .kinds
            .iter()
            .find_map(|(k, codec)| (*k == kind).then_some(codec))
            .ok_or_else(|| EncodeError::new(self.member_error()))?;
        codec.encode(value, bindings)
    }

    fn decode(&self, repr: W::Repr, bindings: &Bindings<'_>) -> Result<Value, DecodeError> {
        // Try each member kind's scalar codec; accept only decoded values
        // that are members. A "1" in Literal["1", 1] decodes by whichever
        // kind appears first among the members.
        for (_, codec) in &self.kinds {
            if let Ok(value) = codec.decode(repr.clone(), bindings) {
                if self.members.contains(&value) {
                    return Ok(value);
                }
            }
        }
        Err(DecodeError::new(self.member_error()))
    }
}
