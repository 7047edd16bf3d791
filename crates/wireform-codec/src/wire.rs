//! Wire representations and the codec contract.
//!
//! A value can travel in three forms: a human-readable string, a binary
//! byte sequence, and a JSON object-model value. Each form is a [`Wire`]
//! marker type; a [`Codec`] converts between in-memory [`Value`]s and one
//! wire's representation.
//!
//! Codecs are stateless once constructed and shared behind `Arc`; the
//! engine owns one codec per (wire, descriptor) pair.

use crate::engine::Engine;
use crate::registry::Registry;
use wireform_schema::{Bindings, DecodeError, EncodeError, Value};

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Text {}
    impl Sealed for super::Binary {}
    impl Sealed for super::Json {}
}

/// A wire representation. Implemented by [`Text`], [`Binary`], and [`Json`]
/// only.
pub trait Wire: sealed::Sealed + Send + Sync + 'static {
    /// The representation values take on this wire.
    type Repr: Clone + Send + Sync + 'static;

    /// Wire name used in diagnostics.
    const NAME: &'static str;

    /// Content type reported by codecs that do not override it.
    const DEFAULT_CONTENT_TYPE: &'static str;

    #[doc(hidden)]
    fn registry(engine: &Engine) -> &Registry<Self>
    where
        Self: Sized;
}

/// Human-readable string representation.
pub enum Text {}

/// Binary byte-sequence representation.
pub enum Binary {}

/// JSON object-model representation.
pub enum Json {}

impl Wire for Text {
    type Repr = String;
    const NAME: &'static str = "text";
    const DEFAULT_CONTENT_TYPE: &'static str = "text/plain; charset=UTF-8";

    fn registry(engine: &Engine) -> &Registry<Self> {
        &engine.inner().text
    }
}

impl Wire for Binary {
    type Repr = Vec<u8>;
    const NAME: &'static str = "binary";
    const DEFAULT_CONTENT_TYPE: &'static str = "application/octet-stream";

    fn registry(engine: &Engine) -> &Registry<Self> {
        &engine.inner().binary
    }
}

impl Wire for Json {
    type Repr = serde_json::Value;
    const NAME: &'static str = "json";
    const DEFAULT_CONTENT_TYPE: &'static str = "application/json";

    fn registry(engine: &Engine) -> &Registry<Self> {
        &engine.inner().json
    }
}

/// Converts values to and from one wire representation.
///
/// Encode reports a malformed in-memory value; decode reports malformed
/// wire data. Neither attaches path segments to its own failures — the
/// enclosing composite codec prepends the segment for its child.
///
/// `bindings` carries generic type-parameter captures for the duration of
/// one call tree; pass [`Bindings::root()`] outside generic contexts.
pub trait Codec<W: Wire>: Send + Sync {
    fn encode(&self, value: &Value, bindings: &Bindings<'_>) -> Result<W::Repr, EncodeError>;

    fn decode(&self, repr: W::Repr, bindings: &Bindings<'_>) -> Result<Value, DecodeError>;

    /// The content type of this codec's output.
    ///
    /// A fixed label consumed by transport layers for response headers;
    /// the engine attaches no behavior to it.
    fn content_type(&self) -> &'static str {
        W::DEFAULT_CONTENT_TYPE
    }
}
