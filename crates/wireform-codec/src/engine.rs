//! The codec engine.
//!
//! An [`Engine`] owns three registries, one per wire representation, each
//! with its own sealed matcher order and codec cache. A type may therefore
//! resolve to three different codecs, one per wire.
//!
//! Engines are cheap to clone (shared interior) and safe to share across
//! threads. Most callers use the process-wide [`engine()`]; tests and
//! embedders needing custom matchers build their own via
//! [`Engine::builder`].

use crate::defaults;
use crate::registry::{Matcher, Registry};
use crate::wire::{Binary, Codec, Json, Text, Wire};
use std::sync::{Arc, LazyLock};
use wireform_schema::{ResolveError, TypeDescriptor};

pub(crate) struct EngineInner {
    pub(crate) text: Registry<Text>,
    pub(crate) binary: Registry<Binary>,
    pub(crate) json: Registry<Json>,
}

/// A sealed set of codec registries.
#[derive(Clone)]
pub struct Engine {
    inner: Arc<EngineInner>,
}

impl Engine {
    /// An engine with the default matcher set.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub(crate) fn inner(&self) -> &EngineInner {
        &self.inner
    }

    /// Resolve a descriptor to a codec for wire `W`.
    pub fn codec<W: Wire>(
        &self,
        descriptor: &TypeDescriptor,
    ) -> Result<Arc<dyn Codec<W>>, ResolveError> {
        W::registry(self).get(self, descriptor)
    }

    pub fn text_codec(
        &self,
        descriptor: &TypeDescriptor,
    ) -> Result<Arc<dyn Codec<Text>>, ResolveError> {
        self.codec::<Text>(descriptor)
    }

    pub fn binary_codec(
        &self,
        descriptor: &TypeDescriptor,
    ) -> Result<Arc<dyn Codec<Binary>>, ResolveError> {
        self.codec::<Binary>(descriptor)
    }

    pub fn json_codec(
        &self,
        descriptor: &TypeDescriptor,
    ) -> Result<Arc<dyn Codec<Json>>, ResolveError> {
        self.codec::<Json>(descriptor)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

/// The process-wide default engine, built once on first use.
pub fn engine() -> &'static Engine {
    static ENGINE: LazyLock<Engine> = LazyLock::new(Engine::new);
    &ENGINE
}

/// Assembles an engine's matcher registries.
///
/// Custom matchers are consulted ahead of the defaults, in the order they
/// were registered; registration order is the tie-break for overlapping
/// predicates, so callers control it deterministically. The order seals
/// when [`EngineBuilder::build`] runs.
#[derive(Default)]
pub struct EngineBuilder {
    text: Vec<Matcher<Text>>,
    binary: Vec<Matcher<Binary>>,
    json: Vec<Matcher<Json>>,
}

impl EngineBuilder {
    pub fn text_matcher(mut self, matcher: Matcher<Text>) -> Self {
        self.text.push(matcher);
        self
    }

    pub fn binary_matcher(mut self, matcher: Matcher<Binary>) -> Self {
        self.binary.push(matcher);
        self
    }

    pub fn json_matcher(mut self, matcher: Matcher<Json>) -> Self {
        self.json.push(matcher);
        self
    }

    pub fn build(self) -> Engine {
        let text = self.text.into_iter().chain(defaults::text_matchers());
        let binary = self.binary.into_iter().chain(defaults::binary_matchers());
        let json = self.json.into_iter().chain(defaults::json_matchers());
        Engine {
            inner: Arc::new(EngineInner {
                text: Registry::new(text.collect()),
                binary: Registry::new(binary.collect()),
                json: Registry::new(json.collect()),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wireform_schema::{Annotation, Bindings, ResolveError, ScalarKind, Shape, Value};

    struct UppercaseCodec;

    impl Codec<Text> for UppercaseCodec {
        fn encode(
            &self,
            value: &Value,
            _: &Bindings<'_>,
        ) -> Result<String, wireform_schema::EncodeError> {
            match value {
                Value::Str(s) => Ok(s.to_uppercase()),
                other => Err(wireform_schema::EncodeError::mismatch("str", other)),
            }
        }

        fn decode(
            &self,
            repr: String,
            _: &Bindings<'_>,
        ) -> Result<Value, wireform_schema::DecodeError> {
            Ok(Value::Str(repr.to_lowercase()))
        }
    }

    fn is_str(descriptor: &TypeDescriptor) -> bool {
        matches!(descriptor.shape(), Shape::Scalar(ScalarKind::Str))
    }

    fn uppercase_factory(
        _: &Engine,
        _: &TypeDescriptor,
    ) -> Result<Arc<dyn Codec<Text>>, ResolveError> {
        Ok(Arc::new(UppercaseCodec))
    }

    #[test]
    fn custom_matchers_precede_defaults() {
        let custom = Engine::builder()
            .text_matcher(Matcher::new("uppercase", is_str, uppercase_factory))
            .build();
        let codec = custom.text_codec(&TypeDescriptor::str()).unwrap();
        let encoded = codec.encode(&Value::from("abc"), &Bindings::root()).unwrap();
        assert_eq!(encoded, "ABC");

        // A default engine is unaffected.
        let stock = Engine::new();
        let codec = stock.text_codec(&TypeDescriptor::str()).unwrap();
        let encoded = codec.encode(&Value::from("abc"), &Bindings::root()).unwrap();
        assert_eq!(encoded, "abc");
    }

    #[test]
    fn codecs_are_cached_per_exact_descriptor() {
        let engine = Engine::new();
        let first = engine.text_codec(&TypeDescriptor::int()).unwrap();
        let second = engine.text_codec(&TypeDescriptor::int()).unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        // Metadata is part of the cache key.
        let annotated = TypeDescriptor::int().annotated(Annotation::MinValue(Value::Int(0)));
        let third = engine.text_codec(&annotated).unwrap();
        assert!(!Arc::ptr_eq(&first, &third));
    }
}
