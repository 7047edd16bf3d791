//! Matcher registries and the codec cache.
//!
//! A registry holds an ordered list of `(predicate, factory)` matchers,
//! sealed at engine construction, and a memoizing cache keyed by exact
//! type descriptor. Resolution scans matchers in order and the first
//! predicate that accepts the descriptor wins, so specific matchers must be
//! registered ahead of general ones.
//!
//! Cache entries are created once and never evicted or mutated. Population
//! races are benign: codec construction is a pure function of the
//! descriptor, so concurrent callers either share one slot's single
//! initialization or at worst duplicate identical work. The cache is an
//! optimization, never a correctness dependency.

use crate::engine::Engine;
use crate::wire::{Codec, Wire};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};
use wireform_schema::{
    Bindings, DecodeError, EncodeError, ResolveError, TypeDescriptor, Value,
};

type Factory<W> = fn(&Engine, &TypeDescriptor) -> Result<Arc<dyn Codec<W>>, ResolveError>;

type Slot<W> = Arc<OnceLock<Result<Arc<dyn Codec<W>>, ResolveError>>>;

/// One entry in a registry's ordered matcher list.
pub struct Matcher<W: Wire> {
    name: &'static str,
    predicate: fn(&TypeDescriptor) -> bool,
    factory: Factory<W>,
}

impl<W: Wire> Matcher<W> {
    pub fn new(
        name: &'static str,
        predicate: fn(&TypeDescriptor) -> bool,
        factory: Factory<W>,
    ) -> Self {
        Self {
            name,
            predicate,
            factory,
        }
    }
}

/// A sealed matcher list plus its codec cache, for one wire.
pub struct Registry<W: Wire> {
    matchers: Vec<Matcher<W>>,
    cache: RwLock<HashMap<TypeDescriptor, Slot<W>>>,
}

impl<W: Wire> Registry<W> {
    pub(crate) fn new(matchers: Vec<Matcher<W>>) -> Self {
        Self {
            matchers,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Resolve a descriptor to its codec, constructing and caching on the
    /// first request.
    ///
    /// The cache slot is published before construction runs, so a
    /// descriptor that resolves back into itself while its codec tree is
    /// being built observes the forward-declared slot instead of recursing.
    pub(crate) fn get(
        &self,
        engine: &Engine,
        descriptor: &TypeDescriptor,
    ) -> Result<Arc<dyn Codec<W>>, ResolveError> {
        let slot = match self.cached(descriptor) {
            Some(slot) => slot,
            None => self.insert_slot(descriptor),
        };
        slot.get_or_init(|| self.build(engine, descriptor)).clone()
    }

    fn cached(&self, descriptor: &TypeDescriptor) -> Option<Slot<W>> {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(descriptor)
            .cloned()
    }

    fn insert_slot(&self, descriptor: &TypeDescriptor) -> Slot<W> {
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(descriptor.clone())
            .or_default()
            .clone()
    }

    fn build(
        &self,
        engine: &Engine,
        descriptor: &TypeDescriptor,
    ) -> Result<Arc<dyn Codec<W>>, ResolveError> {
        for matcher in &self.matchers {
            if (matcher.predicate)(descriptor) {
                tracing::debug!(
                    wire = W::NAME,
                    matcher = matcher.name,
                    shape = %descriptor.shape_name(),
                    "constructing codec"
                );
                return (matcher.factory)(engine, descriptor);
            }
        }
        Err(ResolveError::NoCodec {
            wire: W::NAME,
            shape: descriptor.shape_name(),
        })
    }
}

/// A lazily resolved handle to another codec in the same engine.
///
/// Composite codecs hold these instead of resolved children: resolution
/// happens on first use, never during construction, which is what lets a
/// record type contain a field of its own type without infinite recursion.
pub struct ChildCodec<W: Wire> {
    engine: Engine,
    descriptor: TypeDescriptor,
    slot: OnceLock<Result<Arc<dyn Codec<W>>, ResolveError>>,
}

impl<W: Wire> ChildCodec<W> {
    pub fn new(engine: &Engine, descriptor: TypeDescriptor) -> Self {
        Self {
            engine: engine.clone(),
            descriptor,
            slot: OnceLock::new(),
        }
    }

    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    fn resolved(&self) -> Result<&Arc<dyn Codec<W>>, ResolveError> {
        self.slot
            .get_or_init(|| self.engine.codec::<W>(&self.descriptor))
            .as_ref()
            .map_err(Clone::clone)
    }

    pub fn encode(&self, value: &Value, bindings: &Bindings<'_>) -> Result<W::Repr, EncodeError> {
        match self.resolved() {
            Ok(codec) => codec.encode(value, bindings),
            Err(err) => Err(EncodeError::new(err.to_string())),
        }
    }

    pub fn decode(&self, repr: W::Repr, bindings: &Bindings<'_>) -> Result<Value, DecodeError> {
        match self.resolved() {
            Ok(codec) => codec.decode(repr, bindings),
            Err(err) => Err(DecodeError::new(err.to_string())),
        }
    }

    /// Content type of the resolved child, if it resolves.
    pub fn content_type(&self) -> Result<&'static str, ResolveError> {
        self.resolved().map(|codec| codec.content_type())
    }
}
