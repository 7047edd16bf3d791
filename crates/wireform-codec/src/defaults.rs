//! Default matcher tables.
//!
//! One ordered list per wire, sealed when the engine is built. Order runs
//! from most specific shape to least; first match wins, and ties between
//! overlapping predicates are broken by position in the list. Custom
//! matchers registered through the builder precede all of these.

use crate::any::AnyCodec;
use crate::bridge::{JsonBytes, JsonText};
use crate::engine::Engine;
use crate::generic::{GenericCodec, TypeVarCodec};
use crate::iterable::{JsonIterableCodec, TextIterableCodec};
use crate::literal::LiteralCodec;
use crate::mapping::JsonMappingCodec;
use crate::record::JsonRecordCodec;
use crate::registry::{ChildCodec, Matcher};
use crate::scalar;
use crate::tuple::{JsonTupleCodec, TextTupleCodec, TupleArity};
use crate::union::UnionCodec;
use crate::wire::{Binary, Codec, Json, Text, Wire};
use std::sync::Arc;
use wireform_schema::{ResolveError, ScalarKind, Shape, TypeDescriptor};

fn no_codec<W: Wire>(descriptor: &TypeDescriptor) -> ResolveError {
    ResolveError::NoCodec {
        wire: W::NAME,
        shape: descriptor.shape_name(),
    }
}

fn is_scalar(d: &TypeDescriptor) -> bool {
    matches!(d.shape(), Shape::Scalar(_))
}

fn is_literal(d: &TypeDescriptor) -> bool {
    matches!(d.shape(), Shape::Literal(_))
}

fn is_union(d: &TypeDescriptor) -> bool {
    matches!(d.shape(), Shape::Optional(_) | Shape::Union(_))
}

fn is_tuple(d: &TypeDescriptor) -> bool {
    matches!(d.shape(), Shape::Tuple(_) | Shape::TupleVariadic(_))
}

fn is_set(d: &TypeDescriptor) -> bool {
    matches!(d.shape(), Shape::Set(_))
}

fn is_sequence(d: &TypeDescriptor) -> bool {
    matches!(d.shape(), Shape::Sequence(_))
}

fn is_mapping(d: &TypeDescriptor) -> bool {
    matches!(d.shape(), Shape::Mapping(_, _))
}

fn is_record(d: &TypeDescriptor) -> bool {
    matches!(d.shape(), Shape::Record(_))
}

fn is_generic(d: &TypeDescriptor) -> bool {
    matches!(d.shape(), Shape::Generic { .. })
}

fn is_typevar(d: &TypeDescriptor) -> bool {
    matches!(d.shape(), Shape::TypeVar(_))
}

fn is_any(d: &TypeDescriptor) -> bool {
    matches!(d.shape(), Shape::Any)
}

fn scalar_factory<W: Wire>(
    _: &Engine,
    descriptor: &TypeDescriptor,
) -> Result<Arc<dyn Codec<W>>, ResolveError>
where
    scalar::StrCodec: Codec<W>,
    scalar::BytesCodec: Codec<W>,
    scalar::IntCodec: Codec<W>,
    scalar::FloatCodec: Codec<W>,
    scalar::DecimalCodec: Codec<W>,
    scalar::BoolCodec: Codec<W>,
    scalar::NullCodec: Codec<W>,
    scalar::DateCodec: Codec<W>,
    scalar::DateTimeCodec: Codec<W>,
    scalar::UuidCodec: Codec<W>,
{
    match descriptor.shape() {
        Shape::Scalar(kind) => Ok(scalar::codec_for::<W>(*kind)),
        _ => Err(no_codec::<W>(descriptor)),
    }
}

fn literal_factory<W: Wire>(
    engine: &Engine,
    descriptor: &TypeDescriptor,
) -> Result<Arc<dyn Codec<W>>, ResolveError> {
    let Shape::Literal(members) = descriptor.shape() else {
        return Err(no_codec::<W>(descriptor));
    };
    let mut kinds: Vec<(ScalarKind, ChildCodec<W>)> = Vec::new();
    for member in members {
        let kind = ScalarKind::of(member)
            .ok_or_else(|| ResolveError::InvalidLiteral(member.kind_name().to_string()))?;
        if !kinds.iter().any(|(seen, _)| *seen == kind) {
            kinds.push((
                kind,
                ChildCodec::new(engine, TypeDescriptor::new(Shape::Scalar(kind))),
            ));
        }
    }
    Ok(Arc::new(LiteralCodec::new(members.clone(), kinds)))
}

fn union_factory<W: Wire>(
    engine: &Engine,
    descriptor: &TypeDescriptor,
) -> Result<Arc<dyn Codec<W>>, ResolveError> {
    match descriptor.shape() {
        Shape::Optional(inner) => Ok(Arc::new(UnionCodec::optional(
            ChildCodec::new(engine, TypeDescriptor::null()),
            ChildCodec::new(engine, (**inner).clone()),
        ))),
        Shape::Union(alternatives) => Ok(Arc::new(UnionCodec::new(
            alternatives
                .iter()
                .map(|alternative| ChildCodec::new(engine, alternative.clone()))
                .collect(),
        ))),
        _ => Err(no_codec::<W>(descriptor)),
    }
}

fn tuple_arity<W: Wire>(engine: &Engine, descriptor: &TypeDescriptor) -> Option<TupleArity<W>> {
    match descriptor.shape() {
        Shape::Tuple(elements) => Some(TupleArity::Fixed(
            elements
                .iter()
                .map(|element| ChildCodec::new(engine, element.clone()))
                .collect(),
        )),
        Shape::TupleVariadic(element) => Some(TupleArity::Variadic(ChildCodec::new(
            engine,
            (**element).clone(),
        ))),
        _ => None,
    }
}

fn text_tuple_factory(
    engine: &Engine,
    descriptor: &TypeDescriptor,
) -> Result<Arc<dyn Codec<Text>>, ResolveError> {
    tuple_arity(engine, descriptor)
        .map(|arity| Arc::new(TextTupleCodec::new(arity)) as Arc<dyn Codec<Text>>)
        .ok_or_else(|| no_codec::<Text>(descriptor))
}

fn json_tuple_factory(
    engine: &Engine,
    descriptor: &TypeDescriptor,
) -> Result<Arc<dyn Codec<Json>>, ResolveError> {
    tuple_arity(engine, descriptor)
        .map(|arity| Arc::new(JsonTupleCodec::new(arity)) as Arc<dyn Codec<Json>>)
        .ok_or_else(|| no_codec::<Json>(descriptor))
}

fn text_iterable_factory(
    engine: &Engine,
    descriptor: &TypeDescriptor,
) -> Result<Arc<dyn Codec<Text>>, ResolveError> {
    match descriptor.shape() {
        Shape::Sequence(element) => Ok(Arc::new(TextIterableCodec::new(
            ChildCodec::new(engine, (**element).clone()),
            false,
        ))),
        Shape::Set(element) => Ok(Arc::new(TextIterableCodec::new(
            ChildCodec::new(engine, (**element).clone()),
            true,
        ))),
        _ => Err(no_codec::<Text>(descriptor)),
    }
}

fn json_iterable_factory(
    engine: &Engine,
    descriptor: &TypeDescriptor,
) -> Result<Arc<dyn Codec<Json>>, ResolveError> {
    match descriptor.shape() {
        Shape::Sequence(element) => Ok(Arc::new(JsonIterableCodec::new(
            ChildCodec::new(engine, (**element).clone()),
            false,
        ))),
        Shape::Set(element) => Ok(Arc::new(JsonIterableCodec::new(
            ChildCodec::new(engine, (**element).clone()),
            true,
        ))),
        _ => Err(no_codec::<Json>(descriptor)),
    }
}

fn json_mapping_factory(
    engine: &Engine,
    descriptor: &TypeDescriptor,
) -> Result<Arc<dyn Codec<Json>>, ResolveError> {
    let Shape::Mapping(key, value) = descriptor.shape() else {
        return Err(no_codec::<Json>(descriptor));
    };
    // JSON object keys are strings: the key type goes through its text
    // codec regardless of the outer wire.
    Ok(Arc::new(JsonMappingCodec::new(
        ChildCodec::new(engine, (**key).clone()),
        ChildCodec::new(engine, (**value).clone()),
    )))
}

fn json_record_factory(
    engine: &Engine,
    descriptor: &TypeDescriptor,
) -> Result<Arc<dyn Codec<Json>>, ResolveError> {
    let Shape::Record(record) = descriptor.shape() else {
        return Err(no_codec::<Json>(descriptor));
    };
    Ok(Arc::new(JsonRecordCodec::new(record.clone(), engine.clone())))
}

fn text_bridge_factory(
    engine: &Engine,
    descriptor: &TypeDescriptor,
) -> Result<Arc<dyn Codec<Text>>, ResolveError> {
    Ok(Arc::new(JsonText::new(ChildCodec::new(
        engine,
        descriptor.clone(),
    ))))
}

fn binary_bridge_factory(
    engine: &Engine,
    descriptor: &TypeDescriptor,
) -> Result<Arc<dyn Codec<Binary>>, ResolveError> {
    Ok(Arc::new(JsonBytes::new(ChildCodec::new(
        engine,
        descriptor.clone(),
    ))))
}

fn generic_factory<W: Wire>(
    engine: &Engine,
    descriptor: &TypeDescriptor,
) -> Result<Arc<dyn Codec<W>>, ResolveError> {
    let Shape::Generic { origin, args } = descriptor.shape() else {
        return Err(no_codec::<W>(descriptor));
    };
    if origin.params().len() != args.len() {
        return Err(ResolveError::ArityMismatch {
            origin: origin.name().to_string(),
            expected: origin.params().len(),
            received: args.len(),
        });
    }
    Ok(Arc::new(GenericCodec::new(
        engine,
        origin.clone(),
        args.clone(),
    )))
}

fn typevar_factory<W: Wire>(
    engine: &Engine,
    descriptor: &TypeDescriptor,
) -> Result<Arc<dyn Codec<W>>, ResolveError> {
    let Shape::TypeVar(name) = descriptor.shape() else {
        return Err(no_codec::<W>(descriptor));
    };
    Ok(Arc::new(TypeVarCodec::new(engine, name.clone())))
}

fn any_factory<W: Wire>(
    engine: &Engine,
    descriptor: &TypeDescriptor,
) -> Result<Arc<dyn Codec<W>>, ResolveError>
where
    AnyCodec: Codec<W>,
{
    match descriptor.shape() {
        Shape::Any => Ok(Arc::new(AnyCodec::new(engine))),
        _ => Err(no_codec::<W>(descriptor)),
    }
}

pub(crate) fn text_matchers() -> Vec<Matcher<Text>> {
    vec![
        Matcher::new("scalar", is_scalar, scalar_factory::<Text>),
        Matcher::new("literal", is_literal, literal_factory::<Text>),
        Matcher::new("union", is_union, union_factory::<Text>),
        Matcher::new("tuple", is_tuple, text_tuple_factory),
        Matcher::new("set", is_set, text_iterable_factory),
        Matcher::new("sequence", is_sequence, text_iterable_factory),
        Matcher::new("mapping", is_mapping, text_bridge_factory),
        Matcher::new("record", is_record, text_bridge_factory),
        Matcher::new("generic", is_generic, generic_factory::<Text>),
        Matcher::new("typevar", is_typevar, typevar_factory::<Text>),
        Matcher::new("any", is_any, any_factory::<Text>),
    ]
}

pub(crate) fn binary_matchers() -> Vec<Matcher<Binary>> {
    vec![
        Matcher::new("scalar", is_scalar, scalar_factory::<Binary>),
        Matcher::new("literal", is_literal, literal_factory::<Binary>),
        Matcher::new("union", is_union, union_factory::<Binary>),
        Matcher::new("tuple", is_tuple, binary_bridge_factory),
        Matcher::new("set", is_set, binary_bridge_factory),
        Matcher::new("sequence", is_sequence, binary_bridge_factory),
        Matcher::new("mapping", is_mapping, binary_bridge_factory),
        Matcher::new("record", is_record, binary_bridge_factory),
        Matcher::new("generic", is_generic, generic_factory::<Binary>),
        Matcher::new("typevar", is_typevar, typevar_factory::<Binary>),
        Matcher::new("any", is_any, any_factory::<Binary>),
    ]
}

pub(crate) fn json_matchers() -> Vec<Matcher<Json>> {
    vec![
        Matcher::new("scalar", is_scalar, scalar_factory::<Json>),
        Matcher::new("literal", is_literal, literal_factory::<Json>),
        Matcher::new("union", is_union, union_factory::<Json>),
        Matcher::new("tuple", is_tuple, json_tuple_factory),
        Matcher::new("set", is_set, json_iterable_factory),
        Matcher::new("sequence", is_sequence, json_iterable_factory),
        Matcher::new("mapping", is_mapping, json_mapping_factory),
        Matcher::new("record", is_record, json_record_factory),
        Matcher::new("generic", is_generic, generic_factory::<Json>),
        Matcher::new("typevar", is_typevar, typevar_factory::<Json>),
        Matcher::new("any", is_any, any_factory::<Json>),
    ]
}
