//! Type descriptors.
//!
//! A `TypeDescriptor` is the canonical, immutable description of a type:
//! its structural shape, nested descriptors for container shapes, and any
//! attached annotation metadata. Descriptors are structurally comparable and
//! hashable, which makes them usable directly as codec cache keys —
//! constructing the same annotation twice yields descriptor-equal instances.

use crate::metadata::Annotation;
use crate::record::RecordType;
use crate::value::Value;
use std::sync::Arc;

/// The primitive kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Str,
    Bytes,
    Int,
    Float,
    Decimal,
    Bool,
    Null,
    Date,
    DateTime,
    Uuid,
}

impl ScalarKind {
    pub fn name(&self) -> &'static str {
        match self {
            ScalarKind::Str => "str",
            ScalarKind::Bytes => "bytes",
            ScalarKind::Int => "int",
            ScalarKind::Float => "float",
            ScalarKind::Decimal => "decimal",
            ScalarKind::Bool => "bool",
            ScalarKind::Null => "null",
            ScalarKind::Date => "date",
            ScalarKind::DateTime => "datetime",
            ScalarKind::Uuid => "uuid",
        }
    }

    /// The scalar kind of a scalar value, `None` for containers.
    pub fn of(value: &Value) -> Option<ScalarKind> {
        match value {
            Value::Null => Some(ScalarKind::Null),
            Value::Bool(_) => Some(ScalarKind::Bool),
            Value::Int(_) => Some(ScalarKind::Int),
            Value::Float(_) => Some(ScalarKind::Float),
            Value::Decimal(_) => Some(ScalarKind::Decimal),
            Value::Str(_) => Some(ScalarKind::Str),
            Value::Bytes(_) => Some(ScalarKind::Bytes),
            Value::Date(_) => Some(ScalarKind::Date),
            Value::DateTime(_) => Some(ScalarKind::DateTime),
            Value::Uuid(_) => Some(ScalarKind::Uuid),
            _ => None,
        }
    }
}

/// The structural shape of a type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Shape {
    /// A primitive value.
    Scalar(ScalarKind),
    /// A value or null; equivalent to a two-alternative union with null
    /// checked first.
    Optional(Box<TypeDescriptor>),
    /// One of several alternatives, tried in declared order.
    Union(Vec<TypeDescriptor>),
    /// A finite set of exact scalar values, possibly of mixed kinds.
    Literal(Vec<Value>),
    /// Fixed-arity positional elements, one descriptor per position.
    Tuple(Vec<TypeDescriptor>),
    /// Any number of positional elements of one type.
    TupleVariadic(Box<TypeDescriptor>),
    /// An ordered sequence.
    Sequence(Box<TypeDescriptor>),
    /// An unordered collection of distinct elements.
    Set(Box<TypeDescriptor>),
    /// Keys of one type mapped to values of another.
    Mapping(Box<TypeDescriptor>, Box<TypeDescriptor>),
    /// A named record with fixed fields.
    Record(Arc<RecordType>),
    /// A generic record instantiation, binding the origin's formal
    /// parameters to concrete arguments.
    Generic {
        origin: Arc<RecordType>,
        args: Vec<TypeDescriptor>,
    },
    /// An open type parameter, resolved through capture bindings.
    TypeVar(String),
    /// Any value; shape is taken from the value at run time.
    Any,
}

/// An immutable type description: shape plus annotation metadata.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
    shape: Shape,
    metadata: Vec<Annotation>,
}

impl TypeDescriptor {
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            metadata: Vec::new(),
        }
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn metadata(&self) -> &[Annotation] {
        &self.metadata
    }

    /// Attach one annotation, preserving order of prior annotations.
    pub fn annotated(mut self, annotation: Annotation) -> Self {
        self.metadata.push(annotation);
        self
    }

    /// Attach a list of annotations.
    pub fn with_metadata(mut self, metadata: impl IntoIterator<Item = Annotation>) -> Self {
        self.metadata.extend(metadata);
        self
    }

    /// This descriptor with metadata stripped.
    pub fn bare(&self) -> TypeDescriptor {
        TypeDescriptor::new(self.shape.clone())
    }

    pub fn str() -> Self {
        Self::new(Shape::Scalar(ScalarKind::Str))
    }

    pub fn bytes() -> Self {
        Self::new(Shape::Scalar(ScalarKind::Bytes))
    }

    pub fn int() -> Self {
        Self::new(Shape::Scalar(ScalarKind::Int))
    }

    pub fn float() -> Self {
        Self::new(Shape::Scalar(ScalarKind::Float))
    }

    pub fn decimal() -> Self {
        Self::new(Shape::Scalar(ScalarKind::Decimal))
    }

    pub fn bool() -> Self {
        Self::new(Shape::Scalar(ScalarKind::Bool))
    }

    pub fn null() -> Self {
        Self::new(Shape::Scalar(ScalarKind::Null))
    }

    pub fn date() -> Self {
        Self::new(Shape::Scalar(ScalarKind::Date))
    }

    pub fn datetime() -> Self {
        Self::new(Shape::Scalar(ScalarKind::DateTime))
    }

    pub fn uuid() -> Self {
        Self::new(Shape::Scalar(ScalarKind::Uuid))
    }

    pub fn optional(inner: TypeDescriptor) -> Self {
        Self::new(Shape::Optional(Box::new(inner)))
    }

    pub fn union(alternatives: impl IntoIterator<Item = TypeDescriptor>) -> Self {
        Self::new(Shape::Union(alternatives.into_iter().collect()))
    }

    pub fn literal(members: impl IntoIterator<Item = Value>) -> Self {
        Self::new(Shape::Literal(members.into_iter().collect()))
    }

    pub fn tuple(elements: impl IntoIterator<Item = TypeDescriptor>) -> Self {
        Self::new(Shape::Tuple(elements.into_iter().collect()))
    }

    pub fn variadic_tuple(element: TypeDescriptor) -> Self {
        Self::new(Shape::TupleVariadic(Box::new(element)))
    }

    pub fn sequence(element: TypeDescriptor) -> Self {
        Self::new(Shape::Sequence(Box::new(element)))
    }

    pub fn set(element: TypeDescriptor) -> Self {
        Self::new(Shape::Set(Box::new(element)))
    }

    pub fn mapping(key: TypeDescriptor, value: TypeDescriptor) -> Self {
        Self::new(Shape::Mapping(Box::new(key), Box::new(value)))
    }

    pub fn record(record: Arc<RecordType>) -> Self {
        Self::new(Shape::Record(record))
    }

    pub fn generic(
        origin: Arc<RecordType>,
        args: impl IntoIterator<Item = TypeDescriptor>,
    ) -> Self {
        Self::new(Shape::Generic {
            origin,
            args: args.into_iter().collect(),
        })
    }

    pub fn type_var(name: impl Into<String>) -> Self {
        Self::new(Shape::TypeVar(name.into()))
    }

    pub fn any() -> Self {
        Self::new(Shape::Any)
    }

    /// Whether this type permits the null value.
    ///
    /// Drives record field optionality: a field whose type is optional may
    /// be absent from a wire representation without error.
    pub fn is_optional(&self) -> bool {
        match &self.shape {
            Shape::Scalar(ScalarKind::Null) => true,
            Shape::Optional(_) => true,
            Shape::Union(alternatives) => alternatives.iter().any(TypeDescriptor::is_optional),
            Shape::Literal(members) => members.iter().any(Value::is_null),
            _ => false,
        }
    }

    /// Short description of the shape, for error messages.
    pub fn shape_name(&self) -> String {
        match &self.shape {
            Shape::Scalar(kind) => kind.name().to_string(),
            Shape::Optional(_) => "optional".to_string(),
            Shape::Union(_) => "union".to_string(),
            Shape::Literal(_) => "literal".to_string(),
            Shape::Tuple(_) | Shape::TupleVariadic(_) => "tuple".to_string(),
            Shape::Sequence(_) => "sequence".to_string(),
            Shape::Set(_) => "set".to_string(),
            Shape::Mapping(_, _) => "mapping".to_string(),
            Shape::Record(record) => format!("record {}", record.name()),
            Shape::Generic { origin, .. } => format!("generic {}", origin.name()),
            Shape::TypeVar(name) => format!("typevar {name}"),
            Shape::Any => "any".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Field;

    #[test]
    fn identical_annotations_are_descriptor_equal() {
        let a = TypeDescriptor::sequence(TypeDescriptor::int())
            .annotated(Annotation::MaxLen(10));
        let b = TypeDescriptor::sequence(TypeDescriptor::int())
            .annotated(Annotation::MaxLen(10));
        assert_eq!(a, b);
    }

    #[test]
    fn metadata_distinguishes_descriptors() {
        let bare = TypeDescriptor::int();
        let bounded = TypeDescriptor::int().annotated(Annotation::MaxValue(Value::Int(10)));
        assert_ne!(bare, bounded);
        assert_eq!(bounded.bare(), bare);
    }

    #[test]
    fn optionality() {
        assert!(TypeDescriptor::optional(TypeDescriptor::int()).is_optional());
        assert!(TypeDescriptor::null().is_optional());
        assert!(
            TypeDescriptor::union([TypeDescriptor::int(), TypeDescriptor::null()]).is_optional()
        );
        assert!(TypeDescriptor::literal([Value::Null, Value::Int(1)]).is_optional());
        assert!(!TypeDescriptor::int().is_optional());
        assert!(!TypeDescriptor::any().is_optional());
    }

    #[test]
    fn record_descriptors_compare_nominally() {
        let point = RecordType::new(
            "Point",
            vec![
                Field::new("x", TypeDescriptor::int()),
                Field::new("y", TypeDescriptor::int()),
            ],
        );
        let same = TypeDescriptor::record(point.clone());
        let other = TypeDescriptor::record(RecordType::declare("Point"));
        assert_eq!(same, other);
    }
}
