//! Record type declarations.
//!
//! A record is a closed set of named, typed fields. Records support forward
//! declaration (`declare` then `define`) so a record may contain a field of
//! its own type, directly or through a container, without infinite
//! construction.
//!
//! Records compare and hash **nominally**: two records are the same type
//! exactly when they share a name. Names must therefore be unique within one
//! engine's schema space. This mirrors class identity in dynamically
//! introspected schema systems while keeping descriptors hashable in the
//! presence of cycles.

use crate::descriptor::TypeDescriptor;
use crate::error::ResolveError;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

/// Words that cannot be used as bare field identifiers in Rust sources.
///
/// A declared field name with a trailing underscore whose stem appears here
/// maps to the stem on the wire, in both directions.
const RESERVED: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "self", "static", "struct", "super", "trait", "true", "type",
    "unsafe", "use", "where", "while",
];

fn is_reserved(word: &str) -> bool {
    RESERVED.contains(&word)
}

/// Wire name for a declared field name.
///
/// `type_` encodes as `type`; every other name is unchanged.
pub fn wire_field_name(declared: &str) -> &str {
    if let Some(stem) = declared.strip_suffix('_') {
        if is_reserved(stem) {
            return stem;
        }
    }
    declared
}

/// Declared field name for a wire name; the inverse of [`wire_field_name`].
pub fn declared_field_name(wire: &str) -> String {
    if is_reserved(wire) {
        format!("{wire}_")
    } else {
        wire.to_string()
    }
}

/// A named, typed field of a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Field {
    name: String,
    wire_name: String,
    descriptor: TypeDescriptor,
}

impl Field {
    pub fn new(name: impl Into<String>, descriptor: TypeDescriptor) -> Self {
        let name = name.into();
        let wire_name = wire_field_name(&name).to_string();
        Self {
            name,
            wire_name,
            descriptor,
        }
    }

    /// The declared field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The name this field carries in wire representations.
    pub fn wire_name(&self) -> &str {
        &self.wire_name
    }

    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    /// A field is optional exactly when its type permits null.
    pub fn is_optional(&self) -> bool {
        self.descriptor.is_optional()
    }
}

/// A record type: a name, optional formal type parameters, and fields.
///
/// Construct complete records with [`RecordType::new`]; self-referential
/// records start from [`RecordType::declare`] and are completed with
/// [`RecordType::define`] once the descriptor handle exists to close the
/// cycle.
#[derive(Debug)]
pub struct RecordType {
    name: String,
    params: Vec<String>,
    fields: OnceLock<Vec<Field>>,
}

impl RecordType {
    /// Declare and define a record in one step.
    pub fn new(name: impl Into<String>, fields: Vec<Field>) -> Arc<Self> {
        let record = Self::declare(name);
        // A freshly declared record cannot already be defined.
        let defined = record.fields.set(fields).is_ok();
        debug_assert!(defined);
        record
    }

    /// Declare and define a generic record in one step.
    pub fn new_generic(
        name: impl Into<String>,
        params: impl IntoIterator<Item = impl Into<String>>,
        fields: Vec<Field>,
    ) -> Arc<Self> {
        let record = Self::declare_generic(name, params);
        let defined = record.fields.set(fields).is_ok();
        debug_assert!(defined);
        record
    }

    /// Forward-declare a record with no fields yet.
    pub fn declare(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            params: Vec::new(),
            fields: OnceLock::new(),
        })
    }

    /// Forward-declare a generic record with formal type parameters.
    pub fn declare_generic(
        name: impl Into<String>,
        params: impl IntoIterator<Item = impl Into<String>>,
    ) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            params: params.into_iter().map(Into::into).collect(),
            fields: OnceLock::new(),
        })
    }

    /// Supply the fields of a forward-declared record.
    ///
    /// Fails if the record was already defined.
    pub fn define(&self, fields: Vec<Field>) -> Result<(), ResolveError> {
        self.fields
            .set(fields)
            .map_err(|_| ResolveError::RecordRedefined(self.name.clone()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Formal type parameter names, empty for non-generic records.
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// The fields, or `None` if the record is declared but not yet defined.
    pub fn fields(&self) -> Option<&[Field]> {
        self.fields.get().map(Vec::as_slice)
    }

    /// The fields of a record that must be defined by now.
    pub fn defined_fields(&self) -> Result<&[Field], ResolveError> {
        self.fields()
            .ok_or_else(|| ResolveError::UndefinedRecord(self.name.clone()))
    }

    /// Look up a field by declared name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields()?.iter().find(|f| f.name == name)
    }
}

impl PartialEq for RecordType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for RecordType {}

impl Hash for RecordType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_strip_keyword_suffix() {
        assert_eq!(wire_field_name("type_"), "type");
        assert_eq!(wire_field_name("if_"), "if");
        assert_eq!(wire_field_name("name"), "name");
        // Trailing underscore on a non-keyword stem is preserved.
        assert_eq!(wire_field_name("shape_"), "shape_");
    }

    #[test]
    fn wire_names_round_trip() {
        for declared in ["type_", "match_", "name", "shape_"] {
            assert_eq!(declared_field_name(wire_field_name(declared)), declared);
        }
    }

    #[test]
    fn forward_declaration_defines_once() {
        let record = RecordType::declare("Node");
        assert!(record.fields().is_none());
        record
            .define(vec![Field::new("value", TypeDescriptor::int())])
            .unwrap();
        assert_eq!(record.fields().unwrap().len(), 1);
        assert!(record.define(Vec::new()).is_err());
    }

    #[test]
    fn records_compare_by_name() {
        let a = RecordType::new("Point", vec![Field::new("x", TypeDescriptor::int())]);
        let b = RecordType::declare("Point");
        assert_eq!(*a, *b);
    }
}
