//! # Wireform schema
//!
//! The type system underneath the wireform codec engine: canonical type
//! descriptors, the dynamic value model they describe, capture bindings for
//! generic type parameters, and the error types shared by encoding,
//! decoding, and validation.
//!
//! This crate is deliberately inert: it performs no encoding and no I/O.
//! Descriptors are immutable, structurally comparable, and cheap to clone;
//! values carry a total order so that unordered collections encode
//! deterministically.
//!
//! ## Architecture
//!
//! ```text
//! TypeDescriptor         ← shape + nested descriptors + annotations
//!     │
//! RecordType / Field     ← named closed records, forward-declarable
//!     │
//! Value                  ← totally ordered dynamic values
//!     │
//! Bindings               ← scoped generic-parameter capture frames
//!     │
//! resolve / synthesize   ← parameter substitution, runtime shape inference
//! ```

pub mod bindings;
pub mod descriptor;
pub mod error;
pub mod metadata;
pub mod record;
pub mod resolve;
pub mod value;

pub use bindings::{Bindings, Frame};
pub use descriptor::{ScalarKind, Shape, TypeDescriptor};
pub use error::{
    DecodeError, EncodeError, PathSegment, ResolveError, ValidationError, render_path,
};
pub use metadata::{Annotation, Pattern};
pub use record::{Field, RecordType, declared_field_name, wire_field_name};
pub use resolve::{resolve, synthesize};
pub use value::Value;
