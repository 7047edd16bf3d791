//! Error types shared by the codec engine and the validator.
//!
//! Three failure kinds exist: a value cannot be represented
//! ([`EncodeError`]), wire data cannot be parsed into the declared type
//! ([`DecodeError`]), and a structurally well-shaped value violates a
//! declared constraint ([`ValidationError`]). Each carries an optional
//! message and a path locating the failure inside nested structure.
//!
//! Paths are prepended, never appended: the frame that raises an error
//! supplies only its local segment, and each enclosing frame prepends its
//! own exactly once, so a finished path reads root-to-leaf.

use crate::value::Value;
use std::fmt;
use thiserror::Error;

/// One step into a nested value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A record field name.
    Field(String),
    /// A positional index in a sequence or tuple.
    Index(usize),
    /// A mapping key.
    Key(String),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Field(name) => write!(f, "{name}"),
            PathSegment::Index(index) => write!(f, "[{index}]"),
            PathSegment::Key(key) => write!(f, "[{key}]"),
        }
    }
}

/// Render a path root-to-leaf: `addr.zip`, `items[2].name`.
pub fn render_path(path: &[PathSegment]) -> String {
    let mut out = String::new();
    for segment in path {
        match segment {
            PathSegment::Field(name) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(name);
            }
            PathSegment::Index(_) | PathSegment::Key(_) => {
                out.push_str(&segment.to_string());
            }
        }
    }
    out
}

fn render(kind: &str, message: &Option<String>, path: &[PathSegment]) -> String {
    let mut out = String::from(kind);
    if !path.is_empty() {
        out.push_str(" at ");
        out.push_str(&render_path(path));
    }
    if let Some(message) = message {
        out.push_str(": ");
        out.push_str(message);
    }
    out
}

macro_rules! path_error {
    ($(#[$doc:meta])* $name:ident, $kind:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Error)]
        #[error("{}", render($kind, .message, .path))]
        pub struct $name {
            message: Option<String>,
            path: Vec<PathSegment>,
        }

        impl $name {
            /// An error with a message and an empty path.
            pub fn new(message: impl Into<String>) -> Self {
                Self {
                    message: Some(message.into()),
                    path: Vec::new(),
                }
            }

            /// An error with neither message nor path.
            pub fn bare() -> Self {
                Self {
                    message: None,
                    path: Vec::new(),
                }
            }

            /// The standard shape-mismatch message.
            pub fn mismatch(expected: &str, received: &Value) -> Self {
                Self::new(format!(
                    "expecting {expected}; received {}",
                    received.kind_name()
                ))
            }

            /// Prepend an enclosing frame's path segment.
            pub fn at(mut self, segment: PathSegment) -> Self {
                self.path.insert(0, segment);
                self
            }

            /// Prepend a field segment.
            pub fn in_field(self, name: impl Into<String>) -> Self {
                self.at(PathSegment::Field(name.into()))
            }

            /// Prepend an index segment.
            pub fn in_index(self, index: usize) -> Self {
                self.at(PathSegment::Index(index))
            }

            /// Prepend a key segment.
            pub fn in_key(self, key: impl Into<String>) -> Self {
                self.at(PathSegment::Key(key.into()))
            }

            pub fn message(&self) -> Option<&str> {
                self.message.as_deref()
            }

            pub fn path(&self) -> &[PathSegment] {
                &self.path
            }
        }
    };
}

path_error!(
    /// A value cannot be represented in the target representation.
    ///
    /// This reports a malformed in-memory value, not malformed wire data.
    EncodeError,
    "cannot encode"
);

path_error!(
    /// Wire data cannot be parsed into the declared type.
    DecodeError,
    "cannot decode"
);

path_error!(
    /// A value has the right shape but violates a declared constraint.
    ValidationError,
    "invalid value"
);

/// A descriptor could not be resolved to a codec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// No registered matcher accepted the descriptor.
    #[error("no {wire} codec for type: {shape}")]
    NoCodec {
        wire: &'static str,
        shape: String,
    },

    /// A record was used before its fields were defined.
    #[error("record {0} is declared but not defined")]
    UndefinedRecord(String),

    /// A forward-declared record was defined twice.
    #[error("record {0} is already defined")]
    RecordRedefined(String),

    /// A generic instantiation does not match its origin's parameters.
    #[error("generic {origin} takes {expected} type arguments; received {received}")]
    ArityMismatch {
        origin: String,
        expected: usize,
        received: usize,
    },

    /// A literal type declared a non-scalar member.
    #[error("literal member must be a scalar; received {0}")]
    InvalidLiteral(String),
}
