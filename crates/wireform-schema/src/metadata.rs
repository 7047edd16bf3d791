//! Annotation metadata attached to type descriptors.
//!
//! Annotations are opaque to codecs; the validator enforces the constraint
//! annotations, and documentation generators consume the descriptive ones.
//! They participate in descriptor equality so that two annotations differing
//! only in metadata resolve to distinct cache entries.

use crate::value::Value;
use regex::Regex;
use std::hash::{Hash, Hasher};

/// A compiled pattern annotation.
///
/// Compares and hashes by pattern source text, since compiled automata have
/// no meaningful identity of their own.
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
}

impl Pattern {
    /// Compile a pattern. Fails on invalid regular expression syntax.
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(source)?,
        })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.regex.as_str() == other.regex.as_str()
    }
}

impl Eq for Pattern {}

impl Hash for Pattern {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.regex.as_str().hash(state);
    }
}

/// A single annotation on a type descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Annotation {
    /// Human-readable description, for documentation generators.
    Description(String),
    /// Example value, for documentation generators.
    Example(Value),
    /// Minimum length of a string, byte sequence, or container.
    MinLen(usize),
    /// Maximum length of a string, byte sequence, or container.
    MaxLen(usize),
    /// Minimum (inclusive) value of a scalar.
    MinValue(Value),
    /// Maximum (inclusive) value of a scalar.
    MaxValue(Value),
    /// Pattern a string value must match.
    Pattern(Pattern),
    /// Marks the annotated type as deprecated.
    Deprecated,
}

impl Annotation {
    /// Whether this annotation constrains values (as opposed to documenting).
    pub fn is_constraint(&self) -> bool {
        matches!(
            self,
            Annotation::MinLen(_)
                | Annotation::MaxLen(_)
                | Annotation::MinValue(_)
                | Annotation::MaxValue(_)
                | Annotation::Pattern(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_equality_is_textual() {
        let a = Pattern::new(r"^\d+$").unwrap();
        let b = Pattern::new(r"^\d+$").unwrap();
        let c = Pattern::new(r"^\w+$").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn constraint_classification() {
        assert!(Annotation::MinLen(1).is_constraint());
        assert!(Annotation::Pattern(Pattern::new("x").unwrap()).is_constraint());
        assert!(!Annotation::Description("d".into()).is_constraint());
        assert!(!Annotation::Deprecated.is_constraint());
    }
}
