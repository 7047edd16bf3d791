//! Capture bindings for generic type parameters.
//!
//! When a generic instantiation is processed, its formal parameters are
//! bound to concrete descriptors for the duration of that one call tree.
//! `Bindings` carries those frames as an explicit parameter — borrowed,
//! immutable, and scoped by construction — so nested generics shadow outer
//! frames correctly and concurrent call trees can never observe each
//! other's bindings.

use crate::descriptor::TypeDescriptor;

/// One frame of parameter-name-to-descriptor bindings.
pub type Frame = Vec<(String, TypeDescriptor)>;

/// A stack of binding frames, innermost last.
#[derive(Debug, Clone, Copy)]
pub struct Bindings<'a> {
    parent: Option<&'a Bindings<'a>>,
    frame: &'a [(String, TypeDescriptor)],
}

impl<'a> Bindings<'a> {
    /// The empty root context.
    pub fn root() -> Bindings<'static> {
        Bindings {
            parent: None,
            frame: &[],
        }
    }

    /// A child context whose frame shadows this one.
    ///
    /// The frame is borrowed, so the child cannot outlive the call that
    /// pushed it; popping is scope exit.
    pub fn nested<'b>(&'b self, frame: &'b Frame) -> Bindings<'b> {
        Bindings {
            parent: Some(self),
            frame,
        }
    }

    /// Resolve a parameter name, innermost frame first.
    pub fn lookup(&self, name: &str) -> Option<&TypeDescriptor> {
        let local = self
            .frame
            .iter()
            .find_map(|(n, d)| (n == name).then_some(d));
        match local {
            Some(descriptor) => Some(descriptor),
            None => self.parent.and_then(|p| p.lookup(name)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.frame.is_empty() && self.parent.is_none_or(Bindings::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_walks_outward() {
        let root = Bindings::root();
        let outer: Frame = vec![
            ("T".to_string(), TypeDescriptor::int()),
            ("U".to_string(), TypeDescriptor::str()),
        ];
        let ctx = root.nested(&outer);
        assert_eq!(ctx.lookup("T"), Some(&TypeDescriptor::int()));
        assert_eq!(ctx.lookup("U"), Some(&TypeDescriptor::str()));
        assert_eq!(ctx.lookup("V"), None);
    }

    #[test]
    fn inner_frames_shadow_outer() {
        let root = Bindings::root();
        let outer: Frame = vec![("T".to_string(), TypeDescriptor::int())];
        let ctx = root.nested(&outer);
        let inner: Frame = vec![("T".to_string(), TypeDescriptor::bool())];
        let nested = ctx.nested(&inner);
        assert_eq!(nested.lookup("T"), Some(&TypeDescriptor::bool()));
        // The outer context is untouched once the nested frame is gone.
        assert_eq!(ctx.lookup("T"), Some(&TypeDescriptor::int()));
    }

    #[test]
    fn root_is_empty() {
        assert!(Bindings::root().is_empty());
        let frame: Frame = vec![("T".to_string(), TypeDescriptor::int())];
        let root = Bindings::root();
        assert!(!root.nested(&frame).is_empty());
    }
}
