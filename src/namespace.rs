//! The global namespace registry.
//!
//! A single mapping from label to kind. Every accepted constant, axiom, and
//! theorem registers itself here; it is the single source of truth for
//! global uniqueness. Ordering is irrelevant, so a plain hash map suffices —
//! contrast with [`crate::proposition`]'s `t`/`h`/`d` maps, which must
//! preserve insertion order.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::VerifyError;

/// What a label in the global namespace names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kind {
    /// A globally declared atomic token of the object language.
    Constant,
    /// A proposition accepted without proof.
    Axiom,
    /// A proposition accepted with a checked proof.
    Theorem,
}

/// Process-wide (per-[`crate::FormalSystem`] instance) label → kind map.
///
/// New containers get an independent, empty namespace; there is no
/// cross-container sharing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Namespace {
    entries: HashMap<String, Kind>,
}

impl Namespace {
    /// An empty namespace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `label` has already been registered, under any kind.
    pub fn contains(&self, label: &str) -> bool {
        self.entries.contains_key(label)
    }

    /// The kind `label` was registered under, if any.
    pub fn kind_of(&self, label: &str) -> Option<Kind> {
        self.entries.get(label).copied()
    }

    /// Register `label` under `kind`.
    ///
    /// Fails with [`VerifyError::DuplicateLabel`] if `label` is already
    /// present.
    pub fn insert(&mut self, label: &str, kind: Kind) -> Result<(), VerifyError> {
        if self.entries.contains_key(label) {
            return Err(VerifyError::DuplicateLabel(label.to_string()));
        }
        self.entries.insert(label.to_string(), kind);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_namespace_is_empty() {
        let ns = Namespace::new();
        assert!(!ns.contains("wff"));
        assert_eq!(ns.kind_of("wff"), None);
    }

    #[test]
    fn insert_then_duplicate_fails() {
        let mut ns = Namespace::new();
        ns.insert("wff", Kind::Constant).unwrap();
        assert!(ns.contains("wff"));
        assert_eq!(ns.kind_of("wff"), Some(Kind::Constant));

        let err = ns.insert("wff", Kind::Axiom).unwrap_err();
        assert_eq!(err, VerifyError::DuplicateLabel("wff".to_string()));
    }

    #[test]
    fn independent_namespaces_do_not_share_state() {
        let mut a = Namespace::new();
        let b = Namespace::new();
        a.insert("wff", Kind::Constant).unwrap();
        assert!(a.contains("wff"));
        assert!(!b.contains("wff"));
    }
}
