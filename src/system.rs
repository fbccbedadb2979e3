//! The formal system container and its builder.
//!
//! [`FormalSystem`] is the public face of the kernel: it orchestrates
//! incremental, append-only addition of constants, axioms, and theorems,
//! firing the normalizer (and, for theorems, the interpreter) on every
//! addition. [`FormalSystemBuilder`] offers a "from scratch" construction
//! mode as an ergonomic accumulate-then-`build()` wrapper, in the style of a
//! `ProverBuilder`/`VerifierBuilder` pair.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{VerifyError, VerifyResult};
use crate::interpreter::{run_proof, ProofOutcome};
use crate::namespace::{Kind, Namespace};
use crate::proposition::{normalize, Proposition, RawProposition};

/// The append-only formal system: constants, axioms, theorems, and the
/// namespace that guarantees their labels are globally unique.
///
/// Entities are never mutated or removed once accepted. Addition order
/// matters: a theorem's proof may reference
/// only axioms and theorems accepted strictly before it, and the container
/// never retroactively re-verifies earlier theorems when later ones are
/// added.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormalSystem {
    constants: Vec<String>,
    axioms: IndexMap<String, Proposition>,
    theorems: IndexMap<String, Proposition>,
    namespace: Namespace,
}

impl FormalSystem {
    /// An empty formal system with no constants, axioms, or theorems.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept already-normalized, already-proof-checked state verbatim,
    /// without re-running the normalizer or the interpreter.
    ///
    /// This is the "from prebuilt canonical data" construction mode,
    /// intended for deserializing a trusted snapshot (e.g. one this crate
    /// itself produced via `serde_json`). The caller is responsible for the
    /// data's soundness; nothing here re-verifies it.
    pub fn from_canonical_parts(
        constants: Vec<String>,
        axioms: IndexMap<String, Proposition>,
        theorems: IndexMap<String, Proposition>,
        namespace: Namespace,
    ) -> Self {
        Self {
            constants,
            axioms,
            theorems,
            namespace,
        }
    }

    /// The declared constants, in declaration order.
    pub fn constants(&self) -> &[String] {
        &self.constants
    }

    /// Accepted axioms, keyed by label, in acceptance order.
    pub fn axioms(&self) -> &IndexMap<String, Proposition> {
        &self.axioms
    }

    /// Accepted theorems, keyed by label, in acceptance order.
    pub fn theorems(&self) -> &IndexMap<String, Proposition> {
        &self.theorems
    }

    /// The global namespace backing this system.
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Declare a new constant.
    ///
    /// Fails with [`VerifyError::DuplicateLabel`] if `constant` is already
    /// registered under any kind.
    pub fn add_constant(&mut self, constant: impl Into<String>) -> VerifyResult<()> {
        let constant = constant.into();
        self.namespace.insert(&constant, Kind::Constant)?;
        self.constants.push(constant);
        Ok(())
    }

    /// Normalize and accept a new axiom under `label`.
    ///
    /// Fails if `label` is not fresh or `prop` fails to normalize; the
    /// namespace and axiom map are left untouched on failure.
    pub fn add_axiom(&mut self, label: impl Into<String>, prop: &RawProposition) -> VerifyResult<()> {
        let label = label.into();
        if self.namespace.contains(&label) {
            return Err(VerifyError::DuplicateLabel(label));
        }
        let canonical = normalize(prop, &self.namespace)?;
        self.namespace.insert(&label, Kind::Axiom)?;
        self.axioms.insert(label, canonical);
        Ok(())
    }

    /// Normalize, proof-check, and accept a new theorem under `label`.
    ///
    /// Fails if `label` is not fresh, `prop` fails to normalize, or its
    /// proof does not check against the axioms and theorems already
    /// accepted in this system. The namespace, axiom map, and theorem map
    /// are left untouched on failure.
    pub fn add_theorem(&mut self, label: impl Into<String>, prop: &RawProposition) -> VerifyResult<()> {
        self.add_theorem_traced(label, prop, false).map(|_| ())
    }

    /// Like [`Self::add_theorem`], but additionally returns the proof's step
    /// trace.
    pub fn add_theorem_traced(
        &mut self,
        label: impl Into<String>,
        prop: &RawProposition,
        want_trace: bool,
    ) -> VerifyResult<ProofOutcome> {
        let label = label.into();
        if self.namespace.contains(&label) {
            return Err(VerifyError::DuplicateLabel(label));
        }
        let canonical = normalize(prop, &self.namespace)?;
        let outcome = run_proof(&label, &canonical, &self.axioms, &self.theorems, want_trace)?;
        self.namespace.insert(&label, Kind::Theorem)?;
        self.theorems.insert(label, canonical);
        Ok(outcome)
    }
}

/// Accumulate raw constants, axioms, and theorems, then run the "from
/// scratch" checked construction in one call: every axiom is normalized and
/// every theorem is normalized and proof-checked, in the order they were
/// added to the builder. Any failure aborts construction.
#[derive(Debug, Default)]
pub struct FormalSystemBuilder {
    constants: Vec<String>,
    axioms: Vec<(String, Value)>,
    theorems: Vec<(String, Value)>,
}

impl FormalSystemBuilder {
    /// A builder with nothing queued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a constant declaration.
    pub fn constant(mut self, constant: impl Into<String>) -> Self {
        self.constants.push(constant.into());
        self
    }

    /// Queue a raw axiom record under `label`.
    pub fn axiom(mut self, label: impl Into<String>, prop: Value) -> Self {
        self.axioms.push((label.into(), prop));
        self
    }

    /// Queue a raw theorem record under `label`.
    pub fn theorem(mut self, label: impl Into<String>, prop: Value) -> Self {
        self.theorems.push((label.into(), prop));
        self
    }

    /// Run the checked construction, consuming the builder.
    ///
    /// Constants are declared first, then axioms, then theorems, each in
    /// the order they were queued; the first failure aborts the whole
    /// construction and is returned together with the label that failed.
    pub fn build(self) -> Result<FormalSystem, (String, VerifyError)> {
        let mut system = FormalSystem::new();
        for constant in self.constants {
            system
                .add_constant(constant.clone())
                .map_err(|e| (constant, e))?;
        }
        for (label, prop) in self.axioms {
            system
                .add_axiom(label.clone(), &RawProposition::new(prop))
                .map_err(|e| (label, e))?;
        }
        for (label, prop) in self.theorems {
            system
                .add_theorem(label.clone(), &RawProposition::new(prop))
                .map_err(|e| (label, e))?;
        }
        Ok(system)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builder_accepts_modus_ponens_database() {
        let system = FormalSystemBuilder::new()
            .constant("wff")
            .constant("|-")
            .constant("->")
            .axiom("wph", json!({"t": {"wph": "wff ph"}, "h": {}, "d": {}, "a": "wff ph"}))
            .axiom("wps", json!({"t": {"wps": "wff ps"}, "h": {}, "d": {}, "a": "wff ps"}))
            .axiom(
                "wi",
                json!({
                    "t": {"wph": "wff ph", "wps": "wff ps"},
                    "h": {}, "d": {},
                    "a": "wff ( ph -> ps )",
                }),
            )
            .axiom(
                "ax-mp",
                json!({
                    "t": {"wph": "wff ph", "wps": "wff ps"},
                    "h": {"min": "|- ph", "maj": "|- ( ph -> ps )"},
                    "d": {},
                    "a": "|- ps",
                }),
            )
            .theorem(
                "t1",
                json!({
                    "t": {"wph": "wff ph", "wps": "wff ps"},
                    "h": {"min": "|- ph", "maj": "|- ( ph -> ps )"},
                    "d": {},
                    "a": "|- ps",
                    "p": "min maj ax-mp",
                }),
            )
            .build()
            .unwrap();

        assert_eq!(system.theorems().len(), 1);
        assert!(system.namespace().contains("t1"));
    }

    #[test]
    fn ordering_sensitivity_theorem_before_dependency_fails() {
        // `later_axiom` is declared *after* the theorem that wants to cite it,
        // so the proof step resolves to nothing the interpreter knows about.
        let (label, err) = FormalSystemBuilder::new()
            .constant("wff")
            .constant("foo")
            .theorem(
                "cites_too_early",
                json!({"t": {}, "h": {}, "d": {}, "a": "wff foo", "p": "later_axiom"}),
            )
            .axiom("later_axiom", json!({"t": {}, "h": {}, "d": {}, "a": "wff foo"}))
            .build()
            .unwrap_err();
        assert_eq!(label, "cites_too_early");
        assert!(matches!(err, VerifyError::UnknownStep { step, .. } if step == "later_axiom"));
    }

    #[test]
    fn duplicate_label_rejected_on_redeclaration() {
        let mut system = FormalSystem::new();
        system.add_constant("wff").unwrap();
        let err = system.add_constant("wff").unwrap_err();
        assert_eq!(err, VerifyError::DuplicateLabel("wff".into()));
    }

    #[test]
    fn monotonic_acceptance_adding_theorem_does_not_disturb_axioms() {
        let mut system = FormalSystem::new();
        system.add_constant("wff").unwrap();
        system
            .add_axiom(
                "wph",
                &RawProposition::new(json!({"t": {"wph": "wff ph"}, "h": {}, "d": {}, "a": "wff ph"})),
            )
            .unwrap();
        let before = system.axioms().get("wph").cloned();

        system
            .add_theorem(
                "t1",
                &RawProposition::new(json!({
                    "t": {"wph": "wff ph"}, "h": {}, "d": {}, "a": "wff ph", "p": "wph",
                })),
            )
            .unwrap();

        assert_eq!(system.axioms().get("wph").cloned(), before);
    }
}
