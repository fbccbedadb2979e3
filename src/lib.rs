//! A verifier for a formal mathematics calculus in the style of the
//! Metamath language (see the Metamath book, Appendix C).
//!
//! Given a database of constants, axioms, and theorems — each theorem
//! carrying a proof expressed as a reverse-Polish sequence of label
//! references — this crate establishes that every theorem's proof checks
//! against the axioms and previously established theorems under a
//! substitution-based inference rule with a distinct-variable discipline.
//!
//! # Core Insight
//!
//! A **proposition** (axiom or theorem) is a typed record: it declares its
//! own local variables (`t`), the hypotheses it assumes (`h`), the pairs of
//! variables that must stay distinct after substitution (`d`), and the
//! expression it asserts (`a`). A theorem additionally carries a **proof**
//! (`p`): a reverse-Polish sequence of labels that a stack machine replays
//! to rebuild the assertion from axioms, hypotheses, and earlier theorems.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  FormalSystem / Builder                     │
//! │   add_constant · add_axiom · add_theorem                    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!               ┌──────────────┴──────────────┐
//!               ▼                             ▼
//! ┌─────────────────────────┐   ┌─────────────────────────────┐
//! │   proposition::normalize │   │     interpreter::run_proof  │
//! │  field shape, fresh vars, │   │  push / apply-rule / unify, │
//! │  liveness (invariants 1-6)│   │  distinct check, conclude   │
//! └─────────────────────────┘   └─────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    namespace::Namespace                     │
//! │         label → {constant, axiom, theorem}, global           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Public API
//!
//! - [`FormalSystem`] / [`FormalSystemBuilder`] — the container: incremental
//!   (checked, mutating) and "from scratch" (accumulate-then-build)
//!   construction.
//! - [`proposition::Proposition`], [`proposition::RawProposition`] — the
//!   canonical and raw proposition records, and [`proposition::normalize`].
//! - [`interpreter::run_proof`], [`interpreter::ProofOutcome`] — the proof
//!   interpreter and its result.
//! - [`VerifyError`] — the closed set of failures the kernel can produce.
//!
//! # Scope Invariant
//!
//! This crate has no path to a filesystem, a network socket, or argv. Adding
//! a database-ingestion format, a CLI, or a proof-search tactic never
//! requires touching the kernel: parsing a concrete on-disk syntax, logging,
//! and any human-facing proof explanation beyond the optional step trace are
//! collaborators outside this crate's trust boundary (see `src/bin/mmcheck.rs`
//! for a thin example of such a collaborator, behind the `cli` feature).

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod error;
pub mod interpreter;
pub mod namespace;
pub mod proposition;
pub mod system;

pub use error::{VerifyError, VerifyResult};
pub use interpreter::{run_proof, ProofOutcome};
pub use namespace::{Kind, Namespace};
pub use proposition::{normalize, DistinctPair, Proposition, RawProposition, TypingDecl};
pub use system::{FormalSystem, FormalSystemBuilder};
