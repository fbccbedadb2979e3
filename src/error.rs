//! The closed error set for the verification kernel.
//!
//! Every failure the kernel can produce — from a malformed proposition record
//! to a broken proof step — fits exactly one [`VerifyError`] variant. There is
//! no local recovery anywhere in the kernel: an error aborts the enclosing
//! `add_*` call and is handed straight back to the caller.

use thiserror::Error;

/// The full, closed set of failures the kernel can report.
///
/// Variants carry structured context (labels, positions, expected/found
/// tokens) rather than pre-rendered strings, so a caller can match on the
/// failure kind without parsing `Display` output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    /// A constant, axiom, theorem, typing-, hypothesis-, or distinct-label
    /// collides with a prior name, globally or within the proposition.
    #[error("duplicate label `{0}`")]
    DuplicateLabel(String),

    /// Wrong field set, wrong value shape, or a typing entry not of the form
    /// `constant variable`.
    #[error("malformed field: {0}")]
    MalformedField(String),

    /// A token in `h`, `a`, or `d` is neither a declared constant nor a
    /// variable declared in this proposition's `t`.
    #[error("unknown token `{token}` in {context}")]
    UnknownToken {
        /// The offending token.
        token: String,
        /// Where it was found, e.g. `"hypothesis `min`"` or `"assertion"`.
        context: String,
    },

    /// A `d` entry does not name two *different* variables of this
    /// proposition.
    #[error("distinct constraint `{label}` does not name two distinct variables of this proposition")]
    DistinctShape {
        /// The distinct-label whose value was malformed.
        label: String,
    },

    /// A variable declared in `t` appears nowhere in `h` or `a`.
    #[error("variable `{var}` (declared by `{label}`) is never used in a hypothesis or the assertion")]
    DeadVariable {
        /// The typing-label that declared the unused variable.
        label: String,
        /// The unused variable.
        var: String,
    },

    /// A proof step label is not a typing-label of this theorem, a
    /// hypothesis-label of this theorem, an axiom, or an accepted theorem.
    #[error("unknown proof step `{step}` at position {pos}")]
    UnknownStep {
        /// The unresolved step label.
        step: String,
        /// 1-based position in the proof script.
        pos: usize,
    },

    /// Applying a rule requires more stack entries than are present.
    #[error("stack underflow applying `{label}` at step {pos}: need {need}, have {have}")]
    StackUnderflow {
        /// The rule being applied.
        label: String,
        /// 1-based position in the proof script.
        pos: usize,
        /// Number of arguments the rule requires.
        need: usize,
        /// Number of expressions actually on the stack.
        have: usize,
    },

    /// Unifying a typing slot finds a typecode different from the rule's
    /// declared typecode.
    #[error("type mismatch applying `{label}` at step {pos}: expected typecode `{expected}`, found `{found}`")]
    TypeMismatch {
        /// The rule being applied.
        label: String,
        /// 1-based position in the proof script.
        pos: usize,
        /// The typecode the rule's typing slot declares.
        expected: String,
        /// The typecode actually found on the popped expression.
        found: String,
    },

    /// After unification, two variables declared distinct share a token in
    /// their substituted expressions.
    #[error("distinct-variable violation for `{pair_label}` applying `{label}` at step {pos}")]
    DistinctViolation {
        /// The rule being applied.
        label: String,
        /// The distinct-label whose constraint was violated.
        pair_label: String,
        /// 1-based position in the proof script.
        pos: usize,
    },

    /// After unification, a rule's hypothesis does not equal the
    /// corresponding popped expression.
    #[error("hypothesis mismatch for `{hyp_label}` applying `{label}` at step {pos}: expected `{expected}`, found `{found}`")]
    HypothesisMismatch {
        /// The rule being applied.
        label: String,
        /// The hypothesis-label whose instantiation failed to match.
        hyp_label: String,
        /// 1-based position in the proof script.
        pos: usize,
        /// The expression the rule's hypothesis instantiates to.
        expected: String,
        /// The expression actually popped off the stack.
        found: String,
    },

    /// After all steps, the stack does not hold exactly one expression equal
    /// to the theorem's assertion.
    #[error("proof of `{label}` did not conclude with the theorem's assertion")]
    MalformedProof {
        /// The theorem whose proof failed to conclude correctly.
        label: String,
    },
}

/// Convenience alias used throughout the kernel.
pub type VerifyResult<T> = Result<T, VerifyError>;
