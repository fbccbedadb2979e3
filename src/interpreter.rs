//! The reverse-Polish proof interpreter.
//!
//! A stack machine executes a theorem's proof script against its own typing
//! and hypothesis slots plus read-only access to the already-accepted axioms
//! and theorems of the enclosing [`crate::system::FormalSystem`]. Every
//! failure mode aborts the current proof attempt immediately; there is no
//! local recovery.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::error::{VerifyError, VerifyResult};
use crate::proposition::{join, Proposition};

/// The result of successfully running a proof.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProofOutcome {
    /// One human-readable line per executed step, plus a terminal line
    /// reporting the concluded assertion, when a trace was requested.
    pub trace: Option<Vec<String>>,
}

/// Execute `theorem`'s proof script against itself and the already-accepted
/// `axioms`/`theorems`, producing [`ProofOutcome::ok`] or a precise
/// [`VerifyError`].
///
/// `label` names `theorem` for error messages and trace lines; it is not
/// looked up anywhere (the theorem is not yet registered while its own proof
/// is being checked).
pub fn run_proof(
    label: &str,
    theorem: &Proposition,
    axioms: &IndexMap<String, Proposition>,
    theorems: &IndexMap<String, Proposition>,
    want_trace: bool,
) -> VerifyResult<ProofOutcome> {
    let steps = theorem
        .p
        .as_ref()
        .expect("run_proof is only called on propositions carrying a proof");

    let mut stack: Vec<Vec<String>> = Vec::new();
    let mut trace: Vec<String> = Vec::new();

    for (idx, step) in steps.iter().enumerate() {
        let pos = idx + 1;

        if let Some(decl) = theorem.t.get(step) {
            let expr = decl.tokens();
            if want_trace {
                trace.push(format!(
                    "step {pos}: push type assumption `{step}` -> `{}`",
                    join(&expr)
                ));
            }
            stack.push(expr);
            continue;
        }

        if let Some(expr) = theorem.h.get(step) {
            if want_trace {
                trace.push(format!(
                    "step {pos}: push hypothesis `{step}` -> `{}`",
                    join(expr)
                ));
            }
            stack.push(expr.clone());
            continue;
        }

        let rule = axioms
            .get(step)
            .or_else(|| theorems.get(step))
            .ok_or_else(|| VerifyError::UnknownStep {
                step: step.clone(),
                pos,
            })?;

        let concl = apply_rule(step, rule, pos, &mut stack, want_trace, &mut trace)?;
        stack.push(concl);
    }

    if stack.len() != 1 || stack[0] != theorem.a {
        return Err(VerifyError::MalformedProof {
            label: label.to_string(),
        });
    }

    if want_trace {
        trace.push(format!(
            "proof of `{label}` concludes with `{}`",
            join(&stack[0])
        ));
    }

    Ok(ProofOutcome {
        trace: want_trace.then_some(trace),
    })
}

/// Pop a rule's arguments, unify, check, and push its instantiated
/// conclusion. Returns the conclusion so the caller can push it (kept
/// separate from the push so the trace line can be emitted in one place).
fn apply_rule(
    step_label: &str,
    rule: &Proposition,
    pos: usize,
    stack: &mut Vec<Vec<String>>,
    want_trace: bool,
    trace: &mut Vec<String>,
) -> VerifyResult<Vec<String>> {
    let t_keys: Vec<&str> = rule.t_keys().collect();
    let h_keys: Vec<&str> = rule.h_keys().collect();
    let n = t_keys.len() + h_keys.len();

    if stack.len() < n {
        return Err(VerifyError::StackUnderflow {
            label: step_label.to_string(),
            pos,
            need: n,
            have: stack.len(),
        });
    }

    // `split_off` yields the tail in its original order, which is already
    // push order — no separate pop-then-reverse step is needed here.
    let args: Vec<Vec<String>> = stack.split_off(stack.len() - n);

    if want_trace {
        let rendered: Vec<String> = args.iter().map(|e| join(e)).collect();
        trace.push(format!(
            "step {pos}: apply `{step_label}`, pop [{}]",
            rendered.join(", ")
        ));
    }

    // --- unify types --------------------------------------------------------------
    let mut subs: HashMap<&str, &[String]> = HashMap::new();
    for (k, e) in t_keys.iter().zip(args[..t_keys.len()].iter()) {
        let decl = &rule.t[*k];
        if e.is_empty() || e[0] != decl.typecode {
            return Err(VerifyError::TypeMismatch {
                label: step_label.to_string(),
                pos,
                expected: decl.typecode.clone(),
                found: e.first().cloned().unwrap_or_default(),
            });
        }
        subs.insert(decl.var.as_str(), &e[1..]);
        if want_trace {
            trace.push(format!(
                "  match `{k}`: type `{}`, var `{}` -> `{}`",
                decl.typecode,
                decl.var,
                join(&e[1..])
            ));
        }
    }

    // --- distinct check --------------------------------------------------------------
    // NOTE: this check operates on raw token sets, which is the standard
    // Metamath check only while every variable is a single atomic token. It is
    // deliberately not generalized to multi-token variables.
    for (d_label, pair) in &rule.d {
        let (e1, e2) = match (subs.get(pair.v1.as_str()), subs.get(pair.v2.as_str())) {
            (Some(e1), Some(e2)) => (*e1, *e2),
            _ => continue,
        };
        let tokens1: std::collections::HashSet<&String> = e1.iter().collect();
        if e2.iter().any(|tok| tokens1.contains(tok)) {
            return Err(VerifyError::DistinctViolation {
                label: step_label.to_string(),
                pair_label: d_label.clone(),
                pos,
            });
        }
    }

    // --- match hypotheses --------------------------------------------------------------
    for (i, h_key) in h_keys.iter().enumerate() {
        let pattern = &rule.h[*h_key];
        let expected = instantiate(pattern, &subs);
        let actual = &args[t_keys.len() + i];
        if actual != &expected {
            return Err(VerifyError::HypothesisMismatch {
                label: step_label.to_string(),
                hyp_label: (*h_key).to_string(),
                pos,
                expected: join(&expected),
                found: join(actual),
            });
        }
        if want_trace {
            trace.push(format!("  hypothesis `{h_key}` matches `{}`", join(actual)));
        }
    }

    // --- produce conclusion --------------------------------------------------------------
    let concl = instantiate(&rule.a, &subs);
    if want_trace {
        trace.push(format!("  conclude -> `{}` and push to stack", join(&concl)));
    }
    Ok(concl)
}

/// Single-pass, non-iterated token substitution: a token present in `subs`
/// is replaced by its bound expression; any other token passes through
/// unchanged.
fn instantiate(pattern: &[String], subs: &HashMap<&str, &[String]>) -> Vec<String> {
    pattern
        .iter()
        .flat_map(|tok| match subs.get(tok.as_str()) {
            Some(expr) => expr.to_vec(),
            None => vec![tok.clone()],
        })
        .collect()
}
