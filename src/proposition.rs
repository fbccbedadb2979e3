//! Proposition records and the normalizer.
//!
//! A proposition arrives as an open, dynamically-shaped [`RawProposition`] —
//! the re-architected analogue of the source's dict-keyed record — and the
//! [`normalize`] function is the sole conversion path from that open value to
//! the crate's strongly-typed, invariant-checked [`Proposition`].

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{VerifyError, VerifyResult};
use crate::namespace::{Kind, Namespace};

/// A typing declaration `typecode variable`, e.g. `wff ph`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypingDecl {
    /// The constant naming the syntactic category.
    pub typecode: String,
    /// The variable this declaration binds.
    pub var: String,
}

impl TypingDecl {
    /// The two-token serialization `typecode var`, as pushed by the
    /// interpreter's "push typing" step.
    pub fn tokens(&self) -> Vec<String> {
        vec![self.typecode.clone(), self.var.clone()]
    }
}

/// An unordered pair of two distinct variables of one proposition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistinctPair {
    /// First variable of the pair.
    pub v1: String,
    /// Second variable of the pair.
    pub v2: String,
}

/// A canonical, invariant-checked proposition (axiom or theorem).
///
/// Per design note 9, this is a single record with an optional proof field
/// rather than two separate axiom/theorem variants: an axiom is simply a
/// `Proposition` with `p: None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposition {
    /// Typing-label → typing declaration, in declaration order.
    pub t: IndexMap<String, TypingDecl>,
    /// Hypothesis-label → expression (tokens), in declaration order.
    pub h: IndexMap<String, Vec<String>>,
    /// Distinct-label → distinct-variable pair.
    pub d: IndexMap<String, DistinctPair>,
    /// Assertion expression (tokens).
    pub a: Vec<String>,
    /// Proof script (theorems only); `None` marks an axiom.
    pub p: Option<Vec<String>>,
}

impl Proposition {
    /// Whether this proposition carries a proof (and is therefore a
    /// theorem rather than an axiom).
    pub fn is_theorem(&self) -> bool {
        self.p.is_some()
    }

    /// Typing-label keys in declaration order, as the interpreter needs them
    /// when computing a rule's arity.
    pub fn t_keys(&self) -> impl Iterator<Item = &str> {
        self.t.keys().map(String::as_str)
    }

    /// Hypothesis-label keys in declaration order.
    pub fn h_keys(&self) -> impl Iterator<Item = &str> {
        self.h.keys().map(String::as_str)
    }
}

/// Render a token slice in its whitespace-joined external form.
pub fn join(tokens: &[String]) -> String {
    tokens.join(" ")
}

fn tokenize(s: &str) -> Vec<String> {
    s.split_whitespace().map(str::to_owned).collect()
}

/// An open, dynamically-shaped proposition record, as received from a
/// collaborator that has already deserialized a concrete database format.
///
/// The core imposes no schema on this value beyond what [`normalize`]
/// enforces; parsing a concrete on-disk syntax into a `RawProposition` is
/// explicitly out of scope for the kernel.
#[derive(Debug, Clone)]
pub struct RawProposition(pub Value);

impl RawProposition {
    /// Wrap an already-deserialized JSON value.
    pub fn new(value: Value) -> Self {
        Self(value)
    }
}

const AXIOM_FIELDS: [&str; 4] = ["t", "h", "d", "a"];
const THEOREM_FIELDS: [&str; 5] = ["t", "h", "d", "a", "p"];

/// Validate a raw proposition record against the field-shape, freshness,
/// well-typedness, and liveness invariants and return its canonical form, or
/// a precise [`VerifyError`].
///
/// `namespace` is the global namespace *at the moment of normalization*:
/// freshness is checked against it, but `normalize` never mutates it —
/// registration happens only once the enclosing `add_*` operation accepts
/// the result (see [`crate::system::FormalSystem`]).
pub fn normalize(raw: &RawProposition, namespace: &Namespace) -> VerifyResult<Proposition> {
    let obj = raw
        .0
        .as_object()
        .ok_or_else(|| VerifyError::MalformedField("proposition must be a JSON object".into()))?;

    let field_set: HashSet<&str> = obj.keys().map(String::as_str).collect();
    let is_axiom_shape: HashSet<&str> = AXIOM_FIELDS.into_iter().collect();
    let is_theorem_shape: HashSet<&str> = THEOREM_FIELDS.into_iter().collect();
    let wants_proof = if field_set == is_axiom_shape {
        false
    } else if field_set == is_theorem_shape {
        true
    } else {
        return Err(VerifyError::MalformedField(format!(
            "field set must be exactly {{t,h,d,a}} or {{t,h,d,a,p}}, found {{{}}}",
            obj.keys().cloned().collect::<Vec<_>>().join(",")
        )));
    };

    let mut seen: HashSet<String> = HashSet::new();
    let mut variables: HashSet<String> = HashSet::new();
    let mut var_label: IndexMap<String, String> = IndexMap::new();

    // --- t: variable extraction -------------------------------------------------
    let t_raw = obj
        .get("t")
        .and_then(Value::as_object)
        .ok_or_else(|| VerifyError::MalformedField("field `t` must be an object".into()))?;

    let mut t: IndexMap<String, TypingDecl> = IndexMap::new();
    for (label, value) in t_raw {
        check_fresh(label, namespace, &seen)?;
        seen.insert(label.clone());

        let text = value.as_str().ok_or_else(|| {
            VerifyError::MalformedField(format!("typing entry `{label}` must be a string"))
        })?;
        let tokens = tokenize(text);
        if tokens.len() != 2 {
            return Err(VerifyError::MalformedField(format!(
                "typing entry `{label}` must be exactly `constant variable`, found `{text}`"
            )));
        }
        let (typecode, var) = (tokens[0].clone(), tokens[1].clone());
        if namespace.kind_of(&typecode) != Some(Kind::Constant) {
            return Err(VerifyError::MalformedField(format!(
                "typing entry `{label}` prefix `{typecode}` is not a declared constant"
            )));
        }
        check_fresh(&var, namespace, &seen)?;
        seen.insert(var.clone());
        variables.insert(var.clone());
        var_label.insert(var.clone(), label.clone());

        t.insert(label.clone(), TypingDecl { typecode, var });
    }

    // --- h: hypotheses -----------------------------------------------------------
    let h_raw = obj
        .get("h")
        .and_then(Value::as_object)
        .ok_or_else(|| VerifyError::MalformedField("field `h` must be an object".into()))?;

    let mut h: IndexMap<String, Vec<String>> = IndexMap::new();
    let mut used: HashSet<String> = HashSet::new();
    for (label, value) in h_raw {
        check_fresh(label, namespace, &seen)?;
        seen.insert(label.clone());

        let text = value.as_str().ok_or_else(|| {
            VerifyError::MalformedField(format!("hypothesis `{label}` must be a string"))
        })?;
        let tokens = tokenize(text);
        for tok in &tokens {
            check_known_token(tok, namespace, &variables, &format!("hypothesis `{label}`"))?;
            if variables.contains(tok) {
                used.insert(tok.clone());
            }
        }
        h.insert(label.clone(), tokens);
    }

    // --- a: assertion --------------------------------------------------------------
    let a_text = obj
        .get("a")
        .and_then(Value::as_str)
        .ok_or_else(|| VerifyError::MalformedField("field `a` must be a string".into()))?;
    let a = tokenize(a_text);
    for tok in &a {
        check_known_token(tok, namespace, &variables, "assertion")?;
        if variables.contains(tok) {
            used.insert(tok.clone());
        }
    }

    // --- d: distinct pairs -----------------------------------------------------------
    let d_raw = obj
        .get("d")
        .and_then(Value::as_object)
        .ok_or_else(|| VerifyError::MalformedField("field `d` must be an object".into()))?;

    let mut d: IndexMap<String, DistinctPair> = IndexMap::new();
    for (label, value) in d_raw {
        check_fresh(label, namespace, &seen)?;
        seen.insert(label.clone());

        let text = value.as_str().ok_or_else(|| {
            VerifyError::MalformedField(format!("distinct entry `{label}` must be a string"))
        })?;
        let tokens = tokenize(text);
        let valid = tokens.len() == 2
            && variables.contains(&tokens[0])
            && variables.contains(&tokens[1])
            && tokens[0] != tokens[1];
        if !valid {
            return Err(VerifyError::DistinctShape {
                label: label.clone(),
            });
        }
        d.insert(
            label.clone(),
            DistinctPair {
                v1: tokens[0].clone(),
                v2: tokens[1].clone(),
            },
        );
    }

    // --- liveness -------------------------------------------------------------------
    if let Some((var, label)) = var_label.iter().find(|(v, _)| !used.contains(*v)) {
        return Err(VerifyError::DeadVariable {
            label: label.clone(),
            var: var.clone(),
        });
    }

    // --- p: proof (theorems only) ----------------------------------------------------
    let p = if wants_proof {
        let raw_p = obj.get("p").expect("field set checked above");
        Some(parse_proof_script(raw_p)?)
    } else {
        None
    };

    Ok(Proposition { t, h, d, a, p })
}

/// Parse the `p` field: either a whitespace-separated string or an array of
/// string tokens, both denoting the same logical step sequence.
fn parse_proof_script(value: &Value) -> VerifyResult<Vec<String>> {
    if let Some(text) = value.as_str() {
        return Ok(tokenize(text));
    }
    if let Some(arr) = value.as_array() {
        return arr
            .iter()
            .map(|v| {
                v.as_str()
                    .map(str::to_owned)
                    .ok_or_else(|| VerifyError::MalformedField("proof step must be a string".into()))
            })
            .collect();
    }
    Err(VerifyError::MalformedField(
        "field `p` must be a string or an array of strings".into(),
    ))
}

fn check_fresh(name: &str, namespace: &Namespace, seen: &HashSet<String>) -> VerifyResult<()> {
    if namespace.contains(name) || seen.contains(name) {
        return Err(VerifyError::DuplicateLabel(name.to_string()));
    }
    Ok(())
}

fn check_known_token(
    token: &str,
    namespace: &Namespace,
    variables: &HashSet<String>,
    context: &str,
) -> VerifyResult<()> {
    let is_constant = namespace.kind_of(token) == Some(Kind::Constant);
    if !is_constant && !variables.contains(token) {
        return Err(VerifyError::UnknownToken {
            token: token.to_string(),
            context: context.to_string(),
        });
    }
    Ok(())
}
