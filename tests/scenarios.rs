//! Integration tests against the public `FormalSystem` / `FormalSystemBuilder`
//! API, covering the kernel's invariants, laws, and named acceptance
//! scenarios.

use std::fs;

use indexmap::IndexMap;
use mmverify::{FormalSystem, FormalSystemBuilder, RawProposition, VerifyError};
use rstest::rstest;
use serde_json::{json, Map, Value};

#[derive(serde::Deserialize)]
struct Database {
    constants: Vec<String>,
    axioms: IndexMap<String, Value>,
    theorems: IndexMap<String, Value>,
}

fn load_fixture(name: &str) -> Database {
    let path = format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"));
    let text = fs::read_to_string(path).expect("fixture must exist");
    serde_json::from_str(&text).expect("fixture must be valid JSON")
}

fn build(db: &Database) -> Result<FormalSystem, (String, VerifyError)> {
    let mut builder = FormalSystemBuilder::new();
    for c in &db.constants {
        builder = builder.constant(c.clone());
    }
    for (label, prop) in &db.axioms {
        builder = builder.axiom(label.clone(), prop.clone());
    }
    for (label, prop) in &db.theorems {
        builder = builder.theorem(label.clone(), prop.clone());
    }
    builder.build()
}

// --- Scenario 1: minimal syntax database --------------------------------------------

#[test]
fn scenario_minimal_syntax_database_rejects_bare_undeclared_token() {
    // `ph` is neither a declared constant nor a variable bound by `wnew`'s
    // own `t`, so the assertion's second token resolves to nothing.
    let (label, err) = FormalSystemBuilder::new()
        .constant("wff")
        .constant("|-")
        .constant("->")
        .axiom(
            "wnew",
            json!({"t": {}, "h": {}, "d": {}, "a": "wff ph"}),
        )
        .build()
        .unwrap_err();

    assert_eq!(label, "wnew");
    assert!(matches!(err, VerifyError::UnknownToken { token, .. } if token == "ph"));
}

#[test]
fn scenario_minimal_syntax_database_accepts_once_declared_as_variable() {
    // The same assertion accepts once `ph` is bound as a `t`-variable
    // instead of appearing as a bare, undeclared token.
    let system = FormalSystemBuilder::new()
        .constant("wff")
        .constant("|-")
        .constant("->")
        .axiom(
            "wnew",
            json!({"t": {"wph": "wff ph"}, "h": {}, "d": {}, "a": "wff ph"}),
        )
        .build()
        .expect("ph declared as a t-variable must be accepted");

    assert!(system.namespace().contains("wnew"));
    assert_eq!(
        system.axioms().get("wnew").unwrap().a,
        vec!["wff".to_string(), "ph".to_string()]
    );
}

// --- Scenario 2: modus ponens application ----------------------------------------

#[test]
fn scenario_modus_ponens_application_accepts() {
    let db = load_fixture("propositional_calculus.json");
    let system = build(&db).expect("well-formed database must be accepted");

    assert_eq!(system.axioms().len(), 4);
    assert_eq!(system.theorems().len(), 1);
    assert_eq!(
        system.theorems().get("t1").unwrap().a,
        vec!["|-".to_string(), "ps".to_string()]
    );
}

// --- Scenario 6: dead variable ------------------------------------------------------

#[test]
fn scenario_dead_variable_is_rejected() {
    let db = load_fixture("dead_variable.json");
    let (label, err) = build(&db).unwrap_err();
    assert_eq!(label, "wbad");
    assert!(matches!(err, VerifyError::DeadVariable { var, .. } if var == "ps"));
}

// --- Scenario 3: distinct violation --------------------------------------------------

#[test]
fn scenario_distinct_violation_is_rejected() {
    let (label, err) = FormalSystemBuilder::new()
        .constant("wff")
        .axiom(
            "dv_rule",
            json!({
                "t": {"wx": "wff x", "wy": "wff y"},
                "h": {"hx": "wff x", "hy": "wff y"},
                "d": {"d1": "x y"},
                "a": "wff x",
            }),
        )
        .theorem(
            "bad_instance",
            json!({
                "t": {"wph": "wff ph"},
                "h": {},
                "d": {},
                "a": "wff ph",
                // push the same `wff ph` four times: two typing args and two
                // hypothesis args, all instantiating `x` and `y` to `ph`.
                "p": "wph wph wph wph dv_rule",
            }),
        )
        .build()
        .unwrap_err();

    assert_eq!(label, "bad_instance");
    assert!(matches!(err, VerifyError::DistinctViolation { .. }));
}

// --- Scenario 4: stack underflow ------------------------------------------------------

#[test]
fn scenario_stack_underflow_is_rejected() {
    let (label, err) = FormalSystemBuilder::new()
        .constant("wff")
        .constant("|-")
        .constant("c0")
        .axiom("wph", json!({"t": {"wph": "wff ph"}, "h": {}, "d": {}, "a": "wff ph"}))
        .axiom(
            "ax-mp",
            json!({
                "t": {"wph": "wff ph"},
                "h": {"min": "|- ph"},
                "d": {},
                "a": "|- ph",
            }),
        )
        .theorem(
            "bad",
            json!({"t": {}, "h": {}, "d": {}, "a": "|- c0", "p": "ax-mp"}),
        )
        .build()
        .unwrap_err();

    assert_eq!(label, "bad");
    assert!(matches!(err, VerifyError::StackUnderflow { .. }));
}

// --- Scenario 5: type mismatch --------------------------------------------------------

#[test]
fn scenario_type_mismatch_is_rejected() {
    let (label, err) = FormalSystemBuilder::new()
        .constant("wff")
        .constant("set")
        .constant("|-")
        .axiom(
            "ax-id",
            json!({
                "t": {"wph": "wff ph"},
                "h": {},
                "d": {},
                "a": "|- ph",
            }),
        )
        .theorem(
            // the theorem's own typing slot `vx` pushes typecode `set`, which
            // `ax-id` rejects since it declares typecode `wff`.
            "bad",
            json!({"t": {"vx": "set x"}, "h": {}, "d": {}, "a": "|- x", "p": "vx ax-id"}),
        )
        .build()
        .unwrap_err();

    assert_eq!(label, "bad");
    assert!(matches!(
        err,
        VerifyError::TypeMismatch { expected, found, .. }
            if expected == "wff" && found == "set"
    ));
}

// --- Invariants & laws ---------------------------------------------------------------

#[test]
fn law_duplicate_label_rejected_globally_and_locally() {
    let mut system = FormalSystem::new();
    system.add_constant("wff").unwrap();
    assert_eq!(
        system.add_constant("wff").unwrap_err(),
        VerifyError::DuplicateLabel("wff".into())
    );
    assert_eq!(
        system
            .add_axiom(
                "wff",
                &RawProposition::new(json!({"t": {}, "h": {}, "d": {}, "a": "wff"})),
            )
            .unwrap_err(),
        VerifyError::DuplicateLabel("wff".into())
    );
}

#[test]
fn law_monotonic_acceptance() {
    let db = load_fixture("propositional_calculus.json");
    let mut system = FormalSystem::new();
    for c in &db.constants {
        system.add_constant(c.clone()).unwrap();
    }
    for (label, prop) in &db.axioms {
        system
            .add_axiom(label.clone(), &RawProposition::new(prop.clone()))
            .unwrap();
    }
    let axioms_before = system.axioms().clone();

    for (label, prop) in &db.theorems {
        system
            .add_theorem(label.clone(), &RawProposition::new(prop.clone()))
            .unwrap();
    }

    assert_eq!(system.axioms(), &axioms_before);
}

#[test]
fn law_determinism_same_proof_twice_yields_identical_trace() {
    let db = load_fixture("propositional_calculus.json");
    let mut system = FormalSystem::new();
    for c in &db.constants {
        system.add_constant(c.clone()).unwrap();
    }
    for (label, prop) in &db.axioms {
        system
            .add_axiom(label.clone(), &RawProposition::new(prop.clone()))
            .unwrap();
    }

    let t1 = db.theorems.get("t1").unwrap().clone();
    let outcome_a = system
        .add_theorem_traced("t1a", &RawProposition::new(t1.clone()), true)
        .unwrap();
    let outcome_b = system
        .add_theorem_traced("t1b", &RawProposition::new(t1), true)
        .unwrap();

    // Both runs execute the identical proof against the identical prior
    // state; the only difference in the trace text is the theorem's own
    // label in the terminal line, so compare the per-step lines only.
    let trace_a = outcome_a.trace.unwrap();
    let trace_b = outcome_b.trace.unwrap();
    assert_eq!(trace_a.len(), trace_b.len());
    assert_eq!(&trace_a[..trace_a.len() - 1], &trace_b[..trace_b.len() - 1]);
}

#[test]
fn law_canonical_form_stability_renormalizing_is_idempotent() {
    let mut system = FormalSystem::new();
    system.add_constant("wff").unwrap();

    let raw = RawProposition::new(json!({
        "t": {"tx": "wff x"}, "h": {}, "d": {}, "a": "wff x",
    }));
    let canonical = mmverify::normalize(&raw, system.namespace()).unwrap();
    system.add_axiom("ax1", &raw).unwrap();

    // Re-serialize the canonical proposition's own token values and
    // re-normalize them against the namespace as it stands after `ax1` was
    // accepted; the result must equal the first canonical form exactly.
    let t_obj: Map<String, Value> = canonical
        .t
        .iter()
        .map(|(label, decl)| {
            (
                label.clone(),
                json!(format!("{} {}", decl.typecode, decl.var)),
            )
        })
        .collect();
    let h_obj: Map<String, Value> = canonical
        .h
        .iter()
        .map(|(label, expr)| (label.clone(), json!(expr.join(" "))))
        .collect();
    let d_obj: Map<String, Value> = canonical
        .d
        .iter()
        .map(|(label, pair)| (label.clone(), json!(format!("{} {}", pair.v1, pair.v2))))
        .collect();
    let reconstructed = RawProposition::new(json!({
        "t": Value::Object(t_obj),
        "h": Value::Object(h_obj),
        "d": Value::Object(d_obj),
        "a": canonical.a.join(" "),
    }));

    let renormalized = mmverify::normalize(&reconstructed, system.namespace()).unwrap();
    assert_eq!(renormalized, canonical);
}

#[rstest]
#[case::missing_field(json!({"t": {}, "h": {}, "a": "wff"}))]
#[case::t_not_object(json!({"t": "nope", "h": {}, "d": {}, "a": "wff"}))]
#[case::a_not_string(json!({"t": {}, "h": {}, "d": {}, "a": 5}))]
fn malformed_field_shapes_are_rejected(#[case] raw: Value) {
    let mut system = FormalSystem::new();
    system.add_constant("wff").unwrap();
    let err = system
        .add_axiom("bad", &RawProposition::new(raw))
        .unwrap_err();
    assert!(matches!(err, VerifyError::MalformedField(_)));
}
