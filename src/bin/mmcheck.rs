//! Minimal CLI database checker.
//!
//! Reads a JSON-encoded toy database — a list of constants plus ordered
//! maps of axiom-label → raw proposition and theorem-label → raw
//! proposition — and replays it through [`mmverify::FormalSystemBuilder`],
//! reporting acceptance or rejection per label.
//!
//! This binary is a thin wrapper: all I/O and argument parsing live here,
//! while `mmverify` itself never touches a filesystem or argv.

#![forbid(unsafe_code)]

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use mmverify::{FormalSystemBuilder, RawProposition};

/// Check a Metamath-style toy database and report per-label results.
#[derive(Parser, Debug)]
#[command(name = "mmcheck", version, about)]
struct Cli {
    /// Path to a JSON database file: `{"constants": [...], "axioms": {...}, "theorems": {...}}`.
    database: PathBuf,

    /// Print a step trace for every accepted theorem.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
struct Database {
    constants: Vec<String>,
    axioms: IndexMap<String, Value>,
    theorems: IndexMap<String, Value>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let text = fs::read_to_string(&cli.database)
        .map_err(|e| anyhow::anyhow!("read {}: {e}", cli.database.display()))?;
    let db: Database = serde_json::from_str(&text)
        .map_err(|e| anyhow::anyhow!("parse {}: {e}", cli.database.display()))?;

    tracing::info!(
        constants = db.constants.len(),
        axioms = db.axioms.len(),
        theorems = db.theorems.len(),
        "loaded database"
    );

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

    match builder.build() {
        Ok(system) => {
            tracing::info!(
                axioms = system.axioms().len(),
                theorems = system.theorems().len(),
                "all propositions accepted"
            );
            if cli.trace {
                print_traces(&db, &system)?;
            }
            println!(
                "OK: {} constants, {} axioms, {} theorems accepted",
                system.constants().len(),
                system.axioms().len(),
                system.theorems().len()
            );
            Ok(())
        }
        Err((label, err)) => {
            tracing::warn!(%label, %err, "rejected");
            println!("FAIL: `{label}` rejected: {err}");
            std::process::exit(1);
        }
    }
}

/// Re-run each accepted theorem's proof with tracing enabled and print the
/// resulting step-by-step trace. The builder's one-shot `build()` doesn't
/// surface traces, so this replays via the lower-level `FormalSystem` API.
fn print_traces(db: &Database, accepted: &mmverify::FormalSystem) -> anyhow::Result<()> {
    let mut system = mmverify::FormalSystem::new();
    for c in &db.constants {
        system.add_constant(c.clone())?;
    }
    for (label, prop) in &db.axioms {
        system.add_axiom(label.clone(), &RawProposition::new(prop.clone()))?;
    }
    for label in accepted.theorems().keys() {
        let prop = db.theorems.get(label).expect("accepted theorem was in the database");
        let outcome = system.add_theorem_traced(label.clone(), &RawProposition::new(prop.clone()), true)?;
        println!("--- {label} ---");
        for line in outcome.trace.unwrap_or_default() {
            println!("  {line}");
        }
    }
    Ok(())
}
