//! Property-based tests for the incremental engine.
//!
//! These tests use proptest to generate random edit scripts over a
//! line-per-statement buffer and verify:
//! 1. Checkpoint boundaries stay strictly increasing after every pass.
//! 2. Error checkpoints never carry evaluator state.
//! 3. Decorations track live checkpoints exactly (no leaks, no doubles).
//! 4. Equivalence: the incrementally maintained result matches a fresh
//!    engine evaluating the final buffer from scratch.
//!
//! This complements scenarios.rs, which pins hand-picked edit sequences,
//! by exploring interleavings the scenarios do not cover.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::doc_markdown,
    clippy::cast_possible_truncation,
    clippy::uninlined_format_args,
    clippy::redundant_closure_for_method_calls,
    reason = "Proptest macros generate code with these patterns"
)]

mod common;

use common::{load, MockHost};
use proptest::prelude::*;
use sill_engine::{Engine, Pos, QUANTUM};
use sill_eval::MlEvaluator;
use std::time::Instant;

// -- Edit Script Generation --

/// Generate an identifier the reference evaluator accepts.
fn identifier_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9]{0,4}")
        .expect("valid regex")
        .prop_filter("not a keyword", |s| {
            !matches!(s.as_str(), "val" | "it" | "div" | "mod")
        })
}

/// Generate one statement line: well-formed bindings, raising arithmetic,
/// malformed statements, open statements, and separator-free noise.
fn statement_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => (identifier_strategy(), 0i64..100)
            .prop_map(|(name, k)| format!("val {name} = {k};")),
        2 => (identifier_strategy(), identifier_strategy(), 0i64..100)
            .prop_map(|(a, b, k)| format!("val {a} = {b} + {k};")),
        1 => (1i64..100).prop_map(|k| format!("{k} div 0;")),
        1 => (0i64..10, 0i64..10).prop_map(|(a, b)| format!("val s = ({a}; {b});")),
        1 => Just("val = 3;".to_string()),
        1 => Just("val x = ;".to_string()),
        1 => Just("val open = (1;".to_string()),
        1 => Just("plain text".to_string()),
    ]
}

#[derive(Debug, Clone)]
enum Op {
    Append(String),
    Replace(prop::sample::Index, String),
    RemoveLast,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => statement_strategy().prop_map(Op::Append),
        3 => (any::<prop::sample::Index>(), statement_strategy())
            .prop_map(|(index, stmt)| Op::Replace(index, stmt)),
        1 => Just(Op::RemoveLast),
    ]
}

/// Apply one operation to the model line list and report it to the engine
/// as an edit, then flush the quantum.
fn apply(
    engine: &mut Engine<MlEvaluator, MockHost>,
    lines: &mut Vec<String>,
    op: &Op,
    now: Instant,
) {
    match op {
        Op::Append(stmt) => {
            let line = lines.len() as u32;
            lines.push(stmt.clone());
            engine.host_mut().buffer = lines.join("\n");
            engine.on_edit(Pos::new(line, 0), &[stmt.as_str()], &[], now);
        }
        Op::Replace(index, stmt) => {
            if lines.is_empty() {
                return;
            }
            let i = index.index(lines.len());
            let old = std::mem::replace(&mut lines[i], stmt.clone());
            engine.host_mut().buffer = lines.join("\n");
            engine.on_edit(
                Pos::new(i as u32, 0),
                &[stmt.as_str()],
                &[old.as_str()],
                now,
            );
        }
        Op::RemoveLast => {
            let Some(old) = lines.pop() else {
                return;
            };
            engine.host_mut().buffer = lines.join("\n");
            engine.on_edit(Pos::new(lines.len() as u32, 0), &[], &[old.as_str()], now);
        }
    }
    engine.poll(now + QUANTUM);
}

fn check_invariants(engine: &Engine<MlEvaluator, MockHost>) -> Result<(), TestCaseError> {
    let mut previous: Option<Pos> = None;
    let mut decorated = 0;
    for checkpoint in engine.checkpoints().iter() {
        prop_assert!(
            previous.is_none_or(|p| p < checkpoint.boundary()),
            "boundaries out of order at {}",
            checkpoint.boundary(),
        );
        previous = Some(checkpoint.boundary());
        if checkpoint.is_error() {
            prop_assert!(checkpoint.state().is_none(), "error checkpoint carries state");
        }
        if checkpoint.state().is_some() || checkpoint.is_error() {
            decorated += 1;
        }
    }
    prop_assert_eq!(
        engine.host().live_marks.len(),
        decorated,
        "decorations out of sync with live checkpoints",
    );
    Ok(())
}

proptest! {
    /// Random edit scripts keep the store invariants after every pass and
    /// converge to the same result as a from-scratch evaluation of the
    /// final buffer.
    #[test]
    fn random_edit_scripts_match_fresh_evaluation(
        ops in prop::collection::vec(op_strategy(), 1..24),
    ) {
        let mut engine = Engine::new(MlEvaluator::new(), MockHost::new(""));
        let mut lines: Vec<String> = Vec::new();
        let mut now = Instant::now();

        for op in &ops {
            apply(&mut engine, &mut lines, op, now);
            check_invariants(&engine)?;
            now += QUANTUM * 2;
        }

        let final_buffer = lines.join("\n");
        let mut fresh = Engine::new(MlEvaluator::new(), MockHost::new(&final_buffer));
        load(&mut fresh, now);

        let boundaries: Vec<Pos> =
            engine.checkpoints().iter().map(|c| c.boundary()).collect();
        let fresh_boundaries: Vec<Pos> =
            fresh.checkpoints().iter().map(|c| c.boundary()).collect();
        prop_assert_eq!(boundaries, fresh_boundaries);
        prop_assert_eq!(
            engine.checkpoints().aggregate(),
            fresh.checkpoints().aggregate(),
        );
    }

    /// Appending statements one at a time never disturbs the boundaries of
    /// the already-evaluated prefix.
    #[test]
    fn appends_preserve_prefix_boundaries(
        stmts in prop::collection::vec(statement_strategy(), 1..12),
    ) {
        let mut engine = Engine::new(MlEvaluator::new(), MockHost::new(""));
        let mut lines: Vec<String> = Vec::new();
        let mut now = Instant::now();
        let mut previous: Vec<Pos> = Vec::new();

        for stmt in &stmts {
            apply(&mut engine, &mut lines, &Op::Append(stmt.clone()), now);
            now += QUANTUM * 2;

            let boundaries: Vec<Pos> =
                engine.checkpoints().iter().map(|c| c.boundary()).collect();
            prop_assert!(
                boundaries.len() >= previous.len()
                    && boundaries[..previous.len()] == previous[..],
                "append rewrote the evaluated prefix",
            );
            previous = boundaries;
        }
    }
}
