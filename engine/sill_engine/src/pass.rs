//! The re-evaluation pass.
//!
//! One pass resolves the restart point for a coalesced edit, invalidates
//! the stale checkpoint suffix, re-scans the remaining buffer text one
//! separator at a time, drives the evaluator, and publishes the aggregated
//! log. It runs to completion synchronously once started.
//!
//! No evaluator failure aborts the scan. A static error resets the current
//! state to absent for everything after it: later statements in the same
//! pass are still evaluated, but against no prior bindings, until one of
//! them succeeds independently.

use crate::checkpoint::{Checkpoint, CheckpointStore};
use crate::host::{Host, MarkStyle};
use crate::pos::Pos;
use crate::SEPARATOR;
use sill_eval::{Evaluate, Outcome};

/// Run one full re-evaluation pass for an edit coalesced at `min_affected`.
pub(crate) fn run<E: Evaluate, H: Host>(
    store: &mut CheckpointStore<E::State, H::Mark>,
    evaluator: &mut E,
    host: &mut H,
    min_affected: Pos,
) {
    let anchor = store.non_error_anchor(store.locate(min_affected));
    for mark in store.truncate(anchor) {
        host.release(mark);
    }
    let base = store.base_index(anchor);

    let mut base_pos = base
        .and_then(|index| store.get(index))
        .map_or(Pos::ORIGIN, Checkpoint::boundary);
    let mut current: Option<E::State> = base
        .and_then(|index| store.get(index))
        .and_then(|checkpoint| checkpoint.state().cloned());

    tracing::debug!(%min_affected, ?anchor, ?base, %base_pos, "re-evaluation pass");

    let mut text = host.text_from(base_pos);
    if base.is_some() {
        // The base checkpoint already consumed its separator.
        text = text.get(1..).unwrap_or_default().to_string();
        base_pos = base_pos.next_col();
    }

    // Separators between the base and the anchor close checkpoints that
    // survived truncation; they are passed through unchanged to keep the
    // separator/checkpoint indexing aligned.
    let mut to_skip = match (anchor, base) {
        (Some(anchor), Some(base)) => anchor - base,
        (Some(anchor), None) => anchor + 1,
        (None, _) => 0,
    };

    let mut last_pos = base_pos;
    let mut partial = String::new();

    for (line_index, line) in text.split('\n').enumerate() {
        let line_offset = if line_index == 0 { base_pos.col } else { 0 };
        if line_index != 0 {
            partial.push('\n');
        }

        let mut col: u32 = 0;
        for ch in line.chars() {
            if ch != SEPARATOR {
                partial.push(ch);
                col += 1;
                continue;
            }

            let sep_pos = Pos::new(base_pos.line + line_index as u32, col + line_offset);
            col += 1;

            if to_skip > 0 {
                // Already evaluated in a prior pass; keep scanning.
                partial.push(SEPARATOR);
                to_skip -= 1;
                continue;
            }

            match evaluator.evaluate(&partial, current.as_ref()) {
                Outcome::Incomplete => {
                    tracing::trace!(%sep_pos, "incomplete statement");
                    store.push(Checkpoint::incomplete(sep_pos));
                    partial.push(SEPARATOR);
                }
                Outcome::Success { state, rendering } => {
                    tracing::trace!(%sep_pos, "statement succeeded");
                    let mark = host.mark(last_pos, sep_pos, MarkStyle::Success);
                    store.push(Checkpoint::success(sep_pos, state.clone(), rendering, mark));
                    current = Some(state);
                    last_pos = sep_pos.next_col();
                    partial.clear();
                }
                Outcome::Exception { state, rendering } => {
                    tracing::trace!(%sep_pos, "statement raised");
                    let mark = host.mark(last_pos, sep_pos, MarkStyle::Failure);
                    store.push(Checkpoint::exception(
                        sep_pos,
                        state.clone(),
                        rendering,
                        mark,
                    ));
                    current = Some(state);
                    last_pos = sep_pos.next_col();
                    partial.clear();
                }
                Outcome::Error { message, offset } => {
                    tracing::trace!(%sep_pos, message, "static error");
                    let message = annotate(&message, offset, &partial, last_pos);
                    let mark = host.mark(last_pos, sep_pos, MarkStyle::Failure);
                    store.push(Checkpoint::error(sep_pos, message, mark));
                    // Bindings become unavailable to everything after the
                    // error until a later statement succeeds independently.
                    current = None;
                    last_pos = sep_pos.next_col();
                    partial.clear();
                }
            }
        }
    }
    // Text after the last separator is the incomplete remainder; it closes
    // no checkpoint and is rescanned by the next pass.

    host.publish(&store.aggregate());
}

/// Prefix `message` with a 1-based line/column annotation computed by
/// walking the statement fragment up to the reported byte offset, starting
/// from the statement's first source position.
fn annotate(message: &str, offset: Option<usize>, partial: &str, start: Pos) -> String {
    let Some(offset) = offset else {
        return format!("unknown position: {message}");
    };
    let mut line = start.line;
    let mut col = start.col;
    for (index, ch) in partial.char_indices() {
        if index >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            col = 0;
        } else {
            col += 1;
        }
    }
    format!("line {} column {}: {message}", line + 1, col + 1)
}
