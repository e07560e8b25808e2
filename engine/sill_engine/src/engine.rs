//! Engine lifecycle and the edit entry point.

use crate::checkpoint::CheckpointStore;
use crate::debounce::Debounce;
use crate::host::Host;
use crate::pass;
use crate::pos::Pos;
use crate::SEPARATOR;
use sill_eval::Evaluate;
use std::time::Instant;

/// Incremental re-evaluation engine for one live-edited document.
///
/// The engine owns its evaluator, its host seam, and the checkpoint cache.
/// It is single-threaded and cooperatively scheduled: edits arrive through
/// [`Engine::on_edit`], and the host drives the debounce deadline by calling
/// [`Engine::poll`] with the current instant. All mutation happens inside a
/// pass, which runs to completion synchronously once its quantum expires.
pub struct Engine<E: Evaluate, H: Host> {
    evaluator: E,
    host: H,
    store: CheckpointStore<E::State, H::Mark>,
    debounce: Debounce,
    enabled: bool,
}

impl<E: Evaluate, H: Host> Engine<E, H> {
    /// Create an enabled engine with an empty checkpoint cache.
    pub fn new(evaluator: E, host: H) -> Self {
        Engine {
            evaluator,
            host,
            store: CheckpointStore::new(),
            debounce: Debounce::new(),
            enabled: true,
        }
    }

    /// Report an edit at `pos` that inserted and removed the given lines.
    ///
    /// Ignored while disabled. When no recomputation is pending, the edit
    /// is discarded unless it touches a separator or falls inside
    /// already-evaluated territory — that gate skips the vast majority of
    /// keystrokes. Qualifying edits merge into the pending record and
    /// restart the quantum.
    pub fn on_edit(&mut self, pos: Pos, inserted: &[&str], removed: &[&str], now: Instant) {
        if !self.enabled {
            return;
        }
        if !self.debounce.is_pending() && !self.handling_necessary(pos, inserted, removed) {
            tracing::trace!(%pos, "edit discarded: no recomputation needed");
            return;
        }
        self.debounce.note(pos, now);
    }

    /// Fire the pending recomputation if its quantum has expired.
    ///
    /// Returns `true` when a pass ran (and the log was republished).
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(min_affected) = self.debounce.take_due(now) else {
            return false;
        };
        pass::run(
            &mut self.store,
            &mut self.evaluator,
            &mut self.host,
            min_affected,
        );
        true
    }

    /// Drop all checkpoints and release their decorations. The engine stays
    /// enabled, and a pending recomputation stays pending: when its quantum
    /// expires it rebuilds from the document start.
    pub fn clear(&mut self) {
        let marks = self.store.truncate(None);
        for mark in marks {
            self.host.release(mark);
        }
    }

    /// Clear, drop any pending recomputation, and stop accepting edits.
    pub fn disable(&mut self) {
        self.enabled = false;
        self.clear();
        self.debounce.reset();
    }

    /// Resume accepting edits.
    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// The checkpoint cache, for hosts that want to inspect statement
    /// outcomes (e.g. to report whether any statement failed).
    pub fn checkpoints(&self) -> &CheckpointStore<E::State, H::Mark> {
        &self.store
    }

    /// The host seam.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the host seam, e.g. for buffer mutation between
    /// edits in line-oriented front ends.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// An edit needs handling iff the changed text contains the statement
    /// separator, or the edit falls inside or before already-evaluated
    /// territory.
    fn handling_necessary(&self, pos: Pos, inserted: &[&str], removed: &[&str]) -> bool {
        if inserted
            .iter()
            .chain(removed)
            .any(|text| text.contains(SEPARATOR))
        {
            return true;
        }
        match self.store.last_boundary() {
            None => false,
            Some(last) => pos <= last,
        }
    }
}
