//! Edit coalescing.
//!
//! Re-running the evaluator on every keystroke is wasteful and visually
//! noisy, so qualifying edits are merged into one pending record and the
//! pass fires only after a quiet quantum. The pending record keeps the
//! *minimum* affected position seen so far — recomputing from the earliest
//! position is always at least as conservative as recomputing from any
//! later one, so coalescing can never under-invalidate.
//!
//! The timer is an explicit value (a deadline inside the pending record),
//! not an ambient global: the host drives it by calling
//! [`crate::Engine::poll`] with the current instant. Each qualifying edit
//! restarts the deadline (trailing-edge debounce).

use crate::pos::Pos;
use std::time::{Duration, Instant};

/// Quiet period after the last qualifying edit before a pass fires.
pub const QUANTUM: Duration = Duration::from_millis(400);

#[derive(Copy, Clone, Debug)]
struct PendingEdit {
    min_affected: Pos,
    deadline: Instant,
}

/// Gate that merges bursts of edits into at most one pending recomputation.
#[derive(Debug, Default)]
pub struct Debounce {
    pending: Option<PendingEdit>,
}

impl Debounce {
    /// Create an idle gate.
    pub fn new() -> Self {
        Debounce { pending: None }
    }

    /// Whether a recomputation is already pending.
    ///
    /// While pending, further edits skip the necessity test: they can only
    /// lower the restart position, never raise it.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Record a qualifying edit at `pos`, restarting the quantum.
    ///
    /// The merged position only ever moves toward the document start.
    pub fn note(&mut self, pos: Pos, now: Instant) {
        let min_affected = match self.pending {
            Some(pending) => pending.min_affected.min(pos),
            None => pos,
        };
        self.pending = Some(PendingEdit {
            min_affected,
            deadline: now + QUANTUM,
        });
    }

    /// Take the merged position if the quantum has expired with no
    /// intervening edit, clearing the pending state.
    pub fn take_due(&mut self, now: Instant) -> Option<Pos> {
        if self.pending.is_some_and(|pending| now >= pending.deadline) {
            return self.pending.take().map(|pending| pending.min_affected);
        }
        None
    }

    /// Drop any pending edit without firing. Used when the engine is
    /// disabled.
    pub fn reset(&mut self) {
        self.pending = None;
    }
}
