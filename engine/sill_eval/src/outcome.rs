//! The four-way evaluation outcome.

/// Result of evaluating one statement fragment.
///
/// Exactly one of four things can happen to a statement, and the engine
/// commits a different kind of checkpoint for each. `S` is the evaluator's
/// opaque state type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome<S> {
    /// The fragment is not yet a self-contained statement (the separator
    /// belongs inside it). The engine keeps scanning without closing a
    /// checkpoint.
    Incomplete,

    /// The statement elaborated and executed. `rendering` is the display
    /// fragment for the published log (e.g. the new binding).
    Success {
        /// State with the statement's bindings applied.
        state: S,
        /// Log fragment contributed by this statement.
        rendering: String,
    },

    /// The statement raised a runtime exception. Bindings made before the
    /// raise remain visible, so the state still advances.
    Exception {
        /// State as of the raise.
        state: S,
        /// Formatted exception text for the published log.
        rendering: String,
    },

    /// Static or otherwise unclassified failure. No usable state comes out
    /// of the statement; subsequent statements start from an absent state
    /// until one succeeds independently.
    Error {
        /// Human-readable failure description.
        message: String,
        /// Byte offset of the failure within the fragment, when known.
        offset: Option<usize>,
    },
}
