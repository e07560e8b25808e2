//! Checkpoints and the checkpoint store.
//!
//! A checkpoint caches everything the engine knows about one fully-scanned
//! statement: where its separator sits, the evaluator state it produced (if
//! any), its contribution to the published log, and the decoration placed
//! over its source range. The store is strictly a cache — its entire content
//! is derivable from the buffer text plus the evaluator — and is rebuilt
//! suffix-by-suffix as edits invalidate it.
//!
//! # Invariants
//!
//! - Boundaries are strictly increasing across the sequence.
//! - A checkpoint never carries both a state and the error flag; the
//!   outcome-specific constructors make that unrepresentable in practice.
//! - Every decoration handle is moved out exactly once, when its checkpoint
//!   is invalidated or the store is cleared.

use crate::pos::Pos;

/// Cached result of one fully-scanned statement boundary.
#[derive(Debug)]
pub struct Checkpoint<S, M> {
    boundary: Pos,
    state: Option<S>,
    output: String,
    is_error: bool,
    mark: Option<M>,
}

impl<S, M> Checkpoint<S, M> {
    /// Statement evaluated successfully.
    pub fn success(boundary: Pos, state: S, output: String, mark: M) -> Self {
        Checkpoint {
            boundary,
            state: Some(state),
            output,
            is_error: false,
            mark: Some(mark),
        }
    }

    /// Statement raised a runtime exception. The state still advances;
    /// bindings made before the raise remain visible.
    pub fn exception(boundary: Pos, state: S, output: String, mark: M) -> Self {
        Checkpoint {
            boundary,
            state: Some(state),
            output,
            is_error: false,
            mark: Some(mark),
        }
    }

    /// Statement failed statically. No usable state comes out of it.
    pub fn error(boundary: Pos, message: String, mark: M) -> Self {
        Checkpoint {
            boundary,
            state: None,
            output: message,
            is_error: true,
            mark: Some(mark),
        }
    }

    /// Separator consumed inside a statement that is not yet self-contained.
    /// Keeps the separator/checkpoint indexing aligned without closing a
    /// statement.
    pub fn incomplete(boundary: Pos) -> Self {
        Checkpoint {
            boundary,
            state: None,
            output: String::new(),
            is_error: false,
            mark: None,
        }
    }

    /// Location of the separator that ends this statement.
    pub fn boundary(&self) -> Pos {
        self.boundary
    }

    /// Evaluator state after this statement, if it produced one.
    pub fn state(&self) -> Option<&S> {
        self.state.as_ref()
    }

    /// This statement's fragment of the published log.
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Whether this checkpoint records a static/unclassified error.
    pub fn is_error(&self) -> bool {
        self.is_error
    }
}

/// Ordered sequence of checkpoints for one document.
#[derive(Debug, Default)]
pub struct CheckpointStore<S, M> {
    checkpoints: Vec<Checkpoint<S, M>>,
}

impl<S, M> CheckpointStore<S, M> {
    /// Create an empty store.
    pub fn new() -> Self {
        CheckpointStore {
            checkpoints: Vec::new(),
        }
    }

    /// Number of checkpoints.
    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    /// Check whether no statement has been scanned yet.
    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }

    /// Checkpoint at `index`.
    pub fn get(&self, index: usize) -> Option<&Checkpoint<S, M>> {
        self.checkpoints.get(index)
    }

    /// Iterate checkpoints in boundary order.
    pub fn iter(&self) -> impl Iterator<Item = &Checkpoint<S, M>> {
        self.checkpoints.iter()
    }

    /// Boundary of the last checkpoint, if any.
    pub fn last_boundary(&self) -> Option<Pos> {
        self.checkpoints.last().map(Checkpoint::boundary)
    }

    /// Append a checkpoint.
    ///
    /// Boundaries must arrive in strictly increasing order; the pass
    /// guarantees this by construction.
    pub fn push(&mut self, checkpoint: Checkpoint<S, M>) {
        debug_assert!(
            self.last_boundary()
                .is_none_or(|last| last < checkpoint.boundary),
            "checkpoint boundaries must be strictly increasing",
        );
        self.checkpoints.push(checkpoint);
    }

    /// Index of the last checkpoint with boundary strictly before `pos`.
    ///
    /// `None` means the edit lands before (or exactly on) the first
    /// boundary. An edit exactly on a boundary invalidates that boundary,
    /// which is why the comparison is strict.
    pub fn locate(&self, pos: Pos) -> Option<usize> {
        let n = self.checkpoints.partition_point(|c| c.boundary < pos);
        n.checked_sub(1)
    }

    /// Walk backward from `anchor` past error checkpoints.
    ///
    /// An error checkpoint's end-of-statement boundary is unreliable, so it
    /// is always invalidated together with everything after it.
    pub fn non_error_anchor(&self, anchor: Option<usize>) -> Option<usize> {
        let mut index = anchor?;
        loop {
            if !self.checkpoints[index].is_error {
                return Some(index);
            }
            index = index.checked_sub(1)?;
        }
    }

    /// Walk backward from `anchor` to the nearest checkpoint carrying
    /// usable evaluator state. Only such a checkpoint is safe to resume
    /// from.
    pub fn base_index(&self, anchor: Option<usize>) -> Option<usize> {
        let mut index = anchor?;
        loop {
            if self.checkpoints[index].state.is_some() {
                return Some(index);
            }
            index = index.checked_sub(1)?;
        }
    }

    /// Discard every checkpoint after `keep` (all of them for `None`),
    /// returning the drained decoration handles for the caller to release.
    pub fn truncate(&mut self, keep: Option<usize>) -> Vec<M> {
        let new_len = keep.map_or(0, |index| index + 1);
        if new_len >= self.checkpoints.len() {
            return Vec::new();
        }
        self.checkpoints
            .drain(new_len..)
            .filter_map(|mut checkpoint| checkpoint.mark.take())
            .collect()
    }

    /// Single left-to-right concatenation of every checkpoint's output
    /// fragment. Invoked once per completed pass, never per checkpoint.
    pub fn aggregate(&self) -> String {
        let mut log = String::new();
        for checkpoint in &self.checkpoints {
            log.push_str(&checkpoint.output);
        }
        log
    }
}
