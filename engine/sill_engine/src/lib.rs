//! Sill Engine — Incremental Re-evaluation
//!
//! An interactive, incremental execution engine for a sequence of top-level,
//! separator-delimited statements edited live in a text buffer. After every
//! edit it determines the minimal suffix of previously evaluated statements
//! that must be re-run, re-runs exactly that suffix against the plugged-in
//! evaluator, and republishes an aggregated output log.
//!
//! # Architecture
//!
//! ```text
//! Engine::on_edit (necessity gate + coalescing)
//!     │  quantum expires (Engine::poll)
//!     ▼
//! locate / non_error_anchor / base_index   (anchor resolution)
//!     │
//!     ▼
//! truncate (invalidation, decorations released)
//!     │
//!     ▼
//! re-evaluation pass  ──►  Evaluate::evaluate per statement
//!     │
//!     ▼
//! aggregate + Host::publish
//! ```
//!
//! The checkpoint store is a cache, never a source of truth: its entire
//! content is derivable from the buffer text plus the evaluator's state
//! objects. The engine is single-threaded; the only suspension point is the
//! debounce deadline between an edit and the pass it triggers.

mod checkpoint;
mod debounce;
mod engine;
mod host;
mod pass;
mod pos;

pub use checkpoint::{Checkpoint, CheckpointStore};
pub use debounce::{Debounce, QUANTUM};
pub use engine::Engine;
pub use host::{Host, MarkStyle};
pub use pos::Pos;

/// The statement separator character.
pub const SEPARATOR: char = ';';
