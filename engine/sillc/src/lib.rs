//! Library surface of the `sill` CLI.
//!
//! The binary in `main.rs` only dispatches; the command handlers, the
//! in-memory document host, and tracing setup live here so they stay
//! testable.

pub mod commands;
mod host;

pub use host::BufferHost;

use std::path::PathBuf;
use std::sync::Once;
use thiserror::Error;

/// Errors surfaced to the CLI user.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("cannot read '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed reading input: {0}")]
    Input(#[from] std::io::Error),
    #[error("one or more statements failed")]
    StatementsFailed,
}

static TRACING_INIT: Once = Once::new();

/// Initialize tracing output, gated on `RUST_LOG` being set.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(tracing_tree::HierarchicalLayer::new(2).with_targets(true))
                .with(filter)
                .init();
        }
    });
}
