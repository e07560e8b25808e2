//! Command handlers for the `sill` CLI.
//!
//! Each submodule implements one command; shared helpers live here in the
//! module root.

mod highlight;
mod repl;
mod run;

pub use highlight::highlight_file;
pub use repl::run_repl;
pub use run::run_file;

use crate::CliError;
use std::path::PathBuf;

pub(crate) fn read_file(path: &str) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: PathBuf::from(path),
        source,
    })
}
