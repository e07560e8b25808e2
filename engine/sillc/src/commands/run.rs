//! The `run` command: evaluate a file statement by statement and print
//! the aggregated log.

use super::read_file;
use crate::{BufferHost, CliError};
use sill_engine::{Engine, Pos, QUANTUM};
use sill_eval::MlEvaluator;
use std::time::Instant;

/// Feed the whole file as one edit, flush the quantum, and print the log.
///
/// Exits nonzero when any statement fails statically, matching the exit
/// behavior of batch compilers.
pub fn run_file(path: &str) -> Result<(), CliError> {
    let content = read_file(path)?;
    let mut engine = Engine::new(MlEvaluator::new(), BufferHost::new(content.clone()));

    let lines: Vec<&str> = content.split('\n').collect();
    let now = Instant::now();
    engine.on_edit(Pos::ORIGIN, &lines, &[], now);
    engine.poll(now + QUANTUM);

    print!("{}", engine.host().output());
    if engine.checkpoints().iter().any(|c| c.is_error()) {
        return Err(CliError::StatementsFailed);
    }
    Ok(())
}
