//! The `repl` command: a line-oriented live session.
//!
//! Every entered line is appended to the in-memory document and reported
//! as an edit; the debounce quantum is flushed between reads, so the
//! republished log appears after each qualifying line.

use crate::{BufferHost, CliError};
use sill_engine::{Engine, QUANTUM};
use sill_eval::MlEvaluator;
use std::io::{self, BufRead, Write};
use std::time::Instant;

pub fn run_repl() -> Result<(), CliError> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut engine = Engine::new(MlEvaluator::new(), BufferHost::new(String::new()));

    write!(stdout, "- ")?;
    stdout.flush()?;
    for line in stdin.lock().lines() {
        let line = line?;
        let now = Instant::now();
        let pos = engine.host_mut().append_line(&line);
        engine.on_edit(pos, &[&line], &[], now);
        if engine.poll(now + QUANTUM) {
            write!(stdout, "{}", engine.host().output())?;
        }
        write!(stdout, "- ")?;
        stdout.flush()?;
    }
    Ok(())
}
