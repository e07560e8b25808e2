//! Shared test double for the text-buffer host.

#![allow(dead_code, reason = "shared across test targets with different needs")]

use sill_engine::{Engine, Host, MarkStyle, Pos, QUANTUM};
use sill_eval::{Evaluate, MlEvaluator, MlState};
use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// In-memory editor host: a plain string buffer, counted decoration
/// handles, and a log of everything published.
pub struct MockHost {
    pub buffer: String,
    pub published: Vec<String>,
    pub live_marks: Vec<(u32, MarkStyle)>,
    pub released: Vec<u32>,
    next_mark: u32,
}

impl MockHost {
    pub fn new(buffer: &str) -> Self {
        MockHost {
            buffer: buffer.to_string(),
            published: Vec::new(),
            live_marks: Vec::new(),
            released: Vec::new(),
            next_mark: 0,
        }
    }

    pub fn last_published(&self) -> &str {
        self.published.last().map_or("", String::as_str)
    }
}

impl Host for MockHost {
    type Mark = u32;

    fn text_from(&self, pos: Pos) -> String {
        let lines: Vec<&str> = self.buffer.split('\n').collect();
        let line = pos.line as usize;
        if line >= lines.len() {
            return String::new();
        }
        let mut out: String = lines[line].chars().skip(pos.col as usize).collect();
        for rest in &lines[line + 1..] {
            out.push('\n');
            out.push_str(rest);
        }
        out
    }

    fn mark(&mut self, _from: Pos, _to: Pos, style: MarkStyle) -> u32 {
        let id = self.next_mark;
        self.next_mark += 1;
        self.live_marks.push((id, style));
        id
    }

    fn release(&mut self, mark: u32) {
        let before = self.live_marks.len();
        self.live_marks.retain(|(id, _)| *id != mark);
        assert_eq!(
            before,
            self.live_marks.len() + 1,
            "released an unknown or already-released mark: {mark}"
        );
        self.released.push(mark);
    }

    fn publish(&mut self, output: &str) {
        self.published.push(output.to_string());
    }
}

/// [`MlEvaluator`] wrapper that counts evaluator invocations, for asserting
/// that unaffected history is never re-run.
pub struct CountingEvaluator {
    inner: MlEvaluator,
    calls: Rc<Cell<usize>>,
}

impl CountingEvaluator {
    pub fn new() -> (Self, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        (
            CountingEvaluator {
                inner: MlEvaluator::new(),
                calls: Rc::clone(&calls),
            },
            calls,
        )
    }
}

impl Evaluate for CountingEvaluator {
    type State = MlState;

    fn evaluate(&mut self, fragment: &str, prior: Option<&MlState>) -> sill_eval::Outcome<MlState> {
        self.calls.set(self.calls.get() + 1);
        self.inner.evaluate(fragment, prior)
    }
}

/// Feed the host's whole buffer as one initial edit and flush the quantum,
/// the way an editor front end seeds the engine when it is switched on.
pub fn load<E: Evaluate>(engine: &mut Engine<E, MockHost>, now: Instant) -> Instant {
    let text = engine.host().buffer.clone();
    let lines: Vec<&str> = text.split('\n').collect();
    engine.on_edit(Pos::ORIGIN, &lines, &[], now);
    let fired = now + QUANTUM;
    engine.poll(fired);
    fired
}
