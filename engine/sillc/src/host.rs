//! In-memory document host backing the CLI commands.

use sill_engine::{Host, MarkStyle, Pos};

/// Owns the document text, counts decoration handles, and retains the last
/// published log for the command handlers to print.
pub struct BufferHost {
    buffer: String,
    output: String,
    live_marks: usize,
    next_mark: usize,
}

impl BufferHost {
    pub fn new(buffer: String) -> Self {
        BufferHost {
            buffer,
            output: String::new(),
            live_marks: 0,
            next_mark: 0,
        }
    }

    /// The log from the most recent pass.
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Decorations currently held by checkpoints.
    pub fn live_marks(&self) -> usize {
        self.live_marks
    }

    /// Append one line to the document, returning the position where the
    /// new text starts, for reporting the append as an edit.
    pub fn append_line(&mut self, line: &str) -> Pos {
        let pos = if self.buffer.is_empty() {
            Pos::ORIGIN
        } else {
            let line_count = u32::try_from(self.buffer.split('\n').count()).unwrap_or(u32::MAX);
            self.buffer.push('\n');
            Pos::new(line_count, 0)
        };
        self.buffer.push_str(line);
        pos
    }
}

impl Host for BufferHost {
    type Mark = usize;

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

    fn mark(&mut self, from: Pos, to: Pos, style: MarkStyle) -> usize {
        let id = self.next_mark;
        self.next_mark += 1;
        self.live_marks += 1;
        tracing::trace!(%from, %to, ?style, id, "mark placed");
        id
    }

    fn release(&mut self, mark: usize) {
        self.live_marks = self.live_marks.saturating_sub(1);
        tracing::trace!(id = mark, "mark released");
    }

    fn publish(&mut self, output: &str) {
        self.output.clear();
        self.output.push_str(output);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_append_line_positions() {
        let mut host = BufferHost::new(String::new());
        assert_eq!(host.append_line("val x = 1;"), Pos::ORIGIN);
        assert_eq!(host.append_line("val y = 2;"), Pos::new(1, 0));
        assert_eq!(host.text_from(Pos::new(1, 0)), "val y = 2;");
        assert_eq!(host.text_from(Pos::new(0, 4)), "x = 1;\nval y = 2;");
    }

    #[test]
    fn test_text_from_past_end_is_empty() {
        let host = BufferHost::new("val x = 1;".to_string());
        assert_eq!(host.text_from(Pos::new(3, 0)), "");
    }
}
