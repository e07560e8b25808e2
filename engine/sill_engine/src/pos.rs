//! Buffer positions.
//!
//! Compact 8-byte (line, column) location with the total order every other
//! engine component relies on: line first, then column.

use std::fmt;

/// A location in the edited buffer.
///
/// Lines and columns are zero-based, matching what text-buffer hosts report
/// for edits. Ordering compares lines, then columns.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct Pos {
    pub line: u32,
    pub col: u32,
}

impl Pos {
    /// Start of the document.
    pub const ORIGIN: Pos = Pos { line: 0, col: 0 };

    /// Create a new position.
    #[inline]
    pub const fn new(line: u32, col: u32) -> Self {
        Pos { line, col }
    }

    /// The position one column to the right.
    ///
    /// Used to step past a consumed statement separator.
    #[inline]
    #[must_use]
    pub const fn next_col(self) -> Self {
        Pos {
            line: self.line,
            col: self.col + 1,
        }
    }
}

impl fmt::Debug for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pos({}:{})", self.line, self.col)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}
