//! Screen windowing - the bounded view of a buffer handed to renderers.
//!
//! A [`Screen`] is derived from a [`Buffer`] on every read and never stored.
//! The window reaches `max_lines` above and below the caret line, clipped at
//! the document edges:
//!
//! ```text
//!  lines            window (max_lines = 2)
//!  0  fn main() {
//!  1      let a = 1;  ┐ start = 1
//!  2      let b = 2;  │
//!  3      a + b  |    │ caret line
//!  4  }               │
//!  5                  ┘
//! ```

use crate::buffer::Buffer;
use crate::caret::Caret;
use crate::selection::Selection;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    /// Index of the first visible line in the buffer
    pub start: usize,
    /// Caret copied through from the buffer (document coordinates)
    pub caret: Caret,
    /// Visible lines, `lines[0]` is buffer line `start`
    pub lines: Vec<String>,
    /// Active selection (document coordinates)
    pub selection: Option<Selection>,
}

impl Screen {
    /// Project `buffer` into a window of at most `2 * max_lines + 1` lines
    /// that always contains the caret line.
    pub fn project(buffer: &Buffer, max_lines: usize) -> Self {
        let caret = buffer.caret();
        let start = caret.line.saturating_sub(max_lines);
        let end = caret
            .line
            .saturating_add(max_lines)
            .saturating_add(1)
            .min(buffer.line_count());

        Self {
            start,
            caret,
            lines: buffer.lines()[start..end].to_vec(),
            selection: buffer.selection(),
        }
    }

    /// Pad with empty rows up to `rows` so the layout height stays fixed.
    /// Never truncates.
    pub fn padded(mut self, rows: usize) -> Self {
        if self.lines.len() < rows {
            self.lines.resize(rows, String::new());
        }
        self
    }

    /// Row of the caret within the window
    pub fn caret_row(&self) -> usize {
        self.caret.line - self.start
    }

    /// Buffer line index of the last visible row
    pub fn end(&self) -> usize {
        self.start + self.lines.len().saturating_sub(1)
    }
}
