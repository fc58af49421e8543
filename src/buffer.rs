//! Immutable line-array text buffer.
//!
//! A [`Buffer`] is a value: every operation borrows `self` and returns a new
//! buffer, leaving the original untouched. Lines live behind an `Arc`, so
//! cloning a buffer to snapshot or export it never copies the document.
//!
//! Invariants held after every operation:
//! - there is always at least one line (an empty document is `[""]`)
//! - no line contains `\n`
//! - the caret (and the selection anchor, if any) lies inside the document;
//!   out-of-range positions are clamped, never rejected

use std::borrow::Cow;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::caret::Caret;
use crate::selection::Selection;

/// What deleting across a line boundary does.
///
/// `Never` leaves the lines alone when backspacing at column 0 or deleting
/// at the end of a line. `Merge` joins the two lines instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineJoin {
    #[default]
    Never,
    Merge,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    lines: Arc<Vec<String>>,
    caret: Caret,
    anchor: Option<Caret>,
}

impl Default for Buffer {
    fn default() -> Self {
        Self::empty()
    }
}

impl Buffer {
    /// An empty document with the caret at the start
    pub fn empty() -> Self {
        Self {
            lines: Arc::new(vec![String::new()]),
            caret: Caret::start(),
            anchor: None,
        }
    }

    /// Split `text` on `\n` into lines, caret at the start.
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: Arc::new(text.split('\n').map(String::from).collect()),
            caret: Caret::start(),
            anchor: None,
        }
    }

    /// Decode raw bytes as UTF-8, replacing invalid sequences with U+FFFD.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::from_text(&String::from_utf8_lossy(bytes))
    }

    /// Rebuild a buffer from stored lines, clamping the caret into range.
    ///
    /// Lines are rejoined and split exactly as [`Buffer::from_text`] would,
    /// so `\r` survives and any stray `\n` starts a new line.
    pub fn from_lines(lines: Vec<String>, caret: Caret) -> Self {
        Self::from_text(&lines.join("\n")).with_caret(caret)
    }

    /// Lines joined with `\n`. Inverse of [`Buffer::from_text`].
    pub fn to_text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_text().into_bytes()
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    /// Number of lines (always >= 1)
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Length of a line in chars, 0 for lines past the end
    pub fn line_length(&self, index: usize) -> usize {
        self.lines.get(index).map_or(0, |line| char_len(line))
    }

    pub fn caret(&self) -> Caret {
        self.caret
    }

    /// Total length in chars, counting one char per line separator
    pub fn char_count(&self) -> usize {
        let text: usize = self.lines.iter().map(|line| char_len(line)).sum();
        text + self.lines.len() - 1
    }

    /// The active selection, if it covers at least one char
    pub fn selection(&self) -> Option<Selection> {
        self.anchor
            .map(|anchor| Selection::new(anchor, self.caret))
            .filter(|sel| !sel.is_empty())
    }

    pub fn has_selection(&self) -> bool {
        self.selection().is_some()
    }

    /// Text covered by the selection, lines joined with `\n`
    pub fn selected_text(&self) -> Option<String> {
        let sel = self.selection()?;
        let (start, end) = (sel.start(), sel.end());
        if start.line == end.line {
            let line = &self.lines[start.line];
            let from = char_to_byte(line, start.character);
            let to = char_to_byte(line, end.character);
            return Some(line[from..to].to_string());
        }

        let first = &self.lines[start.line];
        let last = &self.lines[end.line];
        let mut parts: Vec<&str> = Vec::with_capacity(end.line - start.line + 1);
        parts.push(&first[char_to_byte(first, start.character)..]);
        parts.extend(
            self.lines[start.line + 1..end.line]
                .iter()
                .map(String::as_str),
        );
        parts.push(&last[..char_to_byte(last, end.character)]);
        Some(parts.join("\n"))
    }

    /// Clamp a position into the document
    pub fn clamp(&self, caret: Caret) -> Caret {
        let line = caret.line.min(self.lines.len() - 1);
        Caret::new(line, caret.character.min(self.line_length(line)))
    }

    /// Convert a char offset in the document to a position (clamped)
    pub fn offset_to_caret(&self, offset: usize) -> Caret {
        let mut remaining = offset;
        for (index, line) in self.lines.iter().enumerate() {
            let len = char_len(line);
            if remaining <= len {
                return Caret::new(index, remaining);
            }
            remaining -= len + 1;
        }
        let last = self.lines.len() - 1;
        Caret::new(last, self.line_length(last))
    }

    /// Convert a position to a char offset in the document
    pub fn caret_to_offset(&self, caret: Caret) -> usize {
        let caret = self.clamp(caret);
        let before: usize = self.lines[..caret.line]
            .iter()
            .map(|line| char_len(line) + 1)
            .sum();
        before + caret.character
    }

    // =========================================================================
    // Editing
    // =========================================================================

    /// Splice `text` into the current line at the caret.
    ///
    /// Line breaks are not split here; route them through [`Buffer::new_line`]
    /// (or use [`Buffer::input`]). Any that slip through are dropped.
    /// An active selection is replaced.
    pub fn insert(&self, text: &str) -> Self {
        let text = strip_line_breaks(text);
        if text.is_empty() {
            return self.clone();
        }
        let base = self.delete_selection();
        let caret = base.caret;

        let mut lines = (*base.lines).clone();
        let line = &mut lines[caret.line];
        let at = char_to_byte(line, caret.character);
        line.insert_str(at, &text);

        base.with_lines(
            lines,
            Caret::new(caret.line, caret.character + char_len(&text)),
        )
    }

    /// Typed input: `\r\n` and lone `\r` become `\n`, each `\n` starts a new
    /// line and everything else is inserted.
    pub fn input(&self, text: &str) -> Self {
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
        let mut segments = normalized.split('\n');
        let mut buffer = match segments.next() {
            Some(first) => self.insert(first),
            None => self.clone(),
        };
        for segment in segments {
            buffer = buffer.new_line().insert(segment);
        }
        buffer
    }

    /// Split the current line at the caret; the caret moves to the start of
    /// the new line.
    pub fn new_line(&self) -> Self {
        let base = self.delete_selection();
        let caret = base.caret;

        let mut lines = (*base.lines).clone();
        let at = char_to_byte(&lines[caret.line], caret.character);
        let tail = lines[caret.line].split_off(at);
        lines.insert(caret.line + 1, tail);

        base.with_lines(lines, Caret::new(caret.line + 1, 0))
    }

    /// Remove the char before the caret. At column 0 nothing is removed.
    pub fn delete_backwards(&self) -> Self {
        if self.has_selection() {
            return self.delete_selection();
        }
        let caret = self.caret;
        if caret.character == 0 {
            return self.collapsed();
        }
        let mut lines = (*self.lines).clone();
        let line = &mut lines[caret.line];
        let from = char_to_byte(line, caret.character - 1);
        let to = char_to_byte(line, caret.character);
        line.replace_range(from..to, "");

        self.with_lines(lines, Caret::new(caret.line, caret.character - 1))
    }

    /// Remove the char at the caret. At the end of a line nothing is removed.
    pub fn delete_forwards(&self) -> Self {
        if self.has_selection() {
            return self.delete_selection();
        }
        let caret = self.caret;
        if caret.character >= self.line_length(caret.line) {
            return self.collapsed();
        }
        let mut lines = (*self.lines).clone();
        let line = &mut lines[caret.line];
        let from = char_to_byte(line, caret.character);
        let to = char_to_byte(line, caret.character + 1);
        line.replace_range(from..to, "");

        self.with_lines(lines, caret)
    }

    /// [`Buffer::delete_backwards`], joining with the previous line at
    /// column 0 when `join` is [`LineJoin::Merge`].
    pub fn delete_backwards_with(&self, join: LineJoin) -> Self {
        if join == LineJoin::Merge && !self.has_selection() && self.caret.character == 0 {
            self.join_with_previous()
        } else {
            self.delete_backwards()
        }
    }

    /// [`Buffer::delete_forwards`], joining with the next line at the end of
    /// a line when `join` is [`LineJoin::Merge`].
    pub fn delete_forwards_with(&self, join: LineJoin) -> Self {
        let at_end = self.caret.character >= self.line_length(self.caret.line);
        if join == LineJoin::Merge && !self.has_selection() && at_end {
            self.join_with_next()
        } else {
            self.delete_forwards()
        }
    }

    /// Append the current line to the previous one. Only applies with the
    /// caret at column 0 of a line other than the first.
    pub fn join_with_previous(&self) -> Self {
        let caret = self.caret;
        if caret.character != 0 || caret.line == 0 {
            return self.collapsed();
        }
        let previous_len = self.line_length(caret.line - 1);
        let mut lines = (*self.lines).clone();
        let removed = lines.remove(caret.line);
        lines[caret.line - 1].push_str(&removed);

        self.with_lines(lines, Caret::new(caret.line - 1, previous_len))
    }

    /// Append the next line to the current one. Only applies with the caret
    /// at the end of a line other than the last.
    pub fn join_with_next(&self) -> Self {
        let caret = self.caret;
        if caret.character < self.line_length(caret.line) || caret.line + 1 >= self.lines.len() {
            return self.collapsed();
        }
        let mut lines = (*self.lines).clone();
        let removed = lines.remove(caret.line + 1);
        lines[caret.line].push_str(&removed);

        self.with_lines(lines, caret)
    }

    // =========================================================================
    // Caret movement
    // =========================================================================

    /// Place the caret, clamping it into the document
    pub fn with_caret(&self, caret: Caret) -> Self {
        self.moved(self.clamp(caret))
    }

    pub fn caret_left(&self) -> Self {
        self.moved(self.left_of_caret())
    }

    pub fn caret_right(&self) -> Self {
        self.moved(self.right_of_caret())
    }

    pub fn caret_up(&self) -> Self {
        let line = self.caret.line.saturating_sub(1);
        self.moved(self.clamp(Caret::new(line, self.caret.character)))
    }

    pub fn caret_down(&self) -> Self {
        let line = self.caret.line + 1;
        self.moved(self.clamp(Caret::new(line, self.caret.character)))
    }

    pub fn caret_line_start(&self) -> Self {
        self.moved(Caret::new(self.caret.line, 0))
    }

    pub fn caret_line_end(&self) -> Self {
        self.moved(Caret::new(
            self.caret.line,
            self.line_length(self.caret.line),
        ))
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Select between two char offsets in the document. The anchor goes to
    /// `start` and the caret to `end`; both are clamped.
    pub fn select(&self, start: usize, end: usize) -> Self {
        Self {
            lines: Arc::clone(&self.lines),
            caret: self.offset_to_caret(end),
            anchor: Some(self.offset_to_caret(start)),
        }
    }

    /// Extend the selection one char to the left
    pub fn select_left(&self) -> Self {
        self.extended(self.left_of_caret())
    }

    /// Extend the selection one char to the right
    pub fn select_right(&self) -> Self {
        self.extended(self.right_of_caret())
    }

    /// Remove the selected range and collapse the caret to its start.
    /// Without a selection this only drops the anchor.
    pub fn delete_selection(&self) -> Self {
        let Some(sel) = self.selection() else {
            return self.collapsed();
        };
        let (start, end) = (sel.start(), sel.end());

        let mut lines = (*self.lines).clone();
        let head = {
            let first = &lines[start.line];
            first[..char_to_byte(first, start.character)].to_string()
        };
        let tail = {
            let last = &lines[end.line];
            last[char_to_byte(last, end.character)..].to_string()
        };
        lines.drain(start.line + 1..=end.line);
        lines[start.line] = head + &tail;

        self.with_lines(lines, start)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn left_of_caret(&self) -> Caret {
        Caret::new(self.caret.line, self.caret.character.saturating_sub(1))
    }

    fn right_of_caret(&self) -> Caret {
        let len = self.line_length(self.caret.line);
        Caret::new(self.caret.line, (self.caret.character + 1).min(len))
    }

    fn with_lines(&self, lines: Vec<String>, caret: Caret) -> Self {
        Self {
            lines: Arc::new(lines),
            caret,
            anchor: None,
        }
    }

    fn moved(&self, caret: Caret) -> Self {
        Self {
            lines: Arc::clone(&self.lines),
            caret,
            anchor: None,
        }
    }

    fn extended(&self, caret: Caret) -> Self {
        Self {
            lines: Arc::clone(&self.lines),
            caret,
            anchor: Some(self.anchor.unwrap_or(self.caret)),
        }
    }

    fn collapsed(&self) -> Self {
        self.moved(self.caret)
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Convert char offset to byte offset, saturating at the end of `s`
fn char_to_byte(s: &str, char_offset: usize) -> usize {
    s.char_indices()
        .nth(char_offset)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

fn strip_line_breaks(text: &str) -> Cow<'_, str> {
    if text.contains(['\n', '\r']) {
        Cow::Owned(text.chars().filter(|c| !matches!(c, '\n' | '\r')).collect())
    } else {
        Cow::Borrowed(text)
    }
}
