//! Single-range selection.

use serde::{Deserialize, Serialize};

use crate::caret::Caret;

/// A text selection with anchor (start point) and head (caret position).
/// The anchor stays fixed while the head moves during selection extension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    /// Where the selection started (fixed point)
    pub anchor: Caret,
    /// Where the caret is (moving point)
    pub head: Caret,
}

impl Selection {
    pub fn new(anchor: Caret, head: Caret) -> Self {
        Self { anchor, head }
    }

    /// Check if selection is empty (anchor == head)
    pub fn is_empty(&self) -> bool {
        self.anchor == self.head
    }

    /// Get the start position (minimum of anchor and head)
    pub fn start(&self) -> Caret {
        self.anchor.min(self.head)
    }

    /// Get the end position (maximum of anchor and head)
    pub fn end(&self) -> Caret {
        self.anchor.max(self.head)
    }

    /// Whether any part of `line` falls inside the selection
    pub fn touches_line(&self, line: usize) -> bool {
        !self.is_empty() && self.start().line <= line && line <= self.end().line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_start_end() {
        let forward = Selection::new(Caret::new(0, 0), Caret::new(0, 5));
        assert_eq!(forward.start(), Caret::new(0, 0));
        assert_eq!(forward.end(), Caret::new(0, 5));

        let backward = Selection::new(Caret::new(0, 5), Caret::new(0, 0));
        assert_eq!(backward.start(), Caret::new(0, 0));
        assert_eq!(backward.end(), Caret::new(0, 5));
    }

    #[test]
    fn test_touches_line() {
        let sel = Selection::new(Caret::new(3, 4), Caret::new(1, 0));
        assert!(!sel.touches_line(0));
        assert!(sel.touches_line(1));
        assert!(sel.touches_line(2));
        assert!(sel.touches_line(3));
        assert!(!sel.touches_line(4));

        let empty = Selection::new(Caret::new(1, 1), Caret::new(1, 1));
        assert!(!empty.touches_line(1));
    }
}
