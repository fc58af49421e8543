//! Caret position type.

use serde::{Deserialize, Serialize};

/// A position in the buffer (line and character, both 0-indexed).
///
/// `character` counts chars, not bytes.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Caret {
    pub line: usize,
    pub character: usize,
}

impl Caret {
    pub const fn new(line: usize, character: usize) -> Self {
        Self { line, character }
    }

    /// The start of the document
    pub const fn start() -> Self {
        Self {
            line: 0,
            character: 0,
        }
    }
}

impl From<(usize, usize)> for Caret {
    fn from((line, character): (usize, usize)) -> Self {
        Self::new(line, character)
    }
}

impl std::fmt::Display for Caret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.character + 1)
    }
}
