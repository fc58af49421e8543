//! View types handed to the presentation layer.
//!
//! A [`View`] is computed from the session on every read. Only the open
//! variant carries a screen and an [`Export`] handle for saving the document.

use std::path::Path;

use crate::buffer::Buffer;
use crate::screen::Screen;
use crate::session::Status;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Uninitialized,
    Loading,
    Error { message: String },
    Open(OpenView),
}

impl View {
    pub fn status(&self) -> Status {
        match self {
            View::Uninitialized => Status::Uninitialized,
            View::Loading => Status::Loading,
            View::Error { .. } => Status::Error,
            View::Open(_) => Status::Open,
        }
    }

    pub fn as_open(&self) -> Option<&OpenView> {
        match self {
            View::Open(open) => Some(open),
            _ => None,
        }
    }
}

/// Plain-text rendering: a header, then the window with 1-indexed line
/// numbers and `|` marking the caret. Rows inside the selection get `*`
/// after the number; placeholder rows past the document end show `~`.
impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let open = match self {
            View::Uninitialized => return writeln!(f, "[uninitialized]"),
            View::Loading => return writeln!(f, "[loading]"),
            View::Error { message } => return writeln!(f, "[error] {}", message),
            View::Open(open) => open,
        };

        let screen = &open.screen;
        let line_count = open.export.buffer.line_count();
        writeln!(f, "-- {} ({}) --", open.name, screen.caret)?;
        let gutter = (screen.end() + 1).to_string().len();
        for (row, line) in screen.lines.iter().enumerate() {
            let index = screen.start + row;
            if index >= line_count {
                writeln!(f, "{:>gutter$}", "~")?;
                continue;
            }
            let mark = match screen.selection {
                Some(sel) if sel.touches_line(index) => '*',
                _ => ' ',
            };
            if row == screen.caret_row() {
                let at = line
                    .char_indices()
                    .nth(screen.caret.character)
                    .map_or(line.len(), |(i, _)| i);
                writeln!(
                    f,
                    "{:>gutter$}{}{}|{}",
                    index + 1,
                    mark,
                    &line[..at],
                    &line[at..]
                )?;
            } else {
                writeln!(f, "{:>gutter$}{}{}", index + 1, mark, line)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenView {
    /// Display name of the document
    pub name: String,
    pub screen: Screen,
    pub(crate) export: Export,
}

impl OpenView {
    pub fn export(&self) -> &Export {
        &self.export
    }

    /// Zero-argument serializer for the document as it was when the view
    /// was taken. Later edits do not affect it.
    pub fn serializer(&self) -> impl Fn() -> Vec<u8> + Send + Sync + 'static {
        let export = self.export.clone();
        move || export.to_bytes()
    }
}

/// Handle to a buffer version for saving. Cloning is cheap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    name: String,
    buffer: Buffer,
}

impl Export {
    pub(crate) fn new(name: String, buffer: Buffer) -> Self {
        Self { name, buffer }
    }

    /// Document bytes, lines joined with `\n`
    pub fn to_bytes(&self) -> Vec<u8> {
        self.buffer.to_bytes()
    }

    /// File name to offer when saving
    pub fn suggested_file_name(&self) -> &str {
        &self.name
    }

    pub fn write_to(&self, path: &Path) -> std::io::Result<()> {
        std::fs::write(path, self.to_bytes())?;
        tracing::info!("Saved {:?} to {}", self.name, path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caret::Caret;
    use tempfile::tempdir;

    fn open_view(text: &str) -> OpenView {
        let buffer = Buffer::from_text(text);
        OpenView {
            name: "notes.txt".to_string(),
            screen: Screen::project(&buffer, 5),
            export: Export::new("notes.txt".to_string(), buffer),
        }
    }

    #[test]
    fn test_serializer_reproduces_text() {
        let view = open_view("one\ntwo\n");
        let serialize = view.serializer();
        assert_eq!(serialize(), b"one\ntwo\n");
        assert_eq!(serialize(), b"one\ntwo\n");
    }

    #[test]
    fn test_status_tags() {
        assert_eq!(View::Loading.status(), Status::Loading);
        assert_eq!(
            View::Error {
                message: "x".into()
            }
            .status(),
            Status::Error
        );
        let open = View::Open(open_view(""));
        assert_eq!(open.status(), Status::Open);
        assert_eq!(open.as_open().unwrap().screen.caret, Caret::start());
        assert!(View::Uninitialized.as_open().is_none());
    }

    #[test]
    fn test_display_marks_caret() {
        let buffer = Buffer::from_text("one\ntwo").with_caret(Caret::new(1, 1));
        let view = View::Open(OpenView {
            name: "notes.txt".to_string(),
            screen: Screen::project(&buffer, 5),
            export: Export::new("notes.txt".to_string(), buffer),
        });
        assert_eq!(view.to_string(), "-- notes.txt (2:2) --\n1 one\n2 t|wo\n");
        assert_eq!(View::Loading.to_string(), "[loading]\n");
    }

    #[test]
    fn test_display_marks_selected_rows() {
        let buffer = Buffer::from_text("one\ntwo\nthree").select(1, 5);
        let view = View::Open(OpenView {
            name: "notes.txt".to_string(),
            screen: Screen::project(&buffer, 5),
            export: Export::new("notes.txt".to_string(), buffer),
        });
        assert_eq!(
            view.to_string(),
            "-- notes.txt (2:2) --\n1*one\n2*t|wo\n3 three\n"
        );
    }

    #[test]
    fn test_display_shows_placeholder_rows() {
        let buffer = Buffer::from_text("a\nb");
        let view = View::Open(OpenView {
            name: "x".to_string(),
            screen: Screen::project(&buffer, 1).padded(3),
            export: Export::new("x".to_string(), buffer),
        });
        assert_eq!(view.to_string(), "-- x (1:1) --\n1 |a\n2 b\n~\n");
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let view = open_view("saved\ncontent");

        view.export().write_to(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "saved\ncontent");
        assert_eq!(view.export().suggested_file_name(), "notes.txt");
    }
}
