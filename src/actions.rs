//! Action vocabulary
//!
//! The discrete operations a presentation layer can request from a session,
//! plus a small text form used by the command-line driver:
//!
//! ```text
//! init NAME          load PATH           type TEXT
//! newline            backspace           delete
//! left right up down home end
//! select START END   select-left         select-right
//! ```
//!
//! `type` takes the rest of the line verbatim with `\n`, `\t` and `\\`
//! escapes.

use std::path::PathBuf;

use thiserror::Error;

use crate::load::{filename_for_display, Source};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Open a blank buffer
    Init(String),
    /// Replace the buffer with content from `source`
    Load { name: String, source: Source },
    /// Typed text; line breaks start new lines
    Input(String),
    NewLine,
    DeleteBackwards,
    DeleteForwards,
    CaretLeft,
    CaretRight,
    CaretUp,
    CaretDown,
    CaretLineStart,
    CaretLineEnd,
    /// Select between two char offsets in the document
    Select { start: usize, end: usize },
    SelectLeft,
    SelectRight,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseActionError {
    #[error("empty action")]
    Empty,
    #[error("unknown action: {0}")]
    Unknown(String),
    #[error("{action} expects {expected}")]
    MissingArgument {
        action: &'static str,
        expected: &'static str,
    },
    #[error("invalid offset {0:?}")]
    InvalidOffset(String),
}

impl Action {
    /// Parse one action from its text form
    pub fn parse(line: &str) -> Result<Self, ParseActionError> {
        let line = line.trim_start();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest),
            None => (line.trim_end(), ""),
        };

        let action = match verb {
            "" => return Err(ParseActionError::Empty),
            "init" => Action::Init(required(rest.trim(), "init", "a name")?.to_string()),
            "load" => {
                let path = PathBuf::from(required(rest.trim(), "load", "a path")?);
                Action::Load {
                    name: filename_for_display(&path),
                    source: Source::File(path),
                }
            }
            "type" => Action::Input(unescape(rest)),
            "newline" | "enter" => Action::NewLine,
            "backspace" => Action::DeleteBackwards,
            "delete" => Action::DeleteForwards,
            "left" => Action::CaretLeft,
            "right" => Action::CaretRight,
            "up" => Action::CaretUp,
            "down" => Action::CaretDown,
            "home" => Action::CaretLineStart,
            "end" => Action::CaretLineEnd,
            "select" => {
                let mut parts = rest.split_whitespace();
                let (Some(start), Some(end)) = (parts.next(), parts.next()) else {
                    return Err(ParseActionError::MissingArgument {
                        action: "select",
                        expected: "START and END offsets",
                    });
                };
                Action::Select {
                    start: offset(start)?,
                    end: offset(end)?,
                }
            }
            "select-left" => Action::SelectLeft,
            "select-right" => Action::SelectRight,
            other => return Err(ParseActionError::Unknown(other.to_string())),
        };
        Ok(action)
    }
}

fn required<'a>(
    value: &'a str,
    action: &'static str,
    expected: &'static str,
) -> Result<&'a str, ParseActionError> {
    if value.is_empty() {
        Err(ParseActionError::MissingArgument { action, expected })
    } else {
        Ok(value)
    }
}

fn offset(value: &str) -> Result<usize, ParseActionError> {
    value
        .parse()
        .map_err(|_| ParseActionError::InvalidOffset(value.to_string()))
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
