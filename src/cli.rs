//! Command-line argument parsing for the driver
//!
//! Supports:
//! - Opening a file
//! - Jump to line/column
//! - New empty buffer mode (skip session restore)
//! - Running actions from a script file instead of stdin

use clap::Parser;
use std::path::PathBuf;

use crate::caret::Caret;

/// Headless line-buffer editor driven by actions on stdin
#[derive(Parser, Debug)]
#[command(name = "scratch", version, about = "A headless line-buffer editor")]
pub struct CliArgs {
    /// File to open
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Start with empty buffer (ignore session restore)
    #[arg(short = 'n', long)]
    pub new: bool,

    /// Go to line N
    #[arg(long, value_name = "N")]
    pub line: Option<usize>,

    /// Go to column N (used with --line)
    #[arg(long, value_name = "N")]
    pub column: Option<usize>,

    /// Lines shown above and below the caret (overrides config)
    #[arg(long, value_name = "N")]
    pub visible_lines: Option<usize>,

    /// Read actions from FILE instead of stdin
    #[arg(long, value_name = "FILE")]
    pub script: Option<PathBuf>,

    /// Do not read or write the persisted session
    #[arg(long)]
    pub no_persist: bool,
}

/// The startup mode determines what to open
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartupMode {
    /// Rehydrate the persisted session (blank buffer if there is none)
    Restore,
    /// Start with an empty buffer
    Empty,
    /// Load a single file
    File(PathBuf),
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub mode: StartupMode,
    /// Initial caret position, 0-indexed
    pub initial_position: Option<Caret>,
    pub visible_lines: Option<usize>,
    pub script: Option<PathBuf>,
    pub persist: bool,
}

impl CliArgs {
    /// Convert parsed CLI args into startup configuration
    pub fn into_config(self) -> Result<StartupConfig, String> {
        let mode = match self.path {
            _ if self.new => StartupMode::Empty,
            None => StartupMode::Restore,
            Some(path) if path.is_dir() => {
                return Err(format!("Cannot open a directory: {}", path.display()));
            }
            Some(path) => StartupMode::File(path),
        };

        // Convert from 1-indexed (user input) to 0-indexed (internal)
        let initial_position = self.line.map(|line| {
            let line_0 = line.saturating_sub(1);
            let col_0 = self.column.unwrap_or(1).saturating_sub(1);
            Caret::new(line_0, col_0)
        });

        Ok(StartupConfig {
            mode,
            initial_position,
            visible_lines: self.visible_lines,
            script: self.script,
            persist: !self.no_persist,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(path: Option<&str>) -> CliArgs {
        CliArgs {
            path: path.map(PathBuf::from),
            new: false,
            line: None,
            column: None,
            visible_lines: None,
            script: None,
            no_persist: false,
        }
    }

    #[test]
    fn test_no_path_restores_session() {
        let config = args(None).into_config().unwrap();
        assert_eq!(config.mode, StartupMode::Restore);
        assert!(config.persist);
    }

    #[test]
    fn test_new_flag_gives_empty_mode() {
        let config = CliArgs {
            new: true,
            ..args(Some("file.txt"))
        }
        .into_config()
        .unwrap();
        assert_eq!(config.mode, StartupMode::Empty);
    }

    #[test]
    fn test_single_file() {
        let config = args(Some("file.txt")).into_config().unwrap();
        assert_eq!(config.mode, StartupMode::File(PathBuf::from("file.txt")));
    }

    #[test]
    fn test_directory_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let result = args(dir.path().to_str()).into_config();
        assert!(result.is_err());
    }

    #[test]
    fn test_line_column_conversion() {
        let config = CliArgs {
            line: Some(42),
            column: Some(10),
            ..args(Some("file.txt"))
        }
        .into_config()
        .unwrap();
        // 1-indexed to 0-indexed: line 42 → 41, column 10 → 9
        assert_eq!(config.initial_position, Some(Caret::new(41, 9)));
    }

    #[test]
    fn test_line_without_column() {
        let config = CliArgs {
            line: Some(10),
            ..args(Some("file.txt"))
        }
        .into_config()
        .unwrap();
        assert_eq!(config.initial_position, Some(Caret::new(9, 0)));
    }

    #[test]
    fn test_parse_from_command_line() {
        let args = CliArgs::try_parse_from([
            "scratch",
            "notes.txt",
            "--visible-lines",
            "3",
            "--no-persist",
        ])
        .unwrap();
        let config = args.into_config().unwrap();
        assert_eq!(config.visible_lines, Some(3));
        assert!(!config.persist);
    }
}
