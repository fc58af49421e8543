//! Loading document content from external sources.
//!
//! A load runs on its own thread and reports back over a channel with a
//! [`LoadCompleted`] message tagged by the [`LoadId`] of the request that
//! started it. The fetch itself cannot be cancelled; the session drops
//! completions whose id is no longer current.

pub mod file_validation;

use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::sync::Arc;

use thiserror::Error;

pub use file_validation::{filename_for_display, is_likely_binary, validate_file_for_opening};

/// Errors that can occur while fetching document content
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadError {
    #[error("file not found")]
    NotFound,
    #[error("permission denied")]
    PermissionDenied,
    #[error("is a directory")]
    IsDirectory,
    #[error("binary file")]
    BinaryFile,
    #[error("file too large ({size_mb:.1} MB)")]
    TooLarge { size_mb: f64 },
    #[error("{0}")]
    Io(String),
}

impl From<std::io::Error> for LoadError {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::NotFound => LoadError::NotFound,
            std::io::ErrorKind::PermissionDenied => LoadError::PermissionDenied,
            _ => LoadError::Io(e.to_string()),
        }
    }
}

impl LoadError {
    /// Get a user-friendly error message
    pub fn user_message(&self, name: &str) -> String {
        match self {
            Self::NotFound => format!("File not found: {}", name),
            Self::PermissionDenied => format!("Permission denied: {}", name),
            Self::IsDirectory => format!("Cannot open directory: {}", name),
            Self::BinaryFile => format!("Cannot open binary file: {}", name),
            Self::TooLarge { size_mb } => format!("{} is too large ({:.1} MB)", name, size_mb),
            Self::Io(msg) => format!("Error opening {}: {}", name, msg),
        }
    }
}

/// Where document content comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// A file on disk
    File(PathBuf),
    /// Bytes already in memory (pasted content, tests)
    Inline(Vec<u8>),
}

impl Source {
    pub fn describe(&self) -> String {
        match self {
            Source::File(path) => path.display().to_string(),
            Source::Inline(bytes) => format!("<{} inline bytes>", bytes.len()),
        }
    }
}

/// Fetches raw bytes for a [`Source`]. Called once per load, off the
/// session's thread.
pub trait Loader: Send + Sync {
    fn fetch(&self, source: &Source) -> Result<Vec<u8>, LoadError>;
}

/// Reads files from disk after validating them
#[derive(Debug, Clone)]
pub struct FileLoader {
    max_file_size: u64,
}

impl Default for FileLoader {
    fn default() -> Self {
        Self::new(file_validation::MAX_FILE_SIZE)
    }
}

impl FileLoader {
    pub fn new(max_file_size: u64) -> Self {
        Self { max_file_size }
    }
}

impl Loader for FileLoader {
    fn fetch(&self, source: &Source) -> Result<Vec<u8>, LoadError> {
        match source {
            Source::Inline(bytes) => Ok(bytes.clone()),
            Source::File(path) => {
                validate_file_for_opening(path, self.max_file_size)?;
                if is_likely_binary(path) {
                    return Err(LoadError::BinaryFile);
                }
                Ok(std::fs::read(path)?)
            }
        }
    }
}

/// Identifies one load request. Later requests get larger ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadId(pub u64);

/// Result of a load, sent back to the session
#[derive(Debug)]
pub struct LoadCompleted {
    pub id: LoadId,
    pub name: String,
    pub result: Result<Vec<u8>, LoadError>,
}

/// Run `loader` on a background thread and send the outcome to `tx`.
pub fn spawn(
    loader: Arc<dyn Loader>,
    id: LoadId,
    name: String,
    source: Source,
    tx: Sender<LoadCompleted>,
) {
    std::thread::spawn(move || {
        tracing::debug!("Load {:?} fetching {}", id, source.describe());
        let result = loader.fetch(&source);
        // The session may have been dropped; nothing to report to then.
        let _ = tx.send(LoadCompleted { id, name, result });
    });
}
