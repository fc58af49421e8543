//! Persisted session state
//!
//! The session is saved to a single JSON file under the config directory
//! (`~/.config/scratch-editor/session.json`) and rehydrated on startup.
//! Only `Open` and `Error` states are worth keeping; everything else is
//! stored as `Uninitialized`, which opens a blank buffer when restored.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::caret::Caret;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("no config directory available")]
    NoConfigDir,
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid session file: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PersistedState {
    Uninitialized,
    Error {
        message: String,
    },
    Open {
        name: String,
        lines: Vec<String>,
        caret: Caret,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Schema version for forward compatibility
    #[serde(default)]
    pub version: u32,
    pub state: PersistedState,
}

impl SessionSnapshot {
    pub const CURRENT_VERSION: u32 = 1;

    pub fn new(state: PersistedState) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            state,
        }
    }
}

/// Reads and writes the session file
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store at an explicit path
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the fixed location under the config directory
    pub fn default_location() -> Result<Self, PersistError> {
        crate::config_paths::session_file()
            .map(Self::at)
            .ok_or(PersistError::NoConfigDir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored snapshot. A missing file is not an error.
    pub fn load(&self) -> Result<Option<SessionSnapshot>, PersistError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No session file at {}", self.path.display());
                return Ok(None);
            }
            Err(source) => {
                return Err(PersistError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        let snapshot: SessionSnapshot = serde_json::from_str(&contents)?;
        if snapshot.version > SessionSnapshot::CURRENT_VERSION {
            tracing::warn!(
                "Session file version {} is newer than supported {}",
                snapshot.version,
                SessionSnapshot::CURRENT_VERSION
            );
        }
        Ok(Some(snapshot))
    }

    /// Write the snapshot, creating parent directories as needed
    pub fn save(&self, snapshot: &SessionSnapshot) -> Result<(), PersistError> {
        let io_err = |source| PersistError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let contents = serde_json::to_string_pretty(snapshot)?;
        std::fs::write(&self.path, contents).map_err(io_err)?;
        tracing::debug!("Saved session to {}", self.path.display());
        Ok(())
    }
}
