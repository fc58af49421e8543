//! Editor configuration persistence
//!
//! Stores user preferences in `~/.config/scratch-editor/config.yaml`

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::buffer::LineJoin;

/// Editor configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Lines shown above and below the caret line
    #[serde(default = "default_visible_lines")]
    pub visible_lines: usize,

    /// Pad the screen with empty rows so its height never changes
    #[serde(default)]
    pub pad_screen: bool,

    /// Whether deleting across a line boundary joins the lines
    #[serde(default)]
    pub line_join: LineJoin,

    /// Rehydrate the previous session on startup
    #[serde(default = "default_true")]
    pub restore_session: bool,

    /// Name given to blank buffers
    #[serde(default = "default_blank_name")]
    pub blank_name: String,

    /// Largest file the loader will open, in megabytes
    #[serde(default = "default_max_file_size_mb")]
    pub max_file_size_mb: u64,
}

fn default_visible_lines() -> usize {
    12
}

fn default_true() -> bool {
    true
}

fn default_blank_name() -> String {
    "Blank".to_string()
}

fn default_max_file_size_mb() -> u64 {
    50
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            visible_lines: default_visible_lines(),
            pad_screen: false,
            line_join: LineJoin::default(),
            restore_session: default_true(),
            blank_name: default_blank_name(),
            max_file_size_mb: default_max_file_size_mb(),
        }
    }
}

impl EditorConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from `path`, falling back to defaults on any problem
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<(), String> {
        let path = crate::config_paths::config_file()
            .ok_or_else(|| "No config directory available".to_string())?;
        self.save_to(&path)
    }

    /// Save config to `path`, creating the parent directory if needed
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Loader size limit in bytes
    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb.saturating_mul(1024 * 1024)
    }
}
