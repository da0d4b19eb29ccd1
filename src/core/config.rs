//! User configuration, stored as JSON under the platform config directory.
//!
//! Missing file or missing keys fall back to defaults, so upgrades never
//! break an existing config.

use crate::core::dirs::get_config_directory;
use crate::core::error::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Cursor glyph used by the interactive panels. Must render one
    /// column wide.
    pub cursor: String,
    /// Seconds the in-panel help text stays on screen.
    pub help_wait_secs: f64,
    /// Whether the interactive mode reports mouse events.
    pub mouse_tracking: bool,
    /// Whether the code counter honors `.gitignore` rules.
    pub counter_use_gitignore: bool,
    /// Whether the counter lists files it could not read.
    pub counter_show_invalid: bool,
    /// Commits fetched per page in the commit panel.
    pub commit_page_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cursor: "→".to_string(),
            help_wait_secs: 1.5,
            mouse_tracking: false,
            counter_use_gitignore: true,
            counter_show_invalid: false,
            commit_page_size: 300,
        }
    }
}

impl Config {
    pub fn config_file() -> Result<PathBuf> {
        Ok(get_config_directory()?.join("config.json"))
    }

    /// Load the config file, falling back to defaults when it does not
    /// exist or cannot be parsed (a broken config should never make the
    /// tool unusable).
    pub fn load() -> Self {
        let path = match Self::config_file() {
            Ok(path) => path,
            Err(_) => return Self::default(),
        };
        match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                log::warn!("ignoring malformed config {}: {e}", path.display());
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_file()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    /// Cursor glyph, guarded against multi-character values.
    pub fn cursor_glyph(&self) -> &str {
        if self.cursor.chars().count() == 1 {
            &self.cursor
        } else {
            "→"
        }
    }
}
