//! Domain-specific error types and error handling utilities.
//!
//! This module defines [`GlanceError`] which covers every failure mode of
//! git-glance, from shell-out git failures to terminal-runtime configuration
//! errors. It uses `thiserror` for ergonomic error definitions.
//!
//! # Error Categories
//! - **Git operations**: repository not found, git command failures
//! - **Terminal runtime**: unsupported platform, undersized terminal,
//!   component misconfiguration
//! - **Config / cache**: serialization and file system errors

use std::path::PathBuf;
use thiserror::Error;

/// Domain-specific error types for git-glance
#[derive(Error, Debug)]
pub enum GlanceError {
    // Git repository errors
    #[error("Not in a git repository")]
    NotInGitRepo,

    #[error("git {command} failed: {stderr}")]
    GitCommand { command: String, stderr: String },

    #[error("Unexpected output from git {command}: {line}")]
    GitOutput { command: String, line: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // Terminal runtime errors
    #[error("Interactive mode is not supported on this platform")]
    UnsupportedPlatform,

    #[error("Terminal too small: {cols}x{rows} (need at least {min_cols}x{min_rows})")]
    TerminalTooSmall {
        cols: u16,
        rows: u16,
        min_cols: u16,
        min_rows: u16,
    },

    // Component configuration errors: programmer mistakes, surfaced
    // immediately rather than swallowed.
    #[error("Component name '{name}' is already registered")]
    DuplicateComponent { name: String },

    #[error("Container received an action it does not understand: {action}")]
    UnknownAction { action: String },

    #[error("No component named '{name}' in this container")]
    UnknownComponent { name: String },

    // Config / counter errors
    #[error("Could not find config directory")]
    ConfigDirectoryNotFound,

    #[error("Failed to read config file '{path}': {source}")]
    ConfigReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid ignore pattern '{pattern}': {source}")]
    InvalidIgnorePattern {
        pattern: String,
        source: regex::Error,
    },

    #[error("Nothing to count under '{path}'")]
    NothingToCount { path: PathBuf },

    #[error("Unknown shell '{shell}'. Supported: bash, zsh, fish")]
    UnknownShell { shell: String },
}

/// Convenience type alias for Results using GlanceError
pub type Result<T> = std::result::Result<T, GlanceError>;

impl GlanceError {
    /// Create a git command failure from the command line and its stderr
    pub fn git_command(command: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self::GitCommand {
            command: command.into(),
            stderr: stderr.into().trim().to_string(),
        }
    }

    /// Create a malformed-git-output error for a single line
    pub fn git_output(command: impl Into<String>, line: impl Into<String>) -> Self {
        Self::GitOutput {
            command: command.into(),
            line: line.into(),
        }
    }

    /// Create a duplicate component name error
    pub fn duplicate_component(name: impl Into<String>) -> Self {
        Self::DuplicateComponent { name: name.into() }
    }

    /// Create an unknown container action error
    pub fn unknown_action(action: impl Into<String>) -> Self {
        Self::UnknownAction {
            action: action.into(),
        }
    }

    /// Create a terminal-too-small error against the configured minimum
    pub fn terminal_too_small(cols: u16, rows: u16, min_cols: u16, min_rows: u16) -> Self {
        Self::TerminalTooSmall {
            cols,
            rows,
            min_cols,
            min_rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GlanceError::NotInGitRepo;
        assert_eq!(err.to_string(), "Not in a git repository");
    }

    #[test]
    fn test_git_command_error_trims_stderr() {
        let err = GlanceError::git_command("status", "fatal: bad revision\n");
        assert_eq!(err.to_string(), "git status failed: fatal: bad revision");
    }

    #[test]
    fn test_terminal_too_small_error() {
        let err = GlanceError::terminal_too_small(40, 5, 60, 8);
        assert_eq!(
            err.to_string(),
            "Terminal too small: 40x5 (need at least 60x8)"
        );
    }

    #[test]
    fn test_duplicate_component_error() {
        let err = GlanceError::duplicate_component("status");
        assert_eq!(
            err.to_string(),
            "Component name 'status' is already registered"
        );
    }

    #[test]
    fn test_unknown_action_error() {
        let err = GlanceError::unknown_action("teleport");
        assert!(err.to_string().contains("teleport"));
    }
}
