//! Repository data records produced by the git shell-out layer.
//!
//! These are plain value types consumed by the CLI commands and the
//! interactive panels. They carry pre-computed status flags so the UI layer
//! never re-parses porcelain codes.

use serde::{Deserialize, Serialize};

/// A single working-tree file with its two-letter porcelain status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Path relative to the repository root. For renames this is the
    /// new path.
    pub path: String,
    /// Raw two-character porcelain code, e.g. `"M "`, `"??"`.
    pub short_status: String,
    pub has_staged_change: bool,
    pub has_unstaged_change: bool,
    pub tracked: bool,
    pub deleted: bool,
    pub added: bool,
    pub has_merged_conflicts: bool,
}

impl FileEntry {
    /// Whether the entry can be toggled between staged and unstaged.
    pub fn stageable(&self) -> bool {
        !self.has_merged_conflicts
    }
}

/// A local branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchEntry {
    pub name: String,
    pub is_current: bool,
}

/// One commit from `git log`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitEntry {
    pub sha: String,
    pub message: String,
    pub author: String,
    pub unix_timestamp: i64,
    /// Whether the commit is already on the upstream branch.
    pub pushed: bool,
    pub tags: Vec<String>,
}

impl CommitEntry {
    pub fn short_sha(&self) -> &str {
        &self.sha[..self.sha.len().min(7)]
    }
}
