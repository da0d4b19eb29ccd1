//! Git repository operations via shell-out to the `git` binary.
//!
//! This module provides a high-level interface to git through [`GitRepo`].
//! Every operation runs `git` as a subprocess and parses its text output
//! into the typed records from [`crate::core::model`]. No libgit2 binding is
//! involved; the porcelain formats used here are stable plumbing output.
//!
//! # Key Features
//! - **Status reading**: `git status --porcelain` into [`FileEntry`] values
//! - **Branch / log reading**: ordered [`BranchEntry`] / [`CommitEntry`] lists
//! - **Index manipulation**: stage, unstage and discard single files
//! - **Diff extraction**: file diffs and commit patches as plain text

use crate::core::{
    error::{GlanceError, Result},
    model::{BranchEntry, CommitEntry, FileEntry},
};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Pretty format handed to `git log`; fields are pipe-separated so the
/// parser can split without quoting concerns (the subject is re-joined).
const LOG_FORMAT: &str = "%H|%at|%aN|%d|%s";

#[derive(Debug, Clone)]
pub struct GitRepo {
    workdir: PathBuf,
}

impl GitRepo {
    /// Open the repository containing `path`, or fail with `NotInGitRepo`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let output = Command::new("git")
            .args(["rev-parse", "--show-toplevel"])
            .current_dir(path.as_ref())
            .output()?;

        if !output.status.success() {
            return Err(GlanceError::NotInGitRepo);
        }

        let top = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(GitRepo {
            workdir: PathBuf::from(top),
        })
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Run a git subcommand and return its stdout, failing on a non-zero
    /// exit status.
    fn run(&self, args: &[&str]) -> Result<String> {
        log::debug!("running git {}", args.join(" "));
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .output()?;

        if !output.status.success() {
            return Err(GlanceError::git_command(
                args.join(" "),
                String::from_utf8_lossy(&output.stderr),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Like [`run`](Self::run) but tolerates failure, returning None.
    fn run_ok(&self, args: &[&str]) -> Option<String> {
        self.run(args).ok()
    }

    /// Current working-tree status, ordered as porcelain reports it.
    pub fn load_status(&self) -> Result<Vec<FileEntry>> {
        let raw = self.run(&["status", "-s", "-u", "--porcelain"])?;
        let mut files = Vec::new();
        for line in raw.lines() {
            if line.trim().is_empty() {
                continue;
            }
            files.push(parse_porcelain_line(line).ok_or_else(|| {
                GlanceError::git_output("status --porcelain", line)
            })?);
        }
        Ok(files)
    }

    /// Local branches with the current one flagged.
    pub fn load_branches(&self) -> Result<Vec<BranchEntry>> {
        let raw = self.run(&["branch"])?;
        let mut branches = Vec::new();
        for line in raw.lines() {
            if let Some(branch) = parse_branch_line(line) {
                branches.push(branch);
            }
        }
        Ok(branches)
    }

    /// Commits on the current branch, newest first. `limit` of `None`
    /// returns the full history.
    pub fn load_commits(&self, limit: Option<usize>) -> Result<Vec<CommitEntry>> {
        // Detached HEAD still has a log, it just has no upstream.
        let branch = self
            .current_branch()
            .unwrap_or_else(|_| "HEAD".to_string());

        // The first commit also present upstream separates pushed from
        // unpushed history. No upstream means everything is unpushed.
        let merge_base = self
            .run_ok(&["merge-base", &branch, &format!("{branch}@{{u}}")])
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let format = format!("--pretty=format:{LOG_FORMAT}");
        let mut args = vec!["log", branch.as_str(), format.as_str(), "--date=unix"];
        let limit_flag;
        if let Some(n) = limit {
            limit_flag = format!("-{n}");
            args.push(limit_flag.as_str());
        }

        let raw = match self.run(&args) {
            Ok(raw) => raw,
            // An unborn branch has no log at all.
            Err(GlanceError::GitCommand { .. }) => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut commits = Vec::new();
        let mut passed_merge_base = merge_base.is_none();
        for line in raw.lines() {
            if line.trim().is_empty() {
                continue;
            }
            let mut commit = parse_log_line(line)
                .ok_or_else(|| GlanceError::git_output("log", line))?;
            if Some(commit.sha.as_str()) == merge_base.as_deref() {
                passed_merge_base = true;
            }
            commit.pushed = passed_merge_base;
            commits.push(commit);
        }
        Ok(commits)
    }

    pub fn current_branch(&self) -> Result<String> {
        let raw = self.run(&["symbolic-ref", "-q", "--short", "HEAD"])?;
        Ok(raw.trim().to_string())
    }

    /// Diff text for one file. Untracked files are diffed against
    /// /dev/null so new content is still visible.
    pub fn file_diff(&self, file: &FileEntry, cached: bool) -> Result<String> {
        let path = rename_target(&file.path);
        let mut args = vec!["diff", "--submodule", "--no-ext-diff", "--color=never"];
        if cached {
            args.push("--cached");
        }
        if file.tracked {
            args.push("--");
            args.push(path);
        } else {
            args.extend(["--no-index", "--", "/dev/null", path]);
        }
        // `diff --no-index` exits 1 when the files differ, which is the
        // expected case for an untracked file, so exit status 1 still
        // yields the captured stdout.
        let output = Command::new("git")
            .args(&args)
            .current_dir(&self.workdir)
            .output()?;
        if output.status.success() || output.status.code() == Some(1) {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            Err(GlanceError::git_command(
                args.join(" "),
                String::from_utf8_lossy(&output.stderr),
            ))
        }
    }

    /// Full patch for one commit.
    pub fn commit_patch(&self, sha: &str) -> Result<String> {
        self.run(&["show", "--color=never", "--stat", "--patch", sha])
    }

    pub fn stage_file(&self, file: &FileEntry) -> Result<()> {
        self.run(&["add", "--", &file.path]).map(|_| ())
    }

    pub fn unstage_file(&self, file: &FileEntry) -> Result<()> {
        if file.tracked {
            self.run(&["reset", "HEAD", "--", &file.path]).map(|_| ())
        } else {
            self.run(&["rm", "--cached", "--force", "--", &file.path])
                .map(|_| ())
        }
    }

    /// Throw away unstaged changes to one file. Untracked files are
    /// removed from the working tree.
    pub fn discard_file(&self, file: &FileEntry) -> Result<()> {
        if file.tracked {
            self.run(&["checkout", "--", &file.path]).map(|_| ())
        } else {
            std::fs::remove_file(self.workdir.join(&file.path))?;
            Ok(())
        }
    }

    pub fn checkout_branch(&self, name: &str) -> Result<()> {
        self.run(&["checkout", name]).map(|_| ())
    }
}

/// For a rename entry ("old -> new") the operable path is the target.
fn rename_target(path: &str) -> &str {
    match path.split_once(" -> ") {
        Some((_, new)) => new,
        None => path,
    }
}

/// Parse one `git status --porcelain` line into a [`FileEntry`].
///
/// Layout: two status characters, a space, then the path.
pub(crate) fn parse_porcelain_line(line: &str) -> Option<FileEntry> {
    if line.len() < 4 {
        return None;
    }
    let change = &line[..2];
    let staged_change = &line[..1];
    let unstaged_change = &line[1..2];
    let path = line[3..].to_string();

    let untracked = matches!(change, "??" | "A " | "AM");
    let has_staged_change = !matches!(staged_change, " " | "U" | "?");
    let has_merged_conflicts =
        matches!(change, "DD" | "AA" | "UU" | "AU" | "UA" | "UD" | "DU");

    Some(FileEntry {
        path,
        short_status: change.to_string(),
        has_staged_change,
        has_unstaged_change: unstaged_change != " ",
        tracked: !untracked,
        deleted: unstaged_change == "D" || staged_change == "D",
        added: unstaged_change == "A" || untracked,
        has_merged_conflicts,
    })
}

/// Parse one `git branch` line; detached-HEAD markers are skipped.
pub(crate) fn parse_branch_line(line: &str) -> Option<BranchEntry> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.contains("HEAD detached") {
        return None;
    }
    let is_current = line.starts_with('*');
    let name = trimmed.trim_start_matches('*').trim().to_string();
    Some(BranchEntry { name, is_current })
}

/// Parse one pipe-separated `git log` line (see [`LOG_FORMAT`]).
///
/// The subject may itself contain pipes, so everything after the fourth
/// separator is re-joined into the message.
pub(crate) fn parse_log_line(line: &str) -> Option<CommitEntry> {
    let mut parts = line.splitn(5, '|');
    let sha = parts.next()?.to_string();
    let unix_timestamp = parts.next()?.parse::<i64>().ok()?;
    let author = parts.next()?.to_string();
    let decorations = parts.next()?;
    let message = parts.next().unwrap_or("").to_string();

    let mut tags = Vec::new();
    for piece in decorations.trim().trim_matches(|c| c == '(' || c == ')').split(", ") {
        if let Some(tag) = piece.trim().strip_prefix("tag: ") {
            tags.push(tag.to_string());
        }
    }

    Some(CommitEntry {
        sha,
        message,
        author,
        unix_timestamp,
        pushed: false,
        tags,
    })
}
