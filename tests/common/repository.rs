//! Git repository management and setup utilities
//!
//! Provides functions for creating and managing test repositories with
//! various states for integration test scenarios.

#![allow(dead_code)]

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Test repository handle. The TempDir must be kept alive for the
/// duration of the test to prevent cleanup.
pub struct TestRepo {
    pub temp_dir: TempDir,
    pub path: PathBuf,
}

impl TestRepo {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn git(repo: &Path, args: &[&str]) -> Result<()> {
    let output = Command::new("git").args(args).current_dir(repo).output()?;
    anyhow::ensure!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    Ok(())
}

/// Create a fresh git repository with user config set so commits never
/// prompt.
pub fn setup_test_repo() -> Result<TestRepo> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().to_path_buf();

    git(&path, &["init", "-b", "main"])?;
    git(&path, &["config", "user.name", "Test User"])?;
    git(&path, &["config", "user.email", "test@example.com"])?;

    Ok(TestRepo { temp_dir, path })
}

/// Repository with one initial commit containing `initial.txt`.
pub fn setup_test_repo_with_initial_commit() -> Result<TestRepo> {
    let repo = setup_test_repo()?;
    create_test_files(&repo.path, &["initial.txt"])?;
    git_add(&repo.path, ".")?;
    git_commit(&repo.path, "Initial commit")?;
    Ok(repo)
}

pub fn create_test_files(repo: &Path, names: &[&str]) -> Result<()> {
    for name in names {
        fs::write(repo.join(name), format!("content of {name}\n"))?;
    }
    Ok(())
}

pub fn modify_test_files(repo: &Path, names: &[&str]) -> Result<()> {
    for name in names {
        fs::write(repo.join(name), format!("modified content of {name}\n"))?;
    }
    Ok(())
}

pub fn git_add(repo: &Path, pathspec: &str) -> Result<()> {
    git(repo, &["add", pathspec])
}

pub fn git_commit(repo: &Path, message: &str) -> Result<()> {
    git(repo, &["commit", "-m", message])
}

pub fn git_create_branch(repo: &Path, name: &str) -> Result<()> {
    git(repo, &["branch", name])
}

pub fn git_tag(repo: &Path, name: &str) -> Result<()> {
    git(repo, &["tag", name])
}
