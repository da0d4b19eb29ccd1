//! Test data generation utilities and predefined scenarios
//!
//! Provides repositories with specific file states to test git scenarios
//! consistently.

#![allow(dead_code)]

use super::repository::*;
use anyhow::Result;

/// Repository with committed, modified and untracked files all present.
pub fn create_mixed_state_repo() -> Result<TestRepo> {
    let repo = setup_test_repo()?;

    create_test_files(&repo.path, &["file1.txt", "file2.txt", "file3.txt"])?;
    git_add(&repo.path, ".")?;
    git_commit(&repo.path, "Initial commit")?;

    // One modified + staged, one modified + unstaged, two untracked.
    modify_test_files(&repo.path, &["file1.txt", "file2.txt"])?;
    git_add(&repo.path, "file1.txt")?;
    create_test_files(&repo.path, &["file4.txt", "file5.txt"])?;

    Ok(repo)
}

/// Repository with a small linear history and one tag.
pub fn create_history_repo() -> Result<TestRepo> {
    let repo = setup_test_repo()?;

    for (i, message) in ["first commit", "second commit", "third commit"]
        .iter()
        .enumerate()
    {
        let name = format!("file{i}.txt");
        create_test_files(&repo.path, &[name.as_str()])?;
        git_add(&repo.path, ".")?;
        git_commit(&repo.path, message)?;
    }
    git_tag(&repo.path, "v0.1.0")?;

    Ok(repo)
}
