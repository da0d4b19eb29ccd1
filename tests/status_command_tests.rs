//! Integration tests for `git-glance status`

mod common;

use assert_cmd::Command;
use common::assertions::*;
use common::fixtures::*;
use common::repository::*;
use predicates::prelude::*;

fn glance() -> Command {
    Command::cargo_bin("git-glance").unwrap()
}

#[test]
fn status_fails_outside_a_repository() {
    let dir = tempfile::tempdir().unwrap();
    glance()
        .arg("status")
        .current_dir(dir.path())
        .env_remove("GIT_DIR")
        .assert()
        .failure()
        .stderr(not_in_git_repo());
}

#[test]
fn status_reports_clean_tree() {
    let repo = setup_test_repo_with_initial_commit().unwrap();
    glance()
        .arg("status")
        .current_dir(repo.path())
        .assert()
        .success()
        .stdout(clean_tree());
}

#[test]
fn status_lists_changed_files() {
    let repo = create_mixed_state_repo().unwrap();
    glance()
        .arg("status")
        .current_dir(repo.path())
        .assert()
        .success()
        .stdout(
            predicates::str::contains("file1.txt")
                .and(predicates::str::contains("file2.txt"))
                .and(predicates::str::contains("file4.txt")),
        );
}

#[test]
fn status_counts_changed_files() {
    let repo = create_mixed_state_repo().unwrap();
    // file1 staged, file2 modified, file4 + file5 untracked.
    glance()
        .arg("status")
        .current_dir(repo.path())
        .assert()
        .success()
        .stdout(predicates::str::contains("4 changed file(s)"));
}

#[test]
fn status_shows_branch_name() {
    let repo = setup_test_repo_with_initial_commit().unwrap();
    glance()
        .arg("status")
        .current_dir(repo.path())
        .assert()
        .success()
        .stdout(predicates::str::contains("main"));
}
