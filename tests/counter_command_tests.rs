//! Integration tests for `git-glance count`

mod common;

use assert_cmd::Command;
use common::repository::*;
use predicates::prelude::*;
use std::fs;

fn glance() -> Command {
    Command::cargo_bin("git-glance").unwrap()
}

#[test]
fn count_reports_per_type_totals() {
    let repo = setup_test_repo().unwrap();
    fs::write(repo.path().join("main.rs"), "fn main() {}\n").unwrap();
    fs::write(repo.path().join("tool.py"), "print('hi')\nprint('there')\n").unwrap();

    glance()
        .args(["count", "."])
        .current_dir(repo.path())
        .assert()
        .success()
        .stdout(
            predicates::str::contains("Rust")
                .and(predicates::str::contains("Python"))
                .and(predicates::str::contains("Total")),
        );
}

#[test]
fn count_honors_gitignore() {
    let repo = setup_test_repo().unwrap();
    fs::write(repo.path().join(".gitignore"), "generated.rs\n").unwrap();
    fs::write(repo.path().join("kept.py"), "print('kept')\n").unwrap();
    fs::write(repo.path().join("generated.rs"), "fn gone() {}\n").unwrap();

    glance()
        .args(["count", "."])
        .current_dir(repo.path())
        .assert()
        .success()
        .stdout(predicates::str::contains("Rust").not());
}

#[test]
fn count_no_ignore_flag_counts_everything() {
    let repo = setup_test_repo().unwrap();
    fs::write(repo.path().join(".gitignore"), "generated.rs\n").unwrap();
    fs::write(repo.path().join("generated.rs"), "fn back() {}\n").unwrap();

    glance()
        .args(["count", ".", "--no-ignore"])
        .current_dir(repo.path())
        .assert()
        .success()
        .stdout(predicates::str::contains("Rust"));
}

#[test]
fn count_on_empty_directory_fails_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    glance()
        .args(["count", "."])
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicates::str::contains("Nothing to count"));
}
