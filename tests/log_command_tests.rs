//! Integration tests for `git-glance log`

mod common;

use assert_cmd::Command;
use common::fixtures::*;
use common::repository::*;
use predicates::prelude::*;

fn glance() -> Command {
    Command::cargo_bin("git-glance").unwrap()
}

#[test]
fn log_shows_commit_messages_newest_first() {
    let repo = create_history_repo().unwrap();
    let assert = glance()
        .arg("log")
        .current_dir(repo.path())
        .assert()
        .success()
        .stdout(
            predicates::str::contains("first commit")
                .and(predicates::str::contains("second commit"))
                .and(predicates::str::contains("third commit")),
        );

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    let third = stdout.find("third commit").unwrap();
    let first = stdout.find("first commit").unwrap();
    assert!(third < first, "newest commit must come first");
}

#[test]
fn log_honors_the_limit_flag() {
    let repo = create_history_repo().unwrap();
    glance()
        .args(["log", "-n", "1"])
        .current_dir(repo.path())
        .assert()
        .success()
        .stdout(
            predicates::str::contains("third commit")
                .and(predicates::str::contains("first commit").not()),
        );
}

#[test]
fn log_shows_tags() {
    let repo = create_history_repo().unwrap();
    glance()
        .arg("log")
        .current_dir(repo.path())
        .assert()
        .success()
        .stdout(predicates::str::contains("v0.1.0"));
}

#[test]
fn log_on_empty_repository_reports_no_commits() {
    let repo = setup_test_repo().unwrap();
    glance()
        .arg("log")
        .current_dir(repo.path())
        .assert()
        .success()
        .stdout(predicates::str::contains("No commits yet"));
}
