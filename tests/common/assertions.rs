//! Common assertion helpers for test output validation

#![allow(dead_code)]

use predicates::prelude::*;

/// Predicate matching the not-a-repository error message
pub fn not_in_git_repo() -> impl Predicate<str> {
    predicates::str::contains("Not in a git repository")
}

/// Predicate matching the clean-tree message from `status`
pub fn clean_tree() -> impl Predicate<str> {
    predicates::str::contains("Working tree clean")
}

/// Predicate matching a branch name in `branch` output
pub fn has_branch(name: &str) -> impl Predicate<str> {
    predicates::str::contains(name.to_string())
}
