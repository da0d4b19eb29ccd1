//! git-glance: short git commands with a full-screen interactive
//! repository browser.
//!
//! The [`tui`] module is a self-contained terminal runtime: raw-mode
//! control, byte-level escape/mouse decoding, a poll-driven input loop
//! that reconciles asynchronous resize signals, and a component tree with
//! a strict single-active-child rule. [`interactive`] builds the git
//! browsing panels on top of it, [`core`] holds the git shell-out layer
//! and configuration, and [`commands`] the plain CLI subcommands.

pub mod commands;
pub mod core;
pub mod interactive;
pub mod tui;

pub use core::{
    config::Config,
    error::{GlanceError, Result},
    git::GitRepo,
    model::{BranchEntry, CommitEntry, FileEntry},
    output::{print_error, print_hint, print_info, print_success},
};
