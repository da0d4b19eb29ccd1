//! `git-glance log`: one-line commit history with pushed/unpushed
//! coloring.

use chrono::DateTime;
use colored::*;

use crate::core::error::Result;
use crate::core::git::GitRepo;

pub fn execute_log(limit: usize) -> Result<()> {
    let repo = GitRepo::open(std::env::current_dir()?)?;
    let commits = repo.load_commits(Some(limit))?;

    if commits.is_empty() {
        println!("{}", "No commits yet".bright_black());
        return Ok(());
    }

    for commit in &commits {
        let date = DateTime::from_timestamp(commit.unix_timestamp, 0)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        let sha = if commit.pushed {
            commit.short_sha().yellow()
        } else {
            commit.short_sha().red()
        };
        let tags = if commit.tags.is_empty() {
            String::new()
        } else {
            format!(" ({})", commit.tags.join(", ")).magenta().to_string()
        };
        println!(
            "{sha} {} {}{tags} {}",
            date.bright_black(),
            commit.author.cyan(),
            commit.message
        );
    }
    Ok(())
}
