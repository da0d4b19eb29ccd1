//! `git-glance branch`: list local branches, or switch to one by name.

use colored::*;

use crate::core::error::Result;
use crate::core::git::GitRepo;
use crate::core::output::print_success;

pub fn execute_branches(name: Option<String>) -> Result<()> {
    let repo = GitRepo::open(std::env::current_dir()?)?;

    if let Some(name) = name {
        repo.checkout_branch(&name)?;
        print_success(&format!("Switched to branch '{name}'"));
        return Ok(());
    }

    let branches = repo.load_branches()?;
    println!("{}", "Local branches:".bold());
    for branch in &branches {
        if branch.is_current {
            println!("* {}", branch.name.green());
        } else {
            println!("  {}", branch.name);
        }
    }
    Ok(())
}
