//! `git-glance status`: compact colored working-tree status.

use colored::*;

use crate::core::error::Result;
use crate::core::git::GitRepo;
use crate::core::model::FileEntry;

pub fn execute_status() -> Result<()> {
    let repo = GitRepo::open(std::env::current_dir()?)?;
    let branch = repo
        .current_branch()
        .unwrap_or_else(|_| "(no branch)".to_string());
    let files = repo.load_status()?;

    println!("On branch {}", branch.cyan().bold());
    if files.is_empty() {
        println!("{}", "Working tree clean".green());
        return Ok(());
    }

    println!();
    for file in &files {
        println!("  {}", format_entry(file));
    }
    println!("\n{} changed file(s)", files.len());
    Ok(())
}

fn format_entry(file: &FileEntry) -> String {
    let code = if file.has_merged_conflicts {
        file.short_status.magenta().bold().to_string()
    } else if file.has_staged_change && !file.has_unstaged_change {
        file.short_status.green().to_string()
    } else if file.has_staged_change {
        format!(
            "{}{}",
            file.short_status[..1].green(),
            file.short_status[1..2].red()
        )
    } else {
        file.short_status.red().to_string()
    };
    format!("{code} {}", file.path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(status: &str, staged: bool, unstaged: bool, conflict: bool) -> FileEntry {
        FileEntry {
            path: "f.rs".to_string(),
            short_status: status.to_string(),
            has_staged_change: staged,
            has_unstaged_change: unstaged,
            tracked: true,
            deleted: false,
            added: false,
            has_merged_conflicts: conflict,
        }
    }

    #[test]
    fn test_format_entry_keeps_path() {
        assert!(format_entry(&entry("M ", true, false, false)).contains("f.rs"));
        assert!(format_entry(&entry("MM", true, true, false)).contains("f.rs"));
        assert!(format_entry(&entry("UU", false, true, true)).contains("f.rs"));
    }
}
