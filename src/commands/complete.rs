//! `git-glance complete <shell>`: shell completion script generation.
//!
//! Scripts are produced by template substitution over the subcommand
//! table, one template per supported shell.

use crate::core::error::{GlanceError, Result};

const PROG: &str = "git-glance";

/// Subcommand → one-line description, shared by every template.
const SUBCOMMANDS: &[(&str, &str)] = &[
    ("status", "Show colored working-tree status"),
    ("branch", "List local branches or switch to one"),
    ("log", "Show one-line commit history"),
    ("count", "Count lines of code"),
    ("complete", "Generate a shell completion script"),
    ("config", "Show or create the config file"),
];

const BASH_TEMPLATE: &str = r#"# bash completion for {prog}
_{func}() {
    local cur prev words
    cur="${COMP_WORDS[COMP_CWORD]}"
    prev="${COMP_WORDS[COMP_CWORD-1]}"

    if [ "$COMP_CWORD" -eq 1 ]; then
        COMPREPLY=( $(compgen -W "{subcommands}" -- "$cur") )
        return 0
    fi

    case "$prev" in
        complete)
            COMPREPLY=( $(compgen -W "bash zsh fish" -- "$cur") )
            ;;
        branch)
            COMPREPLY=( $(compgen -W "$(git branch --format='%(refname:short)' 2>/dev/null)" -- "$cur") )
            ;;
        *)
            COMPREPLY=()
            ;;
    esac
}
complete -F _{func} {prog}
"#;

const ZSH_TEMPLATE: &str = r#"#compdef {prog}
# zsh completion for {prog}
_{func}() {
    local -a subcommands
    subcommands=(
{zsh_subcommands}
    )

    if (( CURRENT == 2 )); then
        _describe 'command' subcommands
        return
    fi

    case "$words[2]" in
        complete)
            _values 'shell' bash zsh fish
            ;;
        branch)
            _values 'branch' ${(f)"$(git branch --format='%(refname:short)' 2>/dev/null)"}
            ;;
    esac
}
_{func} "$@"
"#;

const FISH_TEMPLATE: &str = r#"# fish completion for {prog}
{fish_subcommands}
complete -c {prog} -n "__fish_seen_subcommand_from complete" -a "bash zsh fish"
complete -c {prog} -n "__fish_seen_subcommand_from branch" -a "(git branch --format='%(refname:short)' 2>/dev/null)"
"#;

pub fn execute_complete(shell: &str) -> Result<()> {
    let script = generate(shell)?;
    print!("{script}");
    Ok(())
}

/// Render the completion script for one shell.
pub fn generate(shell: &str) -> Result<String> {
    let func = PROG.replace('-', "_");
    let script = match shell {
        "bash" => BASH_TEMPLATE
            .replace("{subcommands}", &subcommand_names().join(" "))
            .replace("{func}", &func)
            .replace("{prog}", PROG),
        "zsh" => {
            let lines: Vec<String> = SUBCOMMANDS
                .iter()
                .map(|(name, help)| format!("        '{name}:{help}'"))
                .collect();
            ZSH_TEMPLATE
                .replace("{zsh_subcommands}", &lines.join("\n"))
                .replace("{func}", &func)
                .replace("{prog}", PROG)
        }
        "fish" => {
            let lines: Vec<String> = SUBCOMMANDS
                .iter()
                .map(|(name, help)| {
                    format!(
                        "complete -c {PROG} -n \"__fish_use_subcommand\" -a {name} -d \"{help}\""
                    )
                })
                .collect();
            FISH_TEMPLATE
                .replace("{fish_subcommands}", &lines.join("\n"))
                .replace("{prog}", PROG)
        }
        other => {
            return Err(GlanceError::UnknownShell {
                shell: other.to_string(),
            })
        }
    };
    Ok(script)
}

fn subcommand_names() -> Vec<&'static str> {
    SUBCOMMANDS.iter().map(|(name, _)| *name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bash_script_mentions_every_subcommand() {
        let script = generate("bash").unwrap();
        for (name, _) in SUBCOMMANDS {
            assert!(script.contains(name), "missing {name}");
        }
        assert!(script.contains("complete -F _git_glance git-glance"));
        assert!(!script.contains("{prog}"));
    }

    #[test]
    fn test_zsh_script_substitutes_placeholders() {
        let script = generate("zsh").unwrap();
        assert!(script.starts_with("#compdef git-glance"));
        assert!(script.contains("'status:Show colored working-tree status'"));
        assert!(!script.contains("{zsh_subcommands}"));
    }

    #[test]
    fn test_fish_script_substitutes_placeholders() {
        let script = generate("fish").unwrap();
        assert!(script.contains("complete -c git-glance"));
        assert!(!script.contains("{fish_subcommands}"));
    }

    #[test]
    fn test_unknown_shell_is_an_error() {
        assert!(matches!(
            generate("powershell"),
            Err(GlanceError::UnknownShell { .. })
        ));
    }
}
