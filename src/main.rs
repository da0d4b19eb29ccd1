use clap::{Parser, Subcommand};
use git_glance::commands::*;
use git_glance::core::{dirs::get_cache_directory, error::GlanceError, print_error, Config};
use git_glance::interactive;
use std::env;

#[derive(Parser)]
#[command(name = "git-glance")]
#[command(about = "Short git commands with a full-screen interactive repository browser")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Without a subcommand the interactive browser starts
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show colored working-tree status
    Status,
    /// List local branches, or switch to one by name
    Branch {
        /// Branch to check out
        name: Option<String>,
    },
    /// Show one-line commit history
    Log {
        /// Number of commits to show
        #[arg(short = 'n', long, default_value_t = 30)]
        limit: usize,
    },
    /// Count lines of code under a path
    Count {
        /// Directory to count
        #[arg(default_value = ".")]
        path: String,
        /// Ignore nothing, even with a .gitignore present
        #[arg(long)]
        no_ignore: bool,
    },
    /// Generate a shell completion script (bash, zsh or fish)
    Complete {
        /// Target shell
        shell: String,
    },
    /// Show the active configuration
    Config {
        /// Write a default config file
        #[arg(long)]
        init: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    if cli.debug {
        env::set_var("RUST_LOG", "debug");
    } else if env::var_os("RUST_LOG").is_none() {
        env::set_var("RUST_LOG", "info");
    }
    init_logging(cli.command.is_none());

    let config = Config::load();

    let result = match cli.command {
        None => interactive::browse(&config),
        Some(Commands::Status) => execute_status(),
        Some(Commands::Branch { name }) => execute_branches(name),
        Some(Commands::Log { limit }) => execute_log(limit),
        Some(Commands::Count { path, no_ignore }) => execute_count(
            &path,
            config.counter_use_gitignore && !no_ignore,
            config.counter_show_invalid,
        ),
        Some(Commands::Complete { shell }) => execute_complete(&shell),
        Some(Commands::Config { init }) => execute_config(init),
    };

    if let Err(e) = result {
        match e {
            GlanceError::NotInGitRepo => print_error("Not in a git repository"),
            other => print_error(&other.to_string()),
        }
        std::process::exit(1);
    }
}

/// While the interactive mode owns the screen, log lines go to a file
/// instead of stderr.
fn init_logging(interactive: bool) {
    if !interactive {
        env_logger::init();
        return;
    }

    let log_file = get_cache_directory()
        .ok()
        .and_then(|dir| {
            std::fs::create_dir_all(&dir).ok()?;
            std::fs::File::create(dir.join("glance.log")).ok()
        });

    match log_file {
        Some(file) => {
            env_logger::Builder::from_default_env()
                .target(env_logger::Target::Pipe(Box::new(file)))
                .init();
        }
        None => env_logger::init(),
    }
}
