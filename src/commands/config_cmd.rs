//! `git-glance config`: show the active configuration, or write a
//! default config file to edit.

use crate::core::config::Config;
use crate::core::error::Result;
use crate::core::output::{print_hint, print_success};

pub fn execute_config(init: bool) -> Result<()> {
    let path = Config::config_file()?;

    if init {
        if path.exists() {
            print_hint(&format!("Config already exists at {}", path.display()));
            return Ok(());
        }
        Config::default().save()?;
        print_success(&format!("Wrote default config to {}", path.display()));
        return Ok(());
    }

    let config = Config::load();
    println!("{}", serde_json::to_string_pretty(&config)?);
    print_hint(&format!("config file: {}", path.display()));
    Ok(())
}
