//! Handler for the `init` command.

use colored::*;
use tidybridge_lib::config::{CONFIG_FILES, ConfigError, create_default_config};
use tidybridge_lib::exit_codes::exit;

/// Write a default `.tidybridge.toml` in the current directory.
pub fn handle_init() {
    let path = CONFIG_FILES[0];
    match create_default_config(path) {
        Ok(()) => {
            println!("Created default configuration file: {path}");
            println!("Set {} to your perltidy binary before running.", "executable".cyan());
        }
        Err(ConfigError::FileExists { path }) => {
            eprintln!("{}: Configuration file already exists at {path}", "Error".red().bold());
            exit::tool_error();
        }
        Err(e) => {
            eprintln!("{}: Failed to create config file: {e}", "Error".red().bold());
            exit::tool_error();
        }
    }
}
