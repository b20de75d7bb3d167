//! Handler for the `schema` command.

use colored::*;
use std::fs;
use std::path::PathBuf;

use tidybridge_lib::config::Config;
use tidybridge_lib::exit_codes::exit;

use crate::cli_types::SchemaAction;

const SCHEMA_FILE: &str = "tidybridge.schema.json";

/// Handle the schema subcommand (print, generate, or check).
pub fn handle_schema(action: SchemaAction) {
    let schema = schemars::schema_for!(Config);
    let schema_json = serde_json::to_string_pretty(&schema).unwrap_or_else(|e| {
        eprintln!("{}: Failed to serialize schema: {}", "Error".red().bold(), e);
        exit::tool_error();
    });

    match action {
        SchemaAction::Print => {
            println!("{schema_json}");
        }
        SchemaAction::Generate => {
            let schema_path = schema_path();
            let existing_schema = fs::read_to_string(&schema_path).ok();

            if existing_schema.as_ref() == Some(&schema_json) {
                println!("Schema is already up-to-date: {}", schema_path.display());
            } else {
                fs::write(&schema_path, &schema_json).unwrap_or_else(|e| {
                    eprintln!("{}: Failed to write schema file: {}", "Error".red().bold(), e);
                    exit::tool_error();
                });
                println!("Schema updated: {}", schema_path.display());
            }
        }
        SchemaAction::Check => {
            let schema_path = schema_path();
            let existing_schema = fs::read_to_string(&schema_path).unwrap_or_else(|_| {
                eprintln!("Error: Schema file not found: {}", schema_path.display());
                eprintln!("Run 'tidybridge schema generate' to create it.");
                exit::tool_error();
            });

            if existing_schema != schema_json {
                eprintln!("Error: Schema is out of date: {}", schema_path.display());
                eprintln!("Run 'tidybridge schema generate' to update it.");
                exit::tool_error();
            }
            println!("Schema is up-to-date: {}", schema_path.display());
        }
    }
}

fn schema_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|e| {
            eprintln!("{}: Failed to get current directory: {}", "Error".red().bold(), e);
            exit::tool_error();
        })
        .join(SCHEMA_FILE)
}
