use clap::{Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};

use tidybridge_lib::config::{Config, ConfigOverrides, ConfigStore, load_config};
use tidybridge_lib::exit_codes::exit;

mod cli_types;
mod commands;
mod file_processor;
mod formatter;
mod watch;

use cli_types::{FormatArgs, RunArgs, SchemaAction, WatchArgs};

#[derive(Parser)]
#[command(name = "tidybridge", author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path (default: nearest .tidybridge.toml or tidybridge.toml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Path to the perltidy executable
    #[arg(long, global = true)]
    perltidy: Option<String>,

    /// Arguments passed to perltidy, space separated (e.g. "-se -pbp")
    #[arg(long = "args", global = true, allow_hyphen_values = true)]
    perltidy_args: Option<String>,

    /// Kill perltidy after this many milliseconds (0 = no limit)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Show detailed output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Format Perl files in place (or stdin to stdout)
    Format(FormatArgs),
    /// Run perltidy and report issues without changing anything
    Check(RunArgs),
    /// Re-check whenever Perl files or the configuration change
    Watch(WatchArgs),
    /// Create a default configuration file
    Init,
    /// Print, generate, or check the configuration JSON schema
    Schema {
        #[command(subcommand)]
        action: SchemaAction,
    },
    /// Show version information
    Version,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            executable: self.perltidy.clone(),
            args: self.perltidy_args.clone(),
            format_on_save: None,
            timeout: self.timeout,
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

/// Load configuration and apply CLI overrides, exiting on error
fn load_config_with_cli_error_handling(
    config_path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> (Config, Option<PathBuf>) {
    let start_dir = std::env::current_dir().unwrap_or_else(|e| {
        eprintln!("{}: Failed to get current directory: {}", "Error".red().bold(), e);
        exit::tool_error();
    });

    match load_config(config_path, &start_dir) {
        Ok(loaded) => {
            if let Some(path) = &loaded.path {
                log::debug!("Using configuration from {}", path.display());
            }
            (loaded.config.with_overrides(overrides), loaded.path)
        }
        Err(e) => {
            eprintln!("{}: {}", "Config error".red().bold(), e);
            exit::tool_error();
        }
    }
}

fn build_runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap_or_else(|e| {
            eprintln!("{}: Failed to create Tokio runtime: {}", "Error".red().bold(), e);
            exit::tool_error();
        })
}

fn finish(result: anyhow::Result<i32>) -> ! {
    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{}: {e:#}", "Error".red().bold());
            exit::tool_error();
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let overrides = cli.overrides();
    let explicit_config = cli.config.as_deref().map(Path::new);

    match &cli.command {
        Commands::Version => commands::version::handle_version(),
        Commands::Init => commands::init::handle_init(),
        Commands::Schema { action } => commands::schema::handle_schema(*action),
        Commands::Format(args) => {
            let (config, _) = load_config_with_cli_error_handling(explicit_config, &overrides);
            let runtime = build_runtime();
            finish(runtime.block_on(commands::format::handle_format(ConfigStore::new(config), args)));
        }
        Commands::Check(args) => {
            let (config, _) = load_config_with_cli_error_handling(explicit_config, &overrides);
            let runtime = build_runtime();
            finish(runtime.block_on(commands::check::handle_check(ConfigStore::new(config), args)));
        }
        Commands::Watch(args) => {
            let (config, config_path) = load_config_with_cli_error_handling(explicit_config, &overrides);
            let runtime = build_runtime();
            let reload = || -> anyhow::Result<Config> {
                let start_dir = std::env::current_dir()?;
                let loaded = load_config(explicit_config, &start_dir)?;
                Ok(loaded.config.with_overrides(&overrides))
            };
            watch::run_watch_mode(
                &runtime,
                ConfigStore::new(config),
                config_path.as_deref(),
                reload,
                args,
            );
        }
    }
}
