//! Configuration for tidybridge.
//!
//! Settings come from `.tidybridge.toml` / `tidybridge.toml` (discovered upward from the
//! working directory, or named explicitly), with command-line overrides applied on top.
//! Consumers never hold on to a [`Config`]; they take a snapshot from a [`ConfigStore`]
//! at the start of each run.

mod loading;
pub mod store;

pub use loading::{CONFIG_FILES, LoadedConfig, discover_config_upward, load_config, load_config_file};
pub use store::ConfigStore;

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

/// User configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, schemars::JsonSchema)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    /// Path to the perltidy executable. Formatting is refused while unset.
    #[serde(default)]
    pub executable: Option<String>,

    /// Extra perltidy arguments, space separated (default: "-se")
    #[serde(default)]
    pub args: Option<String>,

    /// Format Perl documents before they are saved (default: false)
    #[serde(default)]
    pub format_on_save: bool,

    /// Timeout per perltidy run in milliseconds, 0 to wait forever (default: 30000)
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

fn default_timeout() -> u64 {
    30_000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            executable: None,
            args: None,
            format_on_save: false,
            timeout: default_timeout(),
        }
    }
}

impl Config {
    /// The executable, if one is configured and not blank.
    pub fn executable(&self) -> Option<&str> {
        self.executable.as_deref().map(str::trim).filter(|exe| !exe.is_empty())
    }

    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> Self {
        if let Some(executable) = &overrides.executable {
            self.executable = Some(executable.clone());
        }
        if let Some(args) = &overrides.args {
            self.args = Some(args.clone());
        }
        if let Some(format_on_save) = overrides.format_on_save {
            self.format_on_save = format_on_save;
        }
        if let Some(timeout) = overrides.timeout {
            self.timeout = timeout;
        }
        self
    }
}

/// Values given on the command line, which win over the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub executable: Option<String>,
    pub args: Option<String>,
    pub format_on_save: Option<bool>,
    pub timeout: Option<u64>,
}

/// Errors that can occur when loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to read config file at {path}: {source}")]
    IoError { source: io::Error, path: String },

    /// Failed to parse the configuration content
    #[error("Failed to parse config: {0}")]
    ParseError(String),

    /// Configuration file already exists
    #[error("Configuration file already exists at {path}")]
    FileExists { path: String },
}

const DEFAULT_CONFIG: &str = r#"# tidybridge configuration file

# Path to the perltidy executable (required)
# executable = "/usr/local/bin/perltidy"

# Arguments passed to perltidy, separated by spaces.
# Keep -se so errors are reported on stderr instead of a .ERR file.
# args = "-se -pbp"

# Format Perl files before saving (editor integrations)
format-on-save = false

# Kill perltidy after this many milliseconds (0 = no limit)
timeout = 30000
"#;

/// Write a commented default configuration file to `path`.
pub fn create_default_config(path: &str) -> Result<(), ConfigError> {
    if Path::new(path).exists() {
        return Err(ConfigError::FileExists { path: path.to_string() });
    }

    fs::write(path, DEFAULT_CONFIG).map_err(|source| ConfigError::IoError {
        source,
        path: path.to_string(),
    })
}
