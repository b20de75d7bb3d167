use super::{Config, ConfigError};
use std::path::{Path, PathBuf};

/// Config file names, in order of precedence within one directory.
pub const CONFIG_FILES: &[&str] = &[".tidybridge.toml", "tidybridge.toml"];

const MAX_DEPTH: usize = 100;

/// A configuration together with the file it came from, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedConfig {
    pub config: Config,
    pub path: Option<PathBuf>,
}

/// Parse a single config file.
pub fn load_config_file(path: &Path) -> Result<Config, ConfigError> {
    let display_path = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::IoError {
        source,
        path: display_path.clone(),
    })?;
    toml::from_str(&content).map_err(|e| ConfigError::ParseError(format!("{display_path}: {e}")))
}

/// Find the nearest config file from `start_dir` upward.
///
/// The search stops at the first directory holding `.git`, after checking it.
pub fn discover_config_upward(start_dir: &Path) -> Option<PathBuf> {
    let mut current_dir = start_dir.to_path_buf();

    for _ in 0..MAX_DEPTH {
        log::debug!("[tidybridge-config] Searching for config in: {}", current_dir.display());

        if let Some(found) = CONFIG_FILES
            .iter()
            .map(|name| current_dir.join(name))
            .find(|candidate| candidate.is_file())
        {
            log::debug!("[tidybridge-config] Found config file: {}", found.display());
            return Some(found);
        }

        if current_dir.join(".git").exists() {
            log::debug!("[tidybridge-config] Stopping at .git directory");
            return None;
        }

        match current_dir.parent() {
            Some(parent) => current_dir = parent.to_path_buf(),
            None => return None,
        }
    }

    log::debug!("[tidybridge-config] Maximum traversal depth reached");
    None
}

/// Load the explicit file if given, otherwise the discovered one, otherwise defaults.
pub fn load_config(explicit: Option<&Path>, start_dir: &Path) -> Result<LoadedConfig, ConfigError> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => discover_config_upward(start_dir),
    };

    match path {
        Some(path) => Ok(LoadedConfig {
            config: load_config_file(&path)?,
            path: Some(path),
        }),
        None => Ok(LoadedConfig {
            config: Config::default(),
            path: None,
        }),
    }
}
