//! Configuration loading and root folder resolution

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default HTTP port for the API service
pub const DEFAULT_PORT: u16 = 5730;

/// Optional values read from the TOML config file
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub root_folder: Option<String>,
    pub port: Option<u16>,
    pub bind_host: Option<String>,
}

impl FileConfig {
    /// Load `~/.config/launchkit/config.toml` if present.
    ///
    /// A missing file is not an error (all values have fallbacks);
    /// a file that exists but fails to parse is.
    pub fn load() -> Result<FileConfig> {
        let path = match config_file_path() {
            Some(p) if p.exists() => p,
            _ => return Ok(FileConfig::default()),
        };

        let content = std::fs::read_to_string(&path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }
}

fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("launchkit").join("config.toml"))
}

/// Resolve the root data folder in priority order:
/// 1. Command-line argument
/// 2. `LAUNCHKIT_ROOT` environment variable
/// 3. `root_folder` key in the config file
/// 4. OS data directory fallback
pub fn resolve_root_folder(cli_arg: Option<&str>, file: &FileConfig) -> PathBuf {
    if let Some(path) = cli_arg {
        return PathBuf::from(path);
    }

    if let Ok(path) = std::env::var("LAUNCHKIT_ROOT") {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = &file.root_folder {
        return PathBuf::from(path);
    }

    dirs::data_local_dir()
        .map(|d| d.join("launchkit"))
        .unwrap_or_else(|| PathBuf::from("./launchkit_data"))
}

/// Resolve the listen port: CLI > `LAUNCHKIT_PORT` > config file > default
pub fn resolve_port(cli_arg: Option<u16>, file: &FileConfig) -> u16 {
    if let Some(port) = cli_arg {
        return port;
    }

    if let Ok(val) = std::env::var("LAUNCHKIT_PORT") {
        if let Ok(port) = val.parse() {
            return port;
        }
    }

    file.port.unwrap_or(DEFAULT_PORT)
}

/// Resolve the bind host: config file > localhost default
pub fn resolve_bind_host(file: &FileConfig) -> String {
    file.bind_host
        .clone()
        .unwrap_or_else(|| "127.0.0.1".to_string())
}

/// Database file path inside the root folder
pub fn database_path(root_folder: &Path) -> PathBuf {
    root_folder.join("launchkit.db")
}

/// Create the root folder if it does not exist yet
pub fn ensure_root_folder(root_folder: &Path) -> Result<()> {
    if !root_folder.exists() {
        std::fs::create_dir_all(root_folder)?;
    }
    Ok(())
}
