//! Configuration file discovery and layered value resolution
//!
//! Every setting follows the same priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Directory name used under the platform config/data directories
pub const APP_DIR_NAME: &str = "tftc";

/// Where a resolved value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    CommandLine,
    Environment,
    TomlFile,
    Default,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConfigSource::CommandLine => "command line",
            ConfigSource::Environment => "environment",
            ConfigSource::TomlFile => "TOML config",
            ConfigSource::Default => "default",
        };
        f.write_str(name)
    }
}

/// Non-empty, non-whitespace check applied to every string source
pub fn is_present(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Resolve a string setting from CLI → ENV → TOML
///
/// Blank values are skipped, so an empty `RGAPIKEY=` does not shadow the TOML
/// file. Returns `None` when no source supplies a usable value.
pub fn resolve_string(
    cli_arg: Option<&str>,
    env_var_name: &str,
    toml_value: Option<&str>,
) -> Option<(String, ConfigSource)> {
    if let Some(value) = cli_arg.filter(|v| is_present(v)) {
        return Some((value.trim().to_string(), ConfigSource::CommandLine));
    }

    if let Ok(value) = std::env::var(env_var_name) {
        if is_present(&value) {
            return Some((value.trim().to_string(), ConfigSource::Environment));
        }
    }

    if let Some(value) = toml_value.filter(|v| is_present(v)) {
        return Some((value.trim().to_string(), ConfigSource::TomlFile));
    }

    None
}

/// Resolve the config file location
///
/// CLI path and environment path are returned even when the file does not
/// exist, so that `load_toml_config` can warn about it. The platform default
/// (`~/.config/tftc/config.toml` on Linux) is only returned if present.
pub fn resolve_config_path(cli_arg: Option<&Path>, env_var_name: &str) -> Option<PathBuf> {
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(env_var_name) {
        if is_present(&path) {
            return Some(PathBuf::from(path));
        }
    }

    default_config_file().filter(|path| path.exists())
}

/// Platform config file path (may not exist)
pub fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join("config.toml"))
}

/// Load a TOML config file into `T`
///
/// A missing file is not an error: a warning is logged and `T::default()` is
/// returned. A file that exists but does not parse is a configuration error.
pub fn load_toml_config<T>(path: Option<&Path>) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    let Some(path) = path else {
        debug!("No config file found, using compiled defaults");
        return Ok(T::default());
    };

    if !path.exists() {
        warn!("Config file {} not found, using compiled defaults", path.display());
        return Ok(T::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;

    let config = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;

    info!("Loaded config file {}", path.display());
    Ok(config)
}

/// Resolve the SQLite database path: CLI → ENV → TOML → default data folder
pub fn resolve_database_path(
    cli_arg: Option<&Path>,
    env_var_name: &str,
    toml_value: Option<&Path>,
) -> (PathBuf, ConfigSource) {
    if let Some(path) = cli_arg {
        return (path.to_path_buf(), ConfigSource::CommandLine);
    }

    if let Ok(path) = std::env::var(env_var_name) {
        if is_present(&path) {
            return (PathBuf::from(path), ConfigSource::Environment);
        }
    }

    if let Some(path) = toml_value {
        return (path.to_path_buf(), ConfigSource::TomlFile);
    }

    (
        get_default_data_folder().join("tftc.db"),
        ConfigSource::Default,
    )
}

/// Get OS-dependent default data folder
pub fn get_default_data_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/tftc (or /var/lib/tftc for system-wide)
        dirs::data_local_dir()
            .map(|d| d.join(APP_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from("/var/lib/tftc"))
    } else if cfg!(target_os = "macos") {
        // ~/Library/Application Support/tftc
        dirs::data_dir()
            .map(|d| d.join(APP_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/tftc"))
    } else if cfg!(target_os = "windows") {
        // %LOCALAPPDATA%\tftc
        dirs::data_local_dir()
            .map(|d| d.join(APP_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\tftc"))
    } else {
        PathBuf::from("./tftc_data")
    }
}
