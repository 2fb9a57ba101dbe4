// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and run validation.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Like [`load_and_validate`], but a missing file yields the defaults.
pub fn load_or_default(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();
    if !path.exists() {
        debug!(?path, "no config file; using defaults");
        return Ok(ConfigFile::default());
    }
    load_and_validate(path)
}

/// Resolve the config path given on the CLI against the project root.
pub fn resolve_config_path(project_root: &Path, config: &str) -> PathBuf {
    let path = PathBuf::from(config);
    if path.is_absolute() {
        path
    } else {
        project_root.join(path)
    }
}

/// Default config file name.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Reswatch.toml")
}
