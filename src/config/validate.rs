// src/config/validate.rs

use std::collections::HashSet;

use globset::Glob;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, ReswatchError};

/// Upper bound for the settle window.
pub const MAX_DEBOUNCE_MS: u64 = 600_000;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::ReswatchError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.settings, raw.project, raw.gradle))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_settings(cfg)?;
    validate_modules(cfg)?;
    validate_ignore_globs(cfg)?;
    validate_gradle(cfg)?;
    Ok(())
}

fn validate_settings(cfg: &RawConfigFile) -> Result<()> {
    if cfg.settings.debounce_ms > MAX_DEBOUNCE_MS {
        return Err(ReswatchError::ConfigError(format!(
            "[settings].debounce_ms must be <= {MAX_DEBOUNCE_MS} (got {})",
            cfg.settings.debounce_ms
        )));
    }

    for name in cfg.settings.extra_resource_dirs.iter() {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ReswatchError::ConfigError(
                "[settings].extra_resource_dirs must not contain empty names".to_string(),
            ));
        }
        if trimmed.contains('/') || trimmed.contains('\\') {
            return Err(ReswatchError::ConfigError(format!(
                "[settings].extra_resource_dirs entry '{name}' must be a single directory name"
            )));
        }
    }

    Ok(())
}

fn validate_modules(cfg: &RawConfigFile) -> Result<()> {
    let mut seen = HashSet::new();
    for decl in cfg.project.modules.iter() {
        if !seen.insert(decl.id.as_str()) {
            return Err(ReswatchError::ConfigError(format!(
                "module '{}' is declared more than once in [[project.module]]",
                decl.id
            )));
        }
        if decl.dir.is_absolute() {
            return Err(ReswatchError::ConfigError(format!(
                "module '{}' dir must be relative to the project root",
                decl.id
            )));
        }
    }
    Ok(())
}

fn validate_ignore_globs(cfg: &RawConfigFile) -> Result<()> {
    for pattern in cfg.project.ignore.iter() {
        Glob::new(pattern).map_err(|e| {
            ReswatchError::ConfigError(format!(
                "[project].ignore pattern '{pattern}' is invalid: {e}"
            ))
        })?;
    }
    Ok(())
}

fn validate_gradle(cfg: &RawConfigFile) -> Result<()> {
    if let Some(ref command) = cfg.gradle.command {
        if command.trim().is_empty() {
            return Err(ReswatchError::ConfigError(
                "[gradle].command must not be empty".to_string(),
            ));
        }
    }
    Ok(())
}
