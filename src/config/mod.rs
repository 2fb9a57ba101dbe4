// src/config/mod.rs

//! Configuration loading and validation for reswatch.
//!
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate the raw model (`validate.rs`).
//! - Share live settings between the watcher and the scheduler (`settings.rs`).

pub mod loader;
pub mod model;
pub mod settings;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, load_or_default, resolve_config_path};
pub use model::{
    ConfigFile, GradleSection, ModuleDecl, ProjectSection, RawConfigFile, Settings,
    DEFAULT_DEBOUNCE_MS,
};
pub use settings::SettingsStore;
