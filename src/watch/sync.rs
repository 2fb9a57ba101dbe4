// src/watch/sync.rs

//! Project sync triggers.
//!
//! Some changes are not resource edits but alter what the service knows
//! about the project: the config file, settings and build scripts, and the
//! exported metadata snapshot.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::classify::signals::BUILD_SCRIPTS;
use crate::config::{load_or_default, SettingsStore};
use crate::engine::ResourceService;
use crate::project::discovery::SETTINGS_SCRIPTS;
use crate::project::ProjectLoader;
use crate::route::is_build_output;
use crate::watch::path_utils::slash_path;

/// What a single changed path asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    None,
    ReloadSettings,
    SyncProject,
}

/// Everything needed to react to non-resource changes.
#[derive(Debug, Clone)]
pub struct SyncHooks {
    pub loader: ProjectLoader,
    pub config_path: PathBuf,
    pub settings: SettingsStore,
}

impl SyncHooks {
    pub fn action_for(&self, path: &Path) -> SyncAction {
        if path == self.config_path {
            return SyncAction::ReloadSettings;
        }
        if self.loader.metadata_path() == Some(path) {
            return SyncAction::SyncProject;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return SyncAction::None;
        };
        if SETTINGS_SCRIPTS.contains(&name) && path.parent() == Some(self.loader.root()) {
            return SyncAction::SyncProject;
        }
        if BUILD_SCRIPTS.contains(&name) && !is_build_output(&slash_path(path)) {
            return SyncAction::SyncProject;
        }
        SyncAction::None
    }

    /// Re-read `[settings]`. A broken file keeps the previous settings.
    pub fn reload_settings(&self) {
        match load_or_default(&self.config_path) {
            Ok(cfg) => self.settings.replace(cfg.settings),
            Err(err) => {
                warn!(path = ?self.config_path, error = %err, "config reload failed; keeping previous settings");
            }
        }
    }

    /// Rediscover modules, reload metadata and drop cached classifications.
    pub fn sync_project(&self, service: &ResourceService) {
        info!(root = ?self.loader.root(), "build files changed; syncing project");
        let model = self.loader.load_model();
        let metadata = self.loader.load_metadata();
        service.sync_project(model, metadata);
        if !service.has_participating_module() {
            warn!("no module uses Compose resources after sync");
        }
    }
}
