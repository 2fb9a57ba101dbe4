// src/config/settings.rs

//! Live settings handle.
//!
//! Settings are read-mostly: every decision point takes a fresh snapshot via
//! [`SettingsStore::current`], and a reload only affects decisions made after
//! it.

use std::sync::{Arc, RwLock};

use tracing::{info, warn};

use crate::config::model::Settings;

#[derive(Debug, Clone, Default)]
pub struct SettingsStore {
    inner: Arc<RwLock<Settings>>,
}

impl SettingsStore {
    pub fn new(settings: Settings) -> Self {
        Self {
            inner: Arc::new(RwLock::new(settings)),
        }
    }

    /// Snapshot of the current settings.
    pub fn current(&self) -> Settings {
        match self.inner.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn enabled(&self) -> bool {
        self.current().enabled
    }

    /// Replace the settings. Pending debounce timers keep their old window.
    pub fn replace(&self, settings: Settings) {
        let mut guard = match self.inner.write() {
            Ok(g) => g,
            Err(poisoned) => {
                warn!("settings lock poisoned; overwriting");
                poisoned.into_inner()
            }
        };
        if *guard != settings {
            info!(
                enabled = settings.enabled,
                debounce_ms = settings.debounce_ms,
                extra_resource_dirs = ?settings.extra_resource_dirs,
                "settings reloaded"
            );
        }
        *guard = settings;
    }

    /// Apply an in-place edit (e.g. toggling `enabled`).
    pub fn update(&self, edit: impl FnOnce(&mut Settings)) {
        let mut next = self.current();
        edit(&mut next);
        self.replace(next);
    }
}
