// src/engine/registry.rs

use dashmap::DashSet;

use crate::types::DispatchKey;

/// Set of keys whose build task is currently in flight.
///
/// `try_run` is an atomic insert-if-absent, so at most one build per key can
/// be in flight. Every accepted key must be handed back with `release` once
/// its build completes, whatever the outcome.
#[derive(Debug, Default)]
pub struct RunRegistry {
    running: DashSet<DispatchKey>,
}

impl RunRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `key`. Returns `false` if a build for it is already running.
    pub fn try_run(&self, key: &DispatchKey) -> bool {
        self.running.insert(key.clone())
    }

    /// Returns `true` if `key` was registered.
    pub fn release(&self, key: &DispatchKey) -> bool {
        self.running.remove(key).is_some()
    }

    pub fn contains(&self, key: &DispatchKey) -> bool {
        self.running.contains(key)
    }

    pub fn is_empty(&self) -> bool {
        self.running.is_empty()
    }

    pub fn len(&self) -> usize {
        self.running.len()
    }

    /// Sorted snapshot, for logs.
    pub fn keys(&self) -> Vec<DispatchKey> {
        let mut keys: Vec<DispatchKey> = self.running.iter().map(|k| k.clone()).collect();
        keys.sort();
        keys
    }

    pub fn clear(&self) {
        self.running.clear();
    }
}
