// src/project/metadata.rs

//! Build metadata exported from the host build.
//!
//! The snapshot format is a small TOML document, usually written by a Gradle
//! init script after sync:
//!
//! ```toml
//! [module.":app"]
//! tasks = ["generateResourceAccessorsForCommonMain", "assemble"]
//! extensions = ["org.jetbrains.compose.resources.ResourcesExtension"]
//! ```

use std::collections::HashMap;
use std::fmt::Debug;
use std::path::Path;

use serde::Deserialize;

use crate::errors::Result;
use crate::fs::FileSystem;
use crate::project::{normalize_gradle_path, Module};

/// Source of evaluated build-system facts about a module.
///
/// `None` means "not available for this module", which callers treat as an
/// inconclusive signal rather than a negative one.
pub trait MetadataProvider: Send + Sync + Debug {
    /// Names of the tasks registered for the module.
    fn tasks(&self, module: &Module) -> Option<Vec<String>>;

    /// Fully-qualified types (or names) of the extensions registered on the
    /// module.
    fn extensions(&self, module: &Module) -> Option<Vec<String>>;
}

/// Provider used when no snapshot exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMetadata;

impl MetadataProvider for NoMetadata {
    fn tasks(&self, _module: &Module) -> Option<Vec<String>> {
        None
    }

    fn extensions(&self, _module: &Module) -> Option<Vec<String>> {
        None
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RawSnapshot {
    #[serde(default)]
    module: HashMap<String, ModuleMetadata>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModuleMetadata {
    #[serde(default)]
    pub tasks: Option<Vec<String>>,
    #[serde(default)]
    pub extensions: Option<Vec<String>>,
}

/// Metadata loaded from a TOML snapshot. Keys are normalized Gradle paths.
#[derive(Debug, Clone, Default)]
pub struct SnapshotMetadata {
    modules: HashMap<String, ModuleMetadata>,
}

impl SnapshotMetadata {
    pub fn from_toml(contents: &str) -> Result<Self> {
        let raw: RawSnapshot = toml::from_str(contents)?;
        let modules = raw
            .module
            .into_iter()
            .map(|(id, meta)| (normalize_gradle_path(&id), meta))
            .collect();
        Ok(Self { modules })
    }

    pub fn load(fs: &dyn FileSystem, path: &Path) -> Result<Self> {
        let contents = fs.read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn insert(&mut self, module_id: &str, metadata: ModuleMetadata) {
        self.modules.insert(normalize_gradle_path(module_id), metadata);
    }

    fn lookup(&self, module: &Module) -> Option<&ModuleMetadata> {
        self.modules.get(&module.gradle_path())
    }
}

impl MetadataProvider for SnapshotMetadata {
    fn tasks(&self, module: &Module) -> Option<Vec<String>> {
        self.lookup(module).and_then(|m| m.tasks.clone())
    }

    fn extensions(&self, module: &Module) -> Option<Vec<String>> {
        self.lookup(module).and_then(|m| m.extensions.clone())
    }
}
