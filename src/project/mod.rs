// src/project/mod.rs

//! Read-only view of the host Gradle project.
//!
//! - [`discovery`] finds modules from the settings script and config.
//! - [`metadata`] exposes optional build metadata (task graph, extensions)
//!   exported from the build.
//! - [`loader`] bundles both for startup and project sync.

pub mod discovery;
pub mod loader;
pub mod metadata;

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

pub use discovery::discover_modules;
pub use loader::ProjectLoader;
pub use metadata::{MetadataProvider, NoMetadata, SnapshotMetadata};

/// Separator between segments of a Gradle module path.
pub const PATH_SEPARATOR: char = ':';

/// One build module of the host project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    /// Hierarchical Gradle path (`":app"`, `":lib:commonMain"`), or `""` for
    /// the root project.
    pub id: String,
    pub base_dir: PathBuf,
    pub source_sets: Vec<String>,
}

impl Module {
    pub fn new(id: impl Into<String>, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            base_dir: base_dir.into(),
            source_sets: Vec::new(),
        }
    }

    pub fn with_source_sets<I, S>(mut self, source_sets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.source_sets = source_sets.into_iter().map(Into::into).collect();
        self
    }

    /// Number of hierarchy separators in the id. Lower means "outermost".
    pub fn separator_count(&self) -> usize {
        self.id.matches(PATH_SEPARATOR).count()
    }

    /// Id in the form used as a task prefix: `""` for the root project,
    /// otherwise the id without trailing separators.
    pub fn gradle_path(&self) -> String {
        normalize_gradle_path(&self.id)
    }

    pub fn is_root(&self) -> bool {
        self.gradle_path().is_empty()
    }

    /// Human readable name used in notices.
    pub fn display_name(&self) -> &str {
        if self.is_root() { "root" } else { &self.id }
    }
}

/// `":"` and blank ids denote the root project; anything else loses its
/// trailing separators.
pub fn normalize_gradle_path(id: &str) -> String {
    let trimmed = id.trim();
    if trimmed.is_empty() || trimmed == ":" {
        String::new()
    } else {
        trimmed.trim_end_matches(PATH_SEPARATOR).to_string()
    }
}

/// Snapshot of the modules of one project.
#[derive(Debug, Clone, Default)]
pub struct ProjectModel {
    pub root: PathBuf,
    pub modules: Vec<Module>,
}

impl ProjectModel {
    pub fn new(root: impl Into<PathBuf>, modules: Vec<Module>) -> Self {
        Self {
            root: root.into(),
            modules,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn module(&self, id: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.id == id)
    }
}

/// Shared, swappable handle to the current [`ProjectModel`].
///
/// Readers take a cheap `Arc` snapshot; a project sync swaps in a new model
/// without disturbing readers holding the old one.
#[derive(Debug, Clone, Default)]
pub struct SharedProject {
    inner: Arc<RwLock<Arc<ProjectModel>>>,
}

impl SharedProject {
    pub fn new(model: ProjectModel) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(model))),
        }
    }

    pub fn snapshot(&self) -> Arc<ProjectModel> {
        match self.inner.read() {
            Ok(g) => Arc::clone(&*g),
            Err(poisoned) => Arc::clone(&*poisoned.into_inner()),
        }
    }

    pub fn replace(&self, model: ProjectModel) {
        let mut guard = match self.inner.write() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = Arc::new(model);
    }
}
