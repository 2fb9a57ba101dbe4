// src/project/loader.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use crate::config::{ModuleDecl, ProjectSection};
use crate::fs::FileSystem;
use crate::project::discovery::discover_modules;
use crate::project::metadata::{MetadataProvider, NoMetadata, SnapshotMetadata};
use crate::project::ProjectModel;

/// Reloads the project model and build metadata from disk.
#[derive(Debug, Clone)]
pub struct ProjectLoader {
    fs: Arc<dyn FileSystem>,
    root: PathBuf,
    explicit: Vec<ModuleDecl>,
    metadata_path: Option<PathBuf>,
}

impl ProjectLoader {
    pub fn new(fs: Arc<dyn FileSystem>, root: impl Into<PathBuf>, section: &ProjectSection) -> Self {
        let root = root.into();
        let metadata_path = section.metadata.as_ref().map(|p| root.join(p));
        Self {
            fs,
            root,
            explicit: section.modules.clone(),
            metadata_path,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn metadata_path(&self) -> Option<&Path> {
        self.metadata_path.as_deref()
    }

    pub fn load_model(&self) -> ProjectModel {
        let modules = discover_modules(self.fs.as_ref(), &self.root, &self.explicit);
        info!(root = ?self.root, modules = modules.len(), "project modules discovered");
        ProjectModel::new(self.root.clone(), modules)
    }

    /// Snapshot metadata if configured and loadable, otherwise none.
    pub fn load_metadata(&self) -> Arc<dyn MetadataProvider> {
        let Some(ref path) = self.metadata_path else {
            return Arc::new(NoMetadata);
        };
        if !self.fs.exists(path) {
            info!(?path, "metadata snapshot not present yet");
            return Arc::new(NoMetadata);
        }
        match SnapshotMetadata::load(self.fs.as_ref(), path) {
            Ok(snapshot) => Arc::new(snapshot),
            Err(err) => {
                warn!(?path, error = %err, "failed to load metadata snapshot; ignoring it");
                Arc::new(NoMetadata)
            }
        }
    }
}
