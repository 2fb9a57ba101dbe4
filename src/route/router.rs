// src/route/router.rs

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::classify::ModuleClassifier;
use crate::project::{Module, ProjectModel};
use crate::route::relevance::{is_build_output, is_relevant_path, resource_anchor, source_set_of};
use crate::types::{ChangeEvent, ResourceMatch};
use crate::watch::path_utils::slash_path;

/// Maps a filesystem change to the module and source set that own it.
#[derive(Debug, Clone)]
pub struct ChangeRouter {
    classifier: Arc<ModuleClassifier>,
}

impl ChangeRouter {
    pub fn new(classifier: Arc<ModuleClassifier>) -> Self {
        Self { classifier }
    }

    /// Step 1 only: should this event be looked at?
    pub fn is_relevant(&self, event: &ChangeEvent, extra_dirs: &[String]) -> bool {
        if !event.kind.is_content_change() {
            return false;
        }
        is_relevant_path(&slash_path(&event.path), extra_dirs)
    }

    /// Full routing: relevance, source set and owner.
    ///
    /// Relevant changes without an owner are logged and dropped.
    pub fn route(
        &self,
        event: &ChangeEvent,
        project: &ProjectModel,
        extra_dirs: &[String],
    ) -> Option<ResourceMatch> {
        if !event.kind.is_content_change() {
            return None;
        }

        let path = slash_path(&event.path);
        if is_build_output(&path) {
            return None;
        }
        let anchor = resource_anchor(&path, extra_dirs)?;
        let source_set = source_set_of(anchor);

        match self.resolve_owner(Path::new(anchor), &project.modules) {
            Some(owner) => {
                debug!(
                    path = %path,
                    module = %owner.id,
                    source_set = %source_set,
                    "routed resource change"
                );
                Some(ResourceMatch {
                    owner_module_id: owner.id.clone(),
                    source_set,
                })
            }
            None => {
                warn!(path = %path, "could not resolve an owning module for resource change");
                None
            }
        }
    }

    /// The most specific participating module whose base directory contains
    /// `anchor`.
    ///
    /// Modules sharing one base directory (per-source-set shadow modules)
    /// resolve to the one with the fewest separators in its id.
    pub fn resolve_owner<'m>(&self, anchor: &Path, modules: &'m [Module]) -> Option<&'m Module> {
        modules
            .iter()
            .filter(|m| anchor.starts_with(&m.base_dir))
            .filter(|m| self.classifier.classify(m))
            .min_by(|a, b| {
                let depth_a = a.base_dir.components().count();
                let depth_b = b.base_dir.components().count();
                depth_b
                    .cmp(&depth_a)
                    .then_with(|| a.separator_count().cmp(&b.separator_count()))
                    .then_with(|| a.id.cmp(&b.id))
            })
    }
}

/// Among participating modules, keep one per base directory: the outermost
/// (fewest separators). Used by the bulk "generate everything" action.
pub fn outermost_per_base_dir<'m>(
    classifier: &ModuleClassifier,
    modules: &'m [Module],
) -> Vec<&'m Module> {
    let mut chosen: Vec<&'m Module> = Vec::new();
    for module in modules.iter().filter(|m| classifier.classify(m)) {
        match chosen.iter_mut().find(|c| c.base_dir == module.base_dir) {
            Some(existing) => {
                let better = (module.separator_count(), &module.id)
                    < (existing.separator_count(), &existing.id);
                if better {
                    *existing = module;
                }
            }
            None => chosen.push(module),
        }
    }
    chosen
}
