// src/engine/service.rs

//! Per-project facade wiring router, debouncer and dispatcher together.
//!
//! The watcher pushes batches of [`ChangeEvent`]s into
//! [`ResourceService::on_events`]; hosts pull [`ResourceService::current_status`]
//! on demand.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::classify::ModuleClassifier;
use crate::config::SettingsStore;
use crate::engine::debounce::Debouncer;
use crate::engine::dispatch::Dispatcher;
use crate::engine::registry::RunRegistry;
use crate::engine::status::StatusSnapshot;
use crate::exec::BuildOrchestrator;
use crate::notifier::Notifier;
use crate::project::{MetadataProvider, ProjectModel, SharedProject};
use crate::route::{outermost_per_base_dir, ChangeRouter};
use crate::types::{ChangeEvent, DispatchKey, ResourceMatch, Status, DEFAULT_SOURCE_SET};
use crate::watch::path_utils::slash_path;

#[derive(Debug)]
pub struct ResourceService {
    settings: SettingsStore,
    project: SharedProject,
    classifier: Arc<ModuleClassifier>,
    router: ChangeRouter,
    debouncer: Debouncer,
    dispatcher: Arc<Dispatcher>,
    disposed: Arc<AtomicBool>,
}

impl ResourceService {
    pub fn new(
        settings: SettingsStore,
        model: ProjectModel,
        classifier: Arc<ModuleClassifier>,
        orchestrator: Arc<dyn BuildOrchestrator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let disposed = Arc::new(AtomicBool::new(false));
        let project = SharedProject::new(model);
        let dispatcher = Arc::new(Dispatcher::new(
            orchestrator,
            notifier,
            settings.clone(),
            project.clone(),
            Arc::clone(&disposed),
        ));

        // Timers must not keep the dispatcher alive past the service.
        let weak: Weak<Dispatcher> = Arc::downgrade(&dispatcher);
        let debouncer = Debouncer::new(Arc::clone(&disposed), move |key| {
            if let Some(dispatcher) = weak.upgrade() {
                dispatcher.dispatch(key);
            }
        });

        Self {
            settings,
            project,
            router: ChangeRouter::new(Arc::clone(&classifier)),
            classifier,
            debouncer,
            dispatcher,
            disposed,
        }
    }

    /// Route a batch of changes and schedule the matches. Returns the number
    /// of changes that were routed to a module.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn on_events(&self, events: &[ChangeEvent]) -> usize {
        if self.is_disposed() || events.is_empty() {
            return 0;
        }

        let settings = self.settings.current();
        if !settings.enabled {
            warn!(events = events.len(), "generation is disabled; ignoring changes");
            return 0;
        }

        let project = self.project.snapshot();
        let mut routed = 0;
        for event in events {
            if !self.router.is_relevant(event, &settings.extra_resource_dirs) {
                continue;
            }
            info!("[{}] {}", event.kind.label(), slash_path(&event.path));
            if let Some(matched) = self.router.route(event, &project, &settings.extra_resource_dirs) {
                self.on_match(matched);
                routed += 1;
            }
        }
        routed
    }

    /// Merge `matched` into its key's settle window.
    pub fn on_match(&self, matched: ResourceMatch) {
        if self.is_disposed() {
            return;
        }
        let window = Duration::from_millis(self.settings.current().debounce_ms);
        let key = matched.key();
        debug!(key = %key, window_ms = window.as_millis() as u64, "scheduling generation");
        self.debouncer.schedule(key, window);
    }

    /// Dispatch every participating module right away, one per base
    /// directory. Returns the number of accepted dispatches.
    pub fn run_for_all_modules(&self) -> usize {
        if self.is_disposed() {
            return 0;
        }
        let project = self.project.snapshot();
        let owners = outermost_per_base_dir(&self.classifier, &project.modules);
        if owners.is_empty() {
            warn!("no module uses Compose resources; nothing to generate");
            return 0;
        }

        let mut accepted = 0;
        for module in owners {
            let key = DispatchKey::new(module.id.clone(), DEFAULT_SOURCE_SET);
            if self.dispatcher.dispatch(key) {
                accepted += 1;
            }
        }
        accepted
    }

    pub fn invalidate_cache(&self) {
        self.classifier.invalidate_cache();
    }

    /// Swap in a freshly discovered project and drop every cached
    /// classification.
    pub fn sync_project(&self, model: ProjectModel, metadata: Arc<dyn MetadataProvider>) {
        if self.is_disposed() {
            return;
        }
        info!(modules = model.modules.len(), "project synced");
        self.project.replace(model);
        self.classifier.set_metadata(metadata);
        self.classifier.invalidate_cache();
    }

    pub fn has_participating_module(&self) -> bool {
        self.classifier
            .has_participating_module(&self.project.snapshot().modules)
    }

    pub fn current_status(&self) -> Status {
        self.dispatcher.current_status()
    }

    pub fn status_snapshot(&self) -> StatusSnapshot {
        self.dispatcher.status_snapshot()
    }

    pub fn clear_error(&self) {
        self.dispatcher.clear_error();
    }

    pub fn is_enabled(&self) -> bool {
        self.settings.enabled()
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn project(&self) -> Arc<ProjectModel> {
        self.project.snapshot()
    }

    pub fn classifier(&self) -> &Arc<ModuleClassifier> {
        &self.classifier
    }

    pub fn registry(&self) -> &RunRegistry {
        self.dispatcher.registry()
    }

    pub fn debouncer(&self) -> &Debouncer {
        &self.debouncer
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// Resolve once no build is in flight.
    pub async fn wait_idle(&self) {
        self.dispatcher.wait_idle().await;
    }

    /// Stop accepting work. Pending timers are cancelled and late build
    /// completions are ignored.
    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        self.debouncer.cancel_all();
        self.dispatcher.dispose();
        info!("resource service disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }
}

impl Drop for ResourceService {
    fn drop(&mut self) {
        self.debouncer.cancel_all();
    }
}
