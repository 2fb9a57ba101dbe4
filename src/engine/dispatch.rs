// src/engine/dispatch.rs

//! Dispatch of generator tasks.
//!
//! A dispatch claims its key in the [`RunRegistry`], submits the Gradle task
//! through the [`BuildOrchestrator`], and hands the key back from a single
//! completion handler that also updates the [`StatusTracker`].

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use dashmap::DashSet;
use tokio::sync::Notify;
use tracing::{debug, error, info, warn};

use crate::classify::signals::GENERATOR_TASK_PREFIX;
use crate::config::SettingsStore;
use crate::engine::registry::RunRegistry;
use crate::engine::status::{StatusSnapshot, StatusTracker};
use crate::errors::ReswatchError;
use crate::exec::{BuildOrchestrator, BuildOutcome, BuildRequest};
use crate::notifier::{NoticeLevel, Notifier};
use crate::project::{normalize_gradle_path, SharedProject};
use crate::types::{DispatchKey, Status, TriggeredWhileRunning};

/// Where the resources plugin writes generated accessors, relative to the
/// module directory.
pub const GENERATED_OUTPUT_DIR: &str = "build/generated/compose/resourceGenerator";

/// `"commonMain"` → `"CommonMain"`.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Fully-qualified generator task for a key, e.g.
/// `:app:generateResourceAccessorsForCommonMain`. The root module's task is
/// unqualified.
pub fn generator_task_name(key: &DispatchKey) -> String {
    let task = format!("{GENERATOR_TASK_PREFIX}{}", capitalize_first(&key.source_set));
    let module = normalize_gradle_path(&key.module_id);
    if module.is_empty() {
        task
    } else {
        format!("{module}:{task}")
    }
}

pub struct Dispatcher {
    registry: RunRegistry,
    status: StatusTracker,
    /// Serializes registry release + status transitions.
    transitions: Mutex<()>,
    rerun_pending: DashSet<DispatchKey>,
    orchestrator: Arc<dyn BuildOrchestrator>,
    notifier: Arc<dyn Notifier>,
    settings: SettingsStore,
    project: SharedProject,
    disposed: Arc<AtomicBool>,
    idle: Notify,
    submitted: AtomicU64,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("running", &self.registry.keys())
            .field("status", &self.status.current())
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    pub fn new(
        orchestrator: Arc<dyn BuildOrchestrator>,
        notifier: Arc<dyn Notifier>,
        settings: SettingsStore,
        project: SharedProject,
        disposed: Arc<AtomicBool>,
    ) -> Self {
        Self {
            registry: RunRegistry::new(),
            status: StatusTracker::new(),
            transitions: Mutex::new(()),
            rerun_pending: DashSet::new(),
            orchestrator,
            notifier,
            settings,
            project,
            disposed,
            idle: Notify::new(),
            submitted: AtomicU64::new(0),
        }
    }

    pub fn registry(&self) -> &RunRegistry {
        &self.registry
    }

    pub fn current_status(&self) -> Status {
        self.status.current()
    }

    pub fn status_snapshot(&self) -> StatusSnapshot {
        self.status.snapshot()
    }

    /// Number of builds handed to the orchestrator so far.
    pub fn submitted_count(&self) -> u64 {
        self.submitted.load(Ordering::Relaxed)
    }

    pub fn clear_error(&self) {
        let _guard = self.lock_transitions();
        self.status.clear_error(self.registry.is_empty());
    }

    /// Try to start the generator task for `key`.
    ///
    /// Returns `true` if a build was submitted. A key that is already running
    /// is dropped, or remembered for one re-run in `queue` mode.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn dispatch(self: &Arc<Self>, key: DispatchKey) -> bool {
        if self.is_disposed() {
            return false;
        }

        let working_dir = self.project.snapshot().root.clone();
        if working_dir.as_os_str().is_empty() {
            let err = ReswatchError::MissingWorkingDirectory(working_dir);
            error!(key = %key, error = %err, "cannot run Gradle task");
            self.notifier
                .notify(NoticeLevel::Error, "Project root unknown; cannot run Gradle task");
            return false;
        }

        if !self.registry.try_run(&key) {
            match self.settings.current().triggered_while_running {
                TriggeredWhileRunning::Drop => {
                    info!(key = %key, "generation already running; skipping");
                }
                TriggeredWhileRunning::Queue => return self.queue_rerun(key),
            }
            return false;
        }

        {
            let _guard = self.lock_transitions();
            self.status.mark_running();
        }
        self.launch(key, working_dir);
        true
    }

    fn launch(self: &Arc<Self>, key: DispatchKey, working_dir: PathBuf) {
        let task_name = generator_task_name(&key);
        info!(key = %key, task = %task_name, "running Gradle task");
        self.submit(key, task_name, working_dir);
    }

    /// Remember one re-run for a running key. If its build finished since
    /// `try_run` rejected us, nobody would pick the flag up, so dispatch now.
    fn queue_rerun(self: &Arc<Self>, key: DispatchKey) -> bool {
        {
            let _guard = self.lock_transitions();
            if self.registry.contains(&key) {
                info!(key = %key, "generation already running; queued one re-run");
                self.rerun_pending.insert(key);
                return false;
            }
        }
        debug!(key = %key, "running build finished meanwhile; dispatching directly");
        self.dispatch(key)
    }

    fn submit(self: &Arc<Self>, key: DispatchKey, task_name: String, working_dir: PathBuf) {
        let request = BuildRequest {
            task_name: task_name.clone(),
            working_dir,
        };
        let orchestrator = Arc::clone(&self.orchestrator);
        let submitted = catch_unwind(AssertUnwindSafe(|| orchestrator.submit(request)));
        self.submitted.fetch_add(1, Ordering::Relaxed);

        let this = Arc::clone(self);
        tokio::spawn(async move {
            let outcome = match submitted {
                Ok(build) => match tokio::spawn(build).await {
                    Ok(outcome) => outcome,
                    Err(join_err) => BuildOutcome::Failed(format!("build task aborted: {join_err}")),
                },
                Err(_) => BuildOutcome::Failed("build submission panicked".to_string()),
            };
            this.complete(key, &task_name, outcome);
        });
    }

    /// The one place a key leaves the registry after an accepted dispatch.
    fn complete(self: &Arc<Self>, key: DispatchKey, task_name: &str, outcome: BuildOutcome) {
        if self.is_disposed() {
            debug!(key = %key, task = %task_name, "build finished after dispose; ignoring");
            return;
        }

        let show_notifications = self.settings.current().show_notifications;

        // A queued re-run reclaims the key before the lock is dropped, so the
        // registry never looks idle in between.
        let rerun_dir = {
            let _guard = self.lock_transitions();
            self.registry.release(&key);
            let rerun_dir = if self.rerun_pending.remove(&key).is_some() {
                let root = self.project.snapshot().root.clone();
                (!root.as_os_str().is_empty() && self.registry.try_run(&key)).then_some(root)
            } else {
                None
            };
            match outcome {
                BuildOutcome::Success => self.status.mark_succeeded(self.registry.is_empty()),
                BuildOutcome::Failed(ref reason) => self.status.mark_failed(reason),
            }
            if rerun_dir.is_some() {
                self.status.mark_running();
            }
            rerun_dir
        };

        match outcome {
            BuildOutcome::Success => {
                info!(key = %key, task = %task_name, "Gradle task finished");
                if show_notifications {
                    let module = match normalize_gradle_path(&key.module_id) {
                        path if path.is_empty() => "root".to_string(),
                        path => path,
                    };
                    self.notifier.notify(
                        NoticeLevel::Info,
                        &format!("Resource accessors generated for {module}"),
                    );
                }
                self.refresh_generated_output(&key);
            }
            BuildOutcome::Failed(ref reason) => {
                error!(key = %key, task = %task_name, reason = %reason, "Gradle task failed");
                if show_notifications {
                    self.notifier.notify(
                        NoticeLevel::Error,
                        &format!("Failed to run Gradle task: {reason}"),
                    );
                }
            }
        }

        if let Some(working_dir) = rerun_dir {
            info!(key = %key, "starting queued re-run");
            self.launch(key, working_dir);
        }

        self.wake_if_idle();
    }

    /// Point downstream tooling at freshly generated sources.
    fn refresh_generated_output(&self, key: &DispatchKey) {
        let project = self.project.snapshot();
        let Some(module) = project.module(&key.module_id) else {
            return;
        };
        let generated = module.base_dir.join(GENERATED_OUTPUT_DIR);
        if generated.is_dir() {
            debug!(key = %key, dir = ?generated, "generated output refreshed");
        } else {
            warn!(key = %key, dir = ?generated, "task succeeded but generated output directory is missing");
        }
    }

    /// Resolve once nothing is in flight.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.idle.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            let idle = {
                let _guard = self.lock_transitions();
                self.registry.is_empty() || self.is_disposed()
            };
            if idle {
                return;
            }
            notified.await;
        }
    }

    /// Forget in-flight work. Completions arriving later are ignored.
    pub fn dispose(&self) {
        self.disposed.store(true, Ordering::Release);
        self.registry.clear();
        self.rerun_pending.clear();
        self.idle.notify_waiters();
    }

    fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    fn wake_if_idle(&self) {
        if self.registry.is_empty() {
            self.idle.notify_waiters();
        }
    }

    fn lock_transitions(&self) -> MutexGuard<'_, ()> {
        self.transitions.lock().unwrap_or_else(|e| e.into_inner())
    }
}
