// src/exec/backend.rs

//! Pluggable build orchestrator abstraction.
//!
//! The dispatcher talks to a `BuildOrchestrator` instead of spawning Gradle
//! directly. This makes it easy to swap in a fake orchestrator in tests while
//! keeping the production implementation in [`super::gradle`].

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

/// What to run and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    pub task_name: String,
    pub working_dir: PathBuf,
}

/// How a submitted build ended. The failure reason is free text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    Success,
    Failed(String),
}

impl BuildOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, BuildOutcome::Success)
    }
}

/// Completion of a submitted build.
pub type BuildFuture = Pin<Box<dyn Future<Output = BuildOutcome> + Send + 'static>>;

/// Runs external build tasks.
///
/// `submit` must return promptly; the actual work happens when the returned
/// future is polled, which the dispatcher does on a background task.
pub trait BuildOrchestrator: Send + Sync {
    fn submit(&self, request: BuildRequest) -> BuildFuture;
}
