use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::Semaphore;
use tracing::debug;

use reswatch::exec::{BuildFuture, BuildOrchestrator, BuildOutcome, BuildRequest};
use reswatch::notifier::{NoticeLevel, Notifier};

/// What a fake build does once it is allowed to finish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FakeResult {
    Succeed,
    Fail(String),
    Panic,
}

#[derive(Debug, Default)]
struct Inner {
    requests: Mutex<Vec<BuildRequest>>,
    per_task: Mutex<HashMap<String, FakeResult>>,
    default: Mutex<Option<FakeResult>>,
}

/// A fake orchestrator that:
/// - records every submitted request
/// - resolves each build with a configurable result
/// - optionally holds builds until the test releases them
#[derive(Debug, Clone, Default)]
pub struct FakeOrchestrator {
    inner: Arc<Inner>,
    gate: Option<Arc<Semaphore>>,
}

impl FakeOrchestrator {
    /// Every build succeeds immediately.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds wait for [`FakeOrchestrator::release`] before completing.
    pub fn gated() -> Self {
        Self {
            inner: Arc::default(),
            gate: Some(Arc::new(Semaphore::new(0))),
        }
    }

    /// Result for builds of tasks without a per-task override.
    pub fn default_result(self, result: FakeResult) -> Self {
        *self.inner.default.lock().unwrap() = Some(result);
        self
    }

    pub fn set_result(&self, task_name: &str, result: FakeResult) {
        self.inner
            .per_task
            .lock()
            .unwrap()
            .insert(task_name.to_string(), result);
    }

    pub fn set_default_result(&self, result: FakeResult) {
        *self.inner.default.lock().unwrap() = Some(result);
    }

    /// Let `n` held builds complete.
    pub fn release(&self, n: usize) {
        if let Some(ref gate) = self.gate {
            gate.add_permits(n);
        }
    }

    pub fn requests(&self) -> Vec<BuildRequest> {
        self.inner.requests.lock().unwrap().clone()
    }

    pub fn task_names(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.task_name).collect()
    }

    pub fn submitted(&self) -> usize {
        self.inner.requests.lock().unwrap().len()
    }

    fn result_for(&self, task_name: &str) -> FakeResult {
        if let Some(result) = self.inner.per_task.lock().unwrap().get(task_name) {
            return result.clone();
        }
        self.inner
            .default
            .lock()
            .unwrap()
            .clone()
            .unwrap_or(FakeResult::Succeed)
    }
}

impl BuildOrchestrator for FakeOrchestrator {
    fn submit(&self, request: BuildRequest) -> BuildFuture {
        let result = self.result_for(&request.task_name);
        debug!(task = %request.task_name, ?result, gated = self.gate.is_some(), "fake build submitted");
        self.inner.requests.lock().unwrap().push(request);
        let gate = self.gate.clone();

        Box::pin(async move {
            if let Some(gate) = gate {
                let permit = gate.acquire().await.expect("gate closed");
                permit.forget();
                debug!("fake build released");
            }
            match result {
                FakeResult::Succeed => BuildOutcome::Success,
                FakeResult::Fail(reason) => BuildOutcome::Failed(reason),
                FakeResult::Panic => panic!("fake build panicked"),
            }
        })
    }
}

/// Notifier that keeps every notice for later assertions.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    notices: Arc<Mutex<Vec<(NoticeLevel, String)>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<(NoticeLevel, String)> {
        self.notices.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.notices().into_iter().map(|(_, m)| m).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        self.notices.lock().unwrap().push((level, message.to_string()));
    }
}
