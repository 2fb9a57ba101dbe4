// src/engine/status.rs

//! `IDLE | RUNNING | ERROR` state machine.
//!
//! Observers pull the current value; nothing is pushed. Callers that must
//! keep the status consistent with the run registry serialize their
//! transitions (see `Dispatcher`).

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Mutex, MutexGuard};

use tracing::debug;

use crate::types::Status;

#[derive(Debug, Default)]
pub struct StatusTracker {
    state: AtomicU8,
    last_error: Mutex<Option<String>>,
}

/// Point-in-time view for observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub status: Status,
    pub last_error: Option<String>,
}

impl StatusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Status {
        Status::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Failure reason of the last failed build, until it is superseded.
    pub fn last_error(&self) -> Option<String> {
        self.error_slot().clone()
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            status: self.current(),
            last_error: self.last_error(),
        }
    }

    /// An accepted dispatch. Supersedes a previous error.
    pub fn mark_running(&self) {
        self.set(Status::Running);
    }

    /// A build finished successfully; `registry_empty` says whether anything
    /// else is still in flight.
    pub fn mark_succeeded(&self, registry_empty: bool) {
        self.error_slot().take();
        self.set(if registry_empty {
            Status::Idle
        } else {
            Status::Running
        });
    }

    /// A build failed, regardless of what else is in flight.
    pub fn mark_failed(&self, reason: &str) {
        *self.error_slot() = Some(reason.to_string());
        self.set(Status::Error);
    }

    /// Explicit clear from the user.
    pub fn clear_error(&self, registry_empty: bool) {
        if self.current() != Status::Error {
            return;
        }
        self.error_slot().take();
        self.set(if registry_empty {
            Status::Idle
        } else {
            Status::Running
        });
    }

    fn set(&self, next: Status) {
        let prev = Status::from_u8(self.state.swap(next.as_u8(), Ordering::AcqRel));
        if prev != next {
            debug!(from = %prev, to = %next, "status transition");
        }
    }

    fn error_slot(&self) -> MutexGuard<'_, Option<String>> {
        self.last_error.lock().unwrap_or_else(|e| e.into_inner())
    }
}
