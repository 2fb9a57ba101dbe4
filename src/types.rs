// src/types.rs

//! Value types shared by the router, scheduler and watcher.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Deserialize;

/// Name of the source set used when a resource path carries no
/// `src/<name>/` segment.
pub const DEFAULT_SOURCE_SET: &str = "commonMain";

/// Kind of filesystem change, as reported by the watcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Created,
    Modified,
    Deleted,
    Moved,
    Renamed,
    /// Access, metadata-only or otherwise uninteresting events.
    Other,
}

impl ChangeKind {
    /// Whether this kind can affect the generated accessors.
    pub fn is_content_change(self) -> bool {
        !matches!(self, ChangeKind::Other)
    }

    /// Short label used in log lines (`[Modified] /path`).
    pub fn label(self) -> &'static str {
        match self {
            ChangeKind::Created => "Create",
            ChangeKind::Modified => "ContentChange",
            ChangeKind::Deleted => "Delete",
            ChangeKind::Moved => "Move",
            ChangeKind::Renamed => "Rename",
            ChangeKind::Other => "Other",
        }
    }
}

/// A single filesystem change. Consumed once by the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub path: PathBuf,
    pub kind: ChangeKind,
}

impl ChangeEvent {
    pub fn new(path: impl Into<PathBuf>, kind: ChangeKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

/// Identifies one debounce bucket and one run-registry slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DispatchKey {
    pub module_id: String,
    pub source_set: String,
}

impl DispatchKey {
    pub fn new(module_id: impl Into<String>, source_set: impl Into<String>) -> Self {
        Self {
            module_id: module_id.into(),
            source_set: source_set.into(),
        }
    }
}

impl fmt::Display for DispatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let module = if self.module_id.is_empty() {
            "<root>"
        } else {
            self.module_id.as_str()
        };
        write!(f, "{module}[{}]", self.source_set)
    }
}

/// Result of routing a change to its owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceMatch {
    pub owner_module_id: String,
    pub source_set: String,
}

impl ResourceMatch {
    pub fn key(&self) -> DispatchKey {
        DispatchKey::new(self.owner_module_id.clone(), self.source_set.clone())
    }
}

/// Tri-state answer of a single classification signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Participates,
    DoesNotParticipate,
    Unknown,
}

impl Classification {
    pub fn from_bool(value: bool) -> Self {
        if value {
            Classification::Participates
        } else {
            Classification::DoesNotParticipate
        }
    }

    /// `Some(answer)` for decisive results, `None` for `Unknown`.
    pub fn decisive(self) -> Option<bool> {
        match self {
            Classification::Participates => Some(true),
            Classification::DoesNotParticipate => Some(false),
            Classification::Unknown => None,
        }
    }
}

/// Process-wide generation status exposed to observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Idle,
    Running,
    Error,
}

impl Status {
    pub(crate) fn as_u8(self) -> u8 {
        match self {
            Status::Idle => 0,
            Status::Running => 1,
            Status::Error => 2,
        }
    }

    pub(crate) fn from_u8(raw: u8) -> Self {
        match raw {
            1 => Status::Running,
            2 => Status::Error,
            _ => Status::Idle,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::Idle => "IDLE",
            Status::Running => "RUNNING",
            Status::Error => "ERROR",
        };
        f.write_str(s)
    }
}

/// Behaviour when a match arrives for a key whose build is already running.
///
/// - `Drop`: the request is discarded (default).
/// - `Queue`: at most one re-run per key is remembered and dispatched as
///   soon as the in-flight run completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TriggeredWhileRunning {
    #[default]
    Drop,
    Queue,
}

impl FromStr for TriggeredWhileRunning {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "drop" => Ok(TriggeredWhileRunning::Drop),
            "queue" => Ok(TriggeredWhileRunning::Queue),
            other => Err(format!(
                "invalid triggered_while_running: {other} (expected \"drop\" or \"queue\")"
            )),
        }
    }
}
