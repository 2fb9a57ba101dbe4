// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

use crate::types::TriggeredWhileRunning;

/// Default settle window after the last relevant change.
pub const DEFAULT_DEBOUNCE_MS: u64 = 2000;

/// Top-level configuration as read from `Reswatch.toml`.
///
/// ```toml
/// [settings]
/// enabled = true
/// debounce_ms = 2000
/// show_notifications = true
/// extra_resource_dirs = ["sharedResources"]
/// triggered_while_running = "drop"
///
/// [project]
/// metadata = ".reswatch/model.toml"
/// ignore = ["**/.idea/**"]
///
/// [[project.module]]
/// id = ":design"
/// dir = "libs/design-system"
///
/// [gradle]
/// command = "./gradlew"
/// args = ["--offline"]
/// ```
///
/// All sections are optional and have reasonable defaults. This raw form has
/// not been validated; see [`ConfigFile`].
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    #[serde(default)]
    pub settings: Settings,

    #[serde(default)]
    pub project: ProjectSection,

    #[serde(default)]
    pub gradle: GradleSection,
}

/// Validated configuration.
///
/// Can only be constructed through `TryFrom<RawConfigFile>` (see
/// `validate.rs`) or [`ConfigFile::default`].
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    pub settings: Settings,
    pub project: ProjectSection,
    pub gradle: GradleSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        settings: Settings,
        project: ProjectSection,
        gradle: GradleSection,
    ) -> Self {
        Self {
            settings,
            project,
            gradle,
        }
    }
}

/// `[settings]` section: the user-tunable knobs read at every decision point.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    /// Master switch. When false, change events are ignored.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Settle window in milliseconds.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Print a notice on stdout when a generation finishes or fails.
    #[serde(default = "default_true")]
    pub show_notifications: bool,

    /// Extra directory names treated like `composeResources`.
    #[serde(default)]
    pub extra_resource_dirs: Vec<String>,

    /// What to do with a match whose key is already running.
    #[serde(default)]
    pub triggered_while_running: TriggeredWhileRunning,
}

fn default_true() -> bool {
    true
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled: true,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            show_notifications: true,
            extra_resource_dirs: Vec::new(),
            triggered_while_running: TriggeredWhileRunning::default(),
        }
    }
}

/// `[project]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ProjectSection {
    /// Optional build metadata snapshot (task graph / extensions per module),
    /// relative to the project root.
    #[serde(default)]
    pub metadata: Option<PathBuf>,

    /// Glob patterns (relative to the project root) for paths whose changes
    /// are never routed.
    #[serde(default)]
    pub ignore: Vec<String>,

    /// Modules declared by hand, for layouts the settings script can't express.
    #[serde(default, rename = "module")]
    pub modules: Vec<ModuleDecl>,
}

/// `[[project.module]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModuleDecl {
    /// Gradle path, e.g. `":feature:home"`.
    pub id: String,
    /// Base directory relative to the project root.
    pub dir: PathBuf,
}

/// `[gradle]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct GradleSection {
    /// Executable used to run tasks. When unset, `./gradlew` is used if the
    /// wrapper exists, otherwise `gradle` from `PATH`.
    #[serde(default)]
    pub command: Option<String>,

    /// Extra arguments placed before the task name.
    #[serde(default)]
    pub args: Vec<String>,
}
