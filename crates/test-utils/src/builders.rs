#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use reswatch::classify::ModuleClassifier;
use reswatch::config::{Settings, SettingsStore};
use reswatch::engine::ResourceService;
use reswatch::fs::mock::MockFileSystem;
use reswatch::project::{Module, ProjectModel};

use crate::fake_orchestrator::{FakeOrchestrator, RecordingNotifier};

/// Build script content that applies the Compose plugin.
pub const COMPOSE_BUILD_SCRIPT: &str = r#"plugins {
    kotlin("multiplatform")
    id("org.jetbrains.compose")
}
"#;

/// Build script content without any Compose plugin.
pub const PLAIN_BUILD_SCRIPT: &str = r#"plugins {
    kotlin("jvm")
}
"#;

/// Builder for a [`Module`] whose files live in a [`MockFileSystem`].
pub struct ModuleBuilder {
    id: String,
    base_dir: PathBuf,
    source_sets: Vec<String>,
    build_script: Option<String>,
    resource_sets: Vec<String>,
}

impl ModuleBuilder {
    pub fn new(id: &str, base_dir: impl AsRef<Path>) -> Self {
        Self {
            id: id.to_string(),
            base_dir: base_dir.as_ref().to_path_buf(),
            source_sets: Vec::new(),
            build_script: None,
            resource_sets: Vec::new(),
        }
    }

    /// Adds `build.gradle.kts` applying the Compose plugin.
    pub fn compose(self) -> Self {
        self.build_script(COMPOSE_BUILD_SCRIPT)
    }

    /// Adds `build.gradle.kts` without the Compose plugin.
    pub fn plain(self) -> Self {
        self.build_script(PLAIN_BUILD_SCRIPT)
    }

    pub fn build_script(mut self, content: &str) -> Self {
        self.build_script = Some(content.to_string());
        self
    }

    pub fn source_set(mut self, name: &str) -> Self {
        self.source_sets.push(name.to_string());
        self
    }

    /// Adds `src/<name>/composeResources/`.
    pub fn resources_in(mut self, name: &str) -> Self {
        if !self.source_sets.iter().any(|s| s == name) {
            self.source_sets.push(name.to_string());
        }
        self.resource_sets.push(name.to_string());
        self
    }

    /// Write the module's files into `fs` and return the model entry.
    pub fn build(self, fs: &MockFileSystem) -> Module {
        fs.add_dir(&self.base_dir);
        if let Some(ref script) = self.build_script {
            fs.add_file(self.base_dir.join("build.gradle.kts"), script.as_bytes());
        }
        for set in self.source_sets.iter() {
            fs.add_dir(self.base_dir.join("src").join(set));
        }
        for set in self.resource_sets.iter() {
            fs.add_dir(self.base_dir.join("src").join(set).join("composeResources"));
        }
        Module::new(self.id, self.base_dir).with_source_sets(self.source_sets)
    }
}

/// A service wired to fakes, for driving the engine from tests.
pub struct Harness {
    pub fs: MockFileSystem,
    pub settings: SettingsStore,
    pub orchestrator: FakeOrchestrator,
    pub notifier: RecordingNotifier,
    pub service: Arc<ResourceService>,
}

impl Harness {
    pub fn new(fs: MockFileSystem, model: ProjectModel, settings: Settings) -> Self {
        Self::with_orchestrator(fs, model, settings, FakeOrchestrator::new())
    }

    pub fn with_orchestrator(
        fs: MockFileSystem,
        model: ProjectModel,
        settings: Settings,
        orchestrator: FakeOrchestrator,
    ) -> Self {
        let settings = SettingsStore::new(settings);
        let notifier = RecordingNotifier::new();
        let classifier = Arc::new(ModuleClassifier::without_metadata(Arc::new(fs.clone())));
        let service = Arc::new(ResourceService::new(
            settings.clone(),
            model,
            classifier,
            Arc::new(orchestrator.clone()),
            Arc::new(notifier.clone()),
        ));
        Self {
            fs,
            settings,
            orchestrator,
            notifier,
            service,
        }
    }
}

/// Settings with a given settle window and everything else default.
pub fn settings_with_debounce(debounce_ms: u64) -> Settings {
    Settings {
        debounce_ms,
        ..Settings::default()
    }
}
