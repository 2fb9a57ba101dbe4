use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use reswatch::config::{ProjectSection, Settings, SettingsStore};
use reswatch::fs::mock::MockFileSystem;
use reswatch::project::{ProjectLoader, ProjectModel};
use notify::event::{DataChange, ModifyKind};
use notify::{Event, EventKind};
use reswatch::watch::{process_batch, IgnoreSet, SyncAction, SyncHooks};
use reswatch_test_utils::builders::{Harness, COMPOSE_BUILD_SCRIPT, PLAIN_BUILD_SCRIPT};
use reswatch_test_utils::init_tracing;

fn hooks(fs: &MockFileSystem, config_path: PathBuf, settings: SettingsStore) -> SyncHooks {
    let section = ProjectSection {
        metadata: Some(PathBuf::from(".reswatch/model.toml")),
        ..ProjectSection::default()
    };
    SyncHooks {
        loader: ProjectLoader::new(Arc::new(fs.clone()), "/proj", &section),
        config_path,
        settings,
    }
}

#[test]
fn classifies_sync_triggers() {
    let fs = MockFileSystem::new();
    let h = hooks(&fs, PathBuf::from("/proj/Reswatch.toml"), SettingsStore::default());

    assert_eq!(h.action_for(Path::new("/proj/Reswatch.toml")), SyncAction::ReloadSettings);
    assert_eq!(h.action_for(Path::new("/proj/settings.gradle.kts")), SyncAction::SyncProject);
    assert_eq!(h.action_for(Path::new("/proj/settings.gradle")), SyncAction::SyncProject);
    assert_eq!(h.action_for(Path::new("/proj/app/build.gradle.kts")), SyncAction::SyncProject);
    assert_eq!(h.action_for(Path::new("/proj/.reswatch/model.toml")), SyncAction::SyncProject);

    assert_eq!(h.action_for(Path::new("/proj/app/settings.gradle.kts")), SyncAction::None);
    assert_eq!(
        h.action_for(Path::new("/proj/app/build/tmp/build.gradle.kts")),
        SyncAction::None
    );
    assert_eq!(
        h.action_for(Path::new("/proj/app/src/commonMain/composeResources/a.xml")),
        SyncAction::None
    );
}

#[test]
fn reload_settings_reads_the_config_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("Reswatch.toml");
    fs::write(&path, "[settings]\ndebounce_ms = 250\nenabled = false\n").expect("write");

    let store = SettingsStore::default();
    let h = hooks(&MockFileSystem::new(), path.clone(), store.clone());
    h.reload_settings();
    assert_eq!(store.current().debounce_ms, 250);
    assert!(!store.enabled());

    // Broken edits keep what was loaded last.
    fs::write(&path, "[settings]\ndebounce_ms = \"soon\"\n").expect("write");
    h.reload_settings();
    assert_eq!(store.current().debounce_ms, 250);
}

#[test]
fn sync_project_rediscovers_and_reclassifies() {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file("/proj/settings.gradle.kts", "include(\":app\")\n");
    fs.add_file("/proj/app/build.gradle.kts", PLAIN_BUILD_SCRIPT);

    let loader_hooks = hooks(&fs, PathBuf::from("/proj/Reswatch.toml"), SettingsStore::default());
    let model = loader_hooks.loader.load_model();
    let h = Harness::new(fs.clone(), model, Settings::default());
    assert!(!h.service.has_participating_module());

    fs.add_file("/proj/app/build.gradle.kts", COMPOSE_BUILD_SCRIPT);
    fs.add_file("/proj/settings.gradle.kts", "include(\":app\", \":lib\")\n");
    loader_hooks.sync_project(&h.service);

    assert!(h.service.has_participating_module());
    let project = h.service.project();
    let ids: Vec<&str> = project.modules.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["", ":app", ":lib"]);
}

#[test]
fn sync_after_dispose_is_ignored() {
    init_tracing();
    let fs = MockFileSystem::new();
    let h = Harness::new(fs.clone(), ProjectModel::new("/proj", Vec::new()), Settings::default());
    h.service.dispose();

    let loader_hooks = hooks(&fs, PathBuf::from("/proj/Reswatch.toml"), SettingsStore::default());
    loader_hooks.sync_project(&h.service);
    assert!(h.service.project().modules.is_empty());
}

fn edit(path: &str) -> Event {
    Event::new(EventKind::Modify(ModifyKind::Data(DataChange::Content))).add_path(PathBuf::from(path))
}

#[tokio::test]
async fn batch_syncs_build_scripts_before_routing_edits() {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file("/proj/settings.gradle.kts", "include(\":app\")\n");
    fs.add_file("/proj/app/build.gradle.kts", PLAIN_BUILD_SCRIPT);

    let hooks = hooks(&fs, PathBuf::from("/proj/Reswatch.toml"), SettingsStore::default());
    let h = Harness::new(fs.clone(), hooks.loader.load_model(), Settings::default());
    let hooks = Arc::new(hooks);
    let ignore = Arc::new(IgnoreSet::none("/proj"));
    let strings = "/proj/app/src/commonMain/composeResources/values/strings.xml";

    let routed = process_batch(
        Arc::clone(&h.service),
        Arc::clone(&ignore),
        Arc::clone(&hooks),
        vec![edit(strings)],
    )
    .await;
    assert_eq!(routed, 0, "plain module does not take part");

    fs.add_file("/proj/app/build.gradle.kts", COMPOSE_BUILD_SCRIPT);
    let routed = process_batch(
        Arc::clone(&h.service),
        ignore,
        hooks,
        vec![edit("/proj/app/build.gradle.kts"), edit(strings)],
    )
    .await;
    assert_eq!(routed, 1);
    assert!(h.service.has_participating_module());

    h.service.dispose();
}
