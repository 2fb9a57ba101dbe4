use std::fs;
use std::path::PathBuf;

use reswatch::config::{load_and_validate, load_or_default, resolve_config_path, SettingsStore};
use reswatch::errors::ReswatchError;
use reswatch::types::TriggeredWhileRunning;
use tempfile::TempDir;

fn write_config(contents: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("Reswatch.toml");
    fs::write(&path, contents).expect("write config");
    (dir, path)
}

fn config_error(contents: &str) -> String {
    let (_dir, path) = write_config(contents);
    match load_and_validate(&path) {
        Err(ReswatchError::ConfigError(msg)) => msg,
        other => panic!("expected a config error, got {other:?}"),
    }
}

#[test]
fn full_config_round_trips_into_settings() {
    let (_dir, path) = write_config(
        r#"
[settings]
enabled = false
debounce_ms = 750
show_notifications = false
extra_resource_dirs = ["sharedAssets"]
triggered_while_running = "queue"

[project]
metadata = ".reswatch/model.toml"
ignore = ["**/.idea/**"]

[[project.module]]
id = ":design"
dir = "libs/design-system"

[gradle]
command = "./gradlew"
args = ["--offline", "-q"]
"#,
    );

    let cfg = load_and_validate(&path).expect("valid config");
    assert!(!cfg.settings.enabled);
    assert_eq!(cfg.settings.debounce_ms, 750);
    assert!(!cfg.settings.show_notifications);
    assert_eq!(cfg.settings.extra_resource_dirs, vec!["sharedAssets".to_string()]);
    assert_eq!(cfg.settings.triggered_while_running, TriggeredWhileRunning::Queue);
    assert_eq!(cfg.project.metadata, Some(PathBuf::from(".reswatch/model.toml")));
    assert_eq!(cfg.project.modules.len(), 1);
    assert_eq!(cfg.project.modules[0].id, ":design");
    assert_eq!(cfg.gradle.command.as_deref(), Some("./gradlew"));
    assert_eq!(cfg.gradle.args, vec!["--offline".to_string(), "-q".to_string()]);
}

#[test]
fn empty_file_uses_defaults() {
    let (_dir, path) = write_config("");
    let cfg = load_and_validate(&path).expect("valid config");
    assert!(cfg.settings.enabled);
    assert_eq!(cfg.settings.debounce_ms, 2000);
    assert!(cfg.settings.show_notifications);
    assert_eq!(cfg.settings.triggered_while_running, TriggeredWhileRunning::Drop);
}

#[test]
fn missing_file_uses_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cfg = load_or_default(dir.path().join("nope.toml")).expect("defaults");
    assert_eq!(cfg.settings.debounce_ms, 2000);
}

#[test]
fn rejects_oversized_debounce() {
    let msg = config_error("[settings]\ndebounce_ms = 700000\n");
    assert!(msg.contains("debounce_ms"), "{msg}");
}

#[test]
fn rejects_extra_dir_with_separator() {
    let msg = config_error("[settings]\nextra_resource_dirs = [\"src/assets\"]\n");
    assert!(msg.contains("single directory name"), "{msg}");

    let msg = config_error("[settings]\nextra_resource_dirs = [\"  \"]\n");
    assert!(msg.contains("empty"), "{msg}");
}

#[test]
fn rejects_duplicate_module_ids() {
    let msg = config_error(
        r#"
[[project.module]]
id = ":a"
dir = "a"

[[project.module]]
id = ":a"
dir = "b"
"#,
    );
    assert!(msg.contains("more than once"), "{msg}");
}

#[test]
fn rejects_bad_ignore_glob_and_empty_command() {
    let msg = config_error("[project]\nignore = [\"a/[\"]\n");
    assert!(msg.contains("ignore"), "{msg}");

    let msg = config_error("[gradle]\ncommand = \"  \"\n");
    assert!(msg.contains("command"), "{msg}");
}

#[test]
fn unknown_run_policy_is_a_parse_error() {
    let (_dir, path) = write_config("[settings]\ntriggered_while_running = \"later\"\n");
    assert!(matches!(load_and_validate(&path), Err(ReswatchError::TomlError(_))));
}

#[test]
fn config_path_resolves_against_project_root() {
    let root = PathBuf::from("/proj");
    assert_eq!(resolve_config_path(&root, "Reswatch.toml"), PathBuf::from("/proj/Reswatch.toml"));
    assert_eq!(resolve_config_path(&root, "/etc/reswatch.toml"), PathBuf::from("/etc/reswatch.toml"));
}

#[test]
fn settings_store_updates_are_visible_to_clones() {
    let store = SettingsStore::default();
    let observer = store.clone();
    store.update(|s| s.debounce_ms = 100);
    assert_eq!(observer.current().debounce_ms, 100);
    assert!(observer.enabled());
}

#[test]
fn run_policy_parses_from_str() {
    assert_eq!("Queue".parse::<TriggeredWhileRunning>(), Ok(TriggeredWhileRunning::Queue));
    assert_eq!(" drop ".parse::<TriggeredWhileRunning>(), Ok(TriggeredWhileRunning::Drop));
    assert!("later".parse::<TriggeredWhileRunning>().is_err());
}
