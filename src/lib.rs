// src/lib.rs

pub mod classify;
pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod notifier;
pub mod project;
pub mod route;
pub mod types;
pub mod watch;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use crate::classify::ModuleClassifier;
use crate::cli::CliArgs;
use crate::config::{load_or_default, resolve_config_path, ConfigFile, SettingsStore};
use crate::engine::{generator_task_name, ResourceService};
use crate::exec::GradleOrchestrator;
use crate::fs::{FileSystem, RealFileSystem};
use crate::notifier::TracingNotifier;
use crate::project::{ProjectLoader, ProjectModel};
use crate::types::{DispatchKey, Status};
use crate::watch::{spawn_watcher, IgnoreSet, SyncHooks};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading and project discovery
/// - module classification
/// - the resource service (router, debouncer, dispatcher)
/// - the Gradle orchestrator
/// - the file watcher and Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let root = PathBuf::from(&args.project_root);
    let root = root
        .canonicalize()
        .with_context(|| format!("project root {:?} is not accessible", root))?;

    let config_path = resolve_config_path(&root, &args.config);
    let cfg = load_or_default(&config_path)
        .with_context(|| format!("loading config {:?}", config_path))?;

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let loader = ProjectLoader::new(Arc::clone(&fs), root.clone(), &cfg.project);
    let model = loader.load_model();
    let classifier = Arc::new(ModuleClassifier::new(Arc::clone(&fs), loader.load_metadata()));

    if args.dry_run {
        print_dry_run(&cfg, &model, &classifier);
        return Ok(());
    }

    let settings = SettingsStore::new(cfg.settings.clone());
    let orchestrator = Arc::new(GradleOrchestrator::from_config(&cfg.gradle, &root));
    info!(command = %orchestrator.command(), "using Gradle command");

    let service = Arc::new(ResourceService::new(
        settings.clone(),
        model,
        classifier,
        orchestrator,
        Arc::new(TracingNotifier),
    ));

    if !service.has_participating_module() {
        warn!("no module uses Compose resources; waiting for build changes");
    }

    if args.once {
        let dispatched = service.run_for_all_modules();
        info!(dispatched, "generating accessors for all modules");
        service.wait_idle().await;
        let status = service.status_snapshot();
        service.dispose();
        if status.status == Status::Error {
            bail!(
                "resource generation failed: {}",
                status.last_error.unwrap_or_else(|| "unknown error".to_string())
            );
        }
        return Ok(());
    }

    let ignore = IgnoreSet::new(root.clone(), &cfg.project.ignore)?;
    let hooks = SyncHooks {
        loader,
        config_path,
        settings,
    };
    let _watcher = spawn_watcher(root, Arc::clone(&service), ignore, hooks)?;

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl+C")?;
    info!("shutdown requested");
    service.dispose();

    Ok(())
}

/// Print modules, their classification and the tasks they would run.
fn print_dry_run(cfg: &ConfigFile, model: &ProjectModel, classifier: &ModuleClassifier) {
    println!("reswatch dry-run");
    println!("  root = {}", model.root.display());
    println!("  settings.enabled = {}", cfg.settings.enabled);
    println!("  settings.debounce_ms = {}", cfg.settings.debounce_ms);
    if !cfg.settings.extra_resource_dirs.is_empty() {
        println!("  settings.extra_resource_dirs = {:?}", cfg.settings.extra_resource_dirs);
    }
    println!(
        "  settings.triggered_while_running = {:?}",
        cfg.settings.triggered_while_running
    );
    println!();

    println!("modules ({}):", model.modules.len());
    for module in model.modules.iter() {
        let (participates, signal) = classifier.evaluate(module);
        println!("  - {} ({})", module.display_name(), module.base_dir.display());
        println!(
            "      participates: {participates} (by {})",
            signal.unwrap_or("default")
        );
        if participates {
            let sets: Vec<&str> = if module.source_sets.is_empty() {
                vec![types::DEFAULT_SOURCE_SET]
            } else {
                module.source_sets.iter().map(String::as_str).collect()
            };
            for set in sets {
                let key = DispatchKey::new(module.id.clone(), set);
                println!("      task: {}", generator_task_name(&key));
            }
        }
    }
}
