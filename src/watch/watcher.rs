// src/watch/watcher.rs

use std::path::PathBuf;
use std::sync::Arc;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace};

use crate::engine::ResourceService;
use crate::errors::Result;
use crate::types::ChangeEvent;
use crate::watch::events::change_events;
use crate::watch::ignore::IgnoreSet;
use crate::watch::sync::{SyncAction, SyncHooks};

/// Handle for the filesystem watcher.
///
/// Keeps the underlying `RecommendedWatcher` alive. Dropping this handle
/// stops file watching and the event loop.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
    task: JoinHandle<()>,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

impl Drop for WatcherHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Watch `root` recursively and feed changes into `service`.
///
/// The notify callback only forwards raw events into a channel. A Tokio task
/// drains it and hands each batch to [`process_batch`].
pub fn spawn_watcher(
    root: impl Into<PathBuf>,
    service: Arc<ResourceService>,
    ignore: IgnoreSet,
    hooks: SyncHooks,
) -> Result<WatcherHandle> {
    let root = root.into();
    let root = root.canonicalize().unwrap_or_else(|_| root.clone());

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                // Receiver gone means we are shutting down.
                let _ = event_tx.send(event);
            }
            Err(err) => {
                eprintln!("reswatch: file watch error: {err}");
            }
        },
        Config::default(),
    )?;

    watcher.watch(&root, RecursiveMode::Recursive)?;

    info!("file watcher started on {:?}", root);

    let ignore = Arc::new(ignore);
    let hooks = Arc::new(hooks);
    let task = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            // Drain whatever else is already queued into the same batch.
            let mut batch = vec![event];
            while let Ok(more) = event_rx.try_recv() {
                batch.push(more);
            }

            if service.is_disposed() {
                break;
            }
            process_batch(
                Arc::clone(&service),
                Arc::clone(&ignore),
                Arc::clone(&hooks),
                batch,
            )
            .await;
        }
        debug!("watcher event loop finished");
    });

    Ok(WatcherHandle {
        _inner: watcher,
        task,
    })
}

/// Handle one batch of raw notify events and return how many changes were
/// routed to a dispatch key.
///
/// Classification and project sync read build files from disk, so the batch
/// runs on the blocking pool. Batches are awaited one at a time and keep
/// their order.
pub async fn process_batch(
    service: Arc<ResourceService>,
    ignore: Arc<IgnoreSet>,
    hooks: Arc<SyncHooks>,
    events: Vec<Event>,
) -> usize {
    let handled =
        tokio::task::spawn_blocking(move || handle_batch(&service, &ignore, &hooks, events)).await;
    match handled {
        Ok(routed) => routed,
        Err(err) => {
            error!(error = %err, "change batch handler failed");
            0
        }
    }
}

fn handle_batch(
    service: &ResourceService,
    ignore: &IgnoreSet,
    hooks: &SyncHooks,
    raw: Vec<Event>,
) -> usize {
    let mut changes: Vec<ChangeEvent> = Vec::new();
    let mut reload_settings = false;
    let mut sync_project = false;

    for event in raw {
        trace!(?event, "received notify event");
        for change in change_events(&event) {
            if !change.kind.is_content_change() || ignore.is_ignored(&change.path) {
                continue;
            }
            match hooks.action_for(&change.path) {
                SyncAction::ReloadSettings => reload_settings = true,
                SyncAction::SyncProject => sync_project = true,
                SyncAction::None => changes.push(change),
            }
        }
    }

    if reload_settings {
        hooks.reload_settings();
    }
    if sync_project {
        hooks.sync_project(service);
    }
    if changes.is_empty() {
        return 0;
    }
    let routed = service.on_events(&changes);
    debug!(changes = changes.len(), routed, "processed change batch");
    routed
}
