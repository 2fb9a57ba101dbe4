// src/engine/debounce.rs

//! Per-key debounce timers.
//!
//! Each [`DispatchKey`] has at most one live timer. Scheduling an already
//! pending key aborts its timer and starts a new one, so a burst of matches
//! produces a single fire once the stream has been quiet for the window.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::types::DispatchKey;

pub type FireFn = Arc<dyn Fn(DispatchKey) + Send + Sync>;

#[derive(Debug)]
struct PendingTimer {
    generation: u64,
    handle: JoinHandle<()>,
}

pub struct Debouncer {
    pending: Arc<DashMap<DispatchKey, PendingTimer>>,
    next_generation: AtomicU64,
    disposed: Arc<AtomicBool>,
    fire: FireFn,
}

impl std::fmt::Debug for Debouncer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("pending", &self.pending.len())
            .finish_non_exhaustive()
    }
}

impl Debouncer {
    /// `fire` runs on a runtime worker once a key's window elapses. It is
    /// never called after `disposed` has been set.
    pub fn new(
        disposed: Arc<AtomicBool>,
        fire: impl Fn(DispatchKey) + Send + Sync + 'static,
    ) -> Self {
        Self {
            pending: Arc::new(DashMap::new()),
            next_generation: AtomicU64::new(0),
            disposed,
            fire: Arc::new(fire),
        }
    }

    /// (Re)start the timer for `key`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn schedule(&self, key: DispatchKey, window: Duration) {
        if self.disposed.load(Ordering::Acquire) {
            return;
        }

        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed) + 1;

        // Hold the entry while spawning so the timer can't look up its key
        // before its own generation is stored.
        let entry = self.pending.entry(key.clone());

        let pending = Arc::clone(&self.pending);
        let disposed = Arc::clone(&self.disposed);
        let fire = Arc::clone(&self.fire);
        let timer_key = key;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(window).await;
            if disposed.load(Ordering::Acquire) {
                return;
            }
            let current = pending
                .remove_if(&timer_key, |_, t| t.generation == generation)
                .is_some();
            if !current {
                trace!(key = %timer_key, generation, "superseded timer woke up");
                return;
            }
            if disposed.load(Ordering::Acquire) {
                return;
            }
            debug!(key = %timer_key, "settle window elapsed");
            fire(timer_key);
        });

        let timer = PendingTimer { generation, handle };
        match entry {
            Entry::Occupied(mut occupied) => {
                let previous = occupied.insert(timer);
                previous.handle.abort();
                trace!(key = %occupied.key(), generation, "restarted settle window");
            }
            Entry::Vacant(vacant) => {
                trace!(key = %vacant.key(), generation, "started settle window");
                vacant.insert(timer);
            }
        }
    }

    pub fn is_pending(&self, key: &DispatchKey) -> bool {
        self.pending.contains_key(key)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Abort every pending timer.
    pub fn cancel_all(&self) {
        let keys: Vec<DispatchKey> = self.pending.iter().map(|e| e.key().clone()).collect();
        for key in keys {
            if let Some((_, timer)) = self.pending.remove(&key) {
                timer.handle.abort();
            }
        }
    }
}
