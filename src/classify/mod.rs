// src/classify/mod.rs

//! Module classification: does a module take part in the resource system?
//!
//! Signals from [`signals::SIGNALS`] are consulted in order and the first
//! decisive answer wins; if none is decisive the module does not participate.
//! Answers are memoized per module id until [`ModuleClassifier::invalidate_cache`]
//! is called (typically after a project sync).

pub mod signals;

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, RwLock};

use dashmap::DashMap;
use tracing::{debug, info, trace};

use crate::fs::FileSystem;
use crate::project::{MetadataProvider, Module, NoMetadata};

pub use signals::{Signal, SignalContext, SIGNALS};

const AGGREGATE_UNKNOWN: u8 = 0;
const AGGREGATE_NO: u8 = 1;
const AGGREGATE_YES: u8 = 2;

#[derive(Debug)]
pub struct ModuleClassifier {
    fs: Arc<dyn FileSystem>,
    metadata: RwLock<Arc<dyn MetadataProvider>>,
    cache: DashMap<String, bool>,
    aggregate: AtomicU8,
}

impl ModuleClassifier {
    pub fn new(fs: Arc<dyn FileSystem>, metadata: Arc<dyn MetadataProvider>) -> Self {
        Self {
            fs,
            metadata: RwLock::new(metadata),
            cache: DashMap::new(),
            aggregate: AtomicU8::new(AGGREGATE_UNKNOWN),
        }
    }

    pub fn without_metadata(fs: Arc<dyn FileSystem>) -> Self {
        Self::new(fs, Arc::new(NoMetadata))
    }

    /// Does `module` participate? Memoized per module id.
    pub fn classify(&self, module: &Module) -> bool {
        if let Some(cached) = self.cache.get(&module.id) {
            return *cached;
        }

        let (result, decided_by) = self.evaluate(module);
        debug!(
            module = %module.id,
            participates = result,
            signal = decided_by.unwrap_or("default"),
            "classified module"
        );
        self.cache.insert(module.id.clone(), result);
        result
    }

    /// Run every signal without touching the cache. Returns the answer and
    /// the name of the signal that decided it (`None` for the default).
    pub fn evaluate(&self, module: &Module) -> (bool, Option<&'static str>) {
        let metadata = self.metadata_snapshot();
        let ctx = SignalContext {
            fs: self.fs.as_ref(),
            metadata: metadata.as_ref(),
        };
        first_decisive(&SIGNALS, &ctx, module)
    }

    /// Does any of `modules` participate? Memoized until invalidation.
    pub fn has_participating_module(&self, modules: &[Module]) -> bool {
        match self.aggregate.load(Ordering::Acquire) {
            AGGREGATE_YES => return true,
            AGGREGATE_NO => return false,
            _ => {}
        }

        let result = modules.iter().any(|m| self.classify(m));
        let encoded = if result { AGGREGATE_YES } else { AGGREGATE_NO };
        self.aggregate.store(encoded, Ordering::Release);
        info!(participating = result, "resource project detection");
        result
    }

    /// Cached answer for a module id, if any.
    pub fn cached(&self, module_id: &str) -> Option<bool> {
        self.cache.get(module_id).map(|v| *v)
    }

    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    /// Drop every memoized answer, per-module and project-wide.
    pub fn invalidate_cache(&self) {
        self.cache.clear();
        self.aggregate.store(AGGREGATE_UNKNOWN, Ordering::Release);
        info!("classification cache invalidated");
    }

    /// Swap in freshly loaded build metadata. Does not invalidate by itself.
    pub fn set_metadata(&self, metadata: Arc<dyn MetadataProvider>) {
        let mut guard = match self.metadata.write() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = metadata;
    }

    fn metadata_snapshot(&self) -> Arc<dyn MetadataProvider> {
        match self.metadata.read() {
            Ok(g) => Arc::clone(&*g),
            Err(poisoned) => Arc::clone(&*poisoned.into_inner()),
        }
    }
}

/// Walk `signals` in order; the first non-`Unknown` answer wins.
pub fn first_decisive(
    signals: &[(&'static str, Signal)],
    ctx: &SignalContext<'_>,
    module: &Module,
) -> (bool, Option<&'static str>) {
    for (name, signal) in signals {
        let answer = signal(ctx, module);
        trace!(module = %module.id, signal = name, ?answer, "signal evaluated");
        if let Some(decided) = answer.decisive() {
            return (decided, Some(name));
        }
    }
    (false, None)
}

