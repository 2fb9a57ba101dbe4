// src/watch/mod.rs

//! File watching.
//!
//! Turns `notify` events into [`crate::types::ChangeEvent`] batches for the
//! [`crate::engine::ResourceService`], filters user-ignored paths, and
//! triggers settings reloads and project syncs when build files change.

pub mod events;
pub mod ignore;
pub mod path_utils;
pub mod sync;
pub mod watcher;

pub use events::change_events;
pub use ignore::IgnoreSet;
pub use sync::{SyncAction, SyncHooks};
pub use watcher::{process_batch, spawn_watcher, WatcherHandle};
