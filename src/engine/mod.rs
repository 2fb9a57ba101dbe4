// src/engine/mod.rs

//! Debounce, dispatch and run tracking.
//!
//! - [`debounce`] merges bursts of matches per key into one fire.
//! - [`registry`] guarantees at most one in-flight build per key.
//! - [`status`] holds the observable `IDLE | RUNNING | ERROR` state.
//! - [`dispatch`] runs a key's generator task and handles its completion.
//! - [`service`] is the per-project facade the watcher talks to.

pub mod debounce;
pub mod dispatch;
pub mod registry;
pub mod service;
pub mod status;

pub use debounce::Debouncer;
pub use dispatch::{capitalize_first, generator_task_name, Dispatcher, GENERATED_OUTPUT_DIR};
pub use registry::RunRegistry;
pub use service::ResourceService;
pub use status::{StatusSnapshot, StatusTracker};
