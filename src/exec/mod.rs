// src/exec/mod.rs

//! Build execution layer.
//!
//! - [`backend`] provides the `BuildOrchestrator` trait the dispatcher uses,
//!   which tests replace with a fake implementation.
//! - [`gradle`] runs tasks through the Gradle wrapper with
//!   `tokio::process::Command`.

pub mod backend;
pub mod gradle;

pub use backend::{BuildFuture, BuildOrchestrator, BuildOutcome, BuildRequest};
pub use gradle::GradleOrchestrator;
