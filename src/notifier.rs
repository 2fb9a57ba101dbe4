// src/notifier.rs

//! User-facing notices.
//!
//! The core only pushes strings into a [`Notifier`]; presentation is up to
//! the implementation.

use std::fmt::Debug;

use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warn,
    Error,
}

/// Sink for informational, warning and error notices.
pub trait Notifier: Send + Sync + Debug {
    fn notify(&self, level: NoticeLevel, message: &str);
}

/// Logs every notice and echoes it on stdout with a `[reswatch]` prefix.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        match level {
            NoticeLevel::Info => info!(notice = true, "{message}"),
            NoticeLevel::Warn => warn!(notice = true, "{message}"),
            NoticeLevel::Error => error!(notice = true, "{message}"),
        }
        println!("[reswatch] {message}");
    }
}
