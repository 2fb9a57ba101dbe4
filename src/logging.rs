// src/logging.rs

//! Logging setup for `reswatch` using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the filter:
//! 1. `--log-level` CLI flag (if provided)
//! 2. `RESWATCH_LOG` environment variable, either a bare level ("debug") or
//!    full directives ("reswatch=debug,notify=warn")
//! 3. default to `info`
//!
//! Logs are sent to STDERR so that stdout carries only user-facing notices.

use anyhow::Result;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

use crate::cli::LogLevel;

pub const LOG_ENV_VAR: &str = "RESWATCH_LOG";

/// Initialise global logging subscriber.
///
/// Safe to call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let filter = match cli_level {
        Some(lvl) => EnvFilter::new(level_from_log_level(lvl).as_str()),
        None => filter_from_env(std::env::var(LOG_ENV_VAR).ok().as_deref()),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))?;

    Ok(())
}

fn filter_from_env(raw: Option<&str>) -> EnvFilter {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return EnvFilter::new("info");
    };
    if let Some(level) = parse_level_str(raw) {
        return EnvFilter::new(level.as_str());
    }
    EnvFilter::try_new(raw).unwrap_or_else(|err| {
        eprintln!("reswatch: ignoring invalid {LOG_ENV_VAR}={raw:?}: {err}");
        EnvFilter::new("info")
    })
}

fn level_from_log_level(lvl: LogLevel) -> tracing::Level {
    match lvl {
        LogLevel::Error => tracing::Level::ERROR,
        LogLevel::Warn => tracing::Level::WARN,
        LogLevel::Info => tracing::Level::INFO,
        LogLevel::Debug => tracing::Level::DEBUG,
        LogLevel::Trace => tracing::Level::TRACE,
    }
}

pub fn parse_level_str(s: &str) -> Option<tracing::Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(tracing::Level::ERROR),
        "warn" | "warning" => Some(tracing::Level::WARN),
        "info" => Some(tracing::Level::INFO),
        "debug" => Some(tracing::Level::DEBUG),
        "trace" => Some(tracing::Level::TRACE),
        _ => None,
    }
}
