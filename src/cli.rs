// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `reswatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "reswatch",
    version,
    about = "Regenerate Compose resource accessors when resource directories change.",
    long_about = None
)]
pub struct CliArgs {
    /// Root directory of the Gradle project to watch.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub project_root: String,

    /// Path to the config file (TOML).
    ///
    /// Relative paths are resolved against the project root. A missing file
    /// means "use defaults".
    #[arg(long, value_name = "PATH", default_value = "Reswatch.toml")]
    pub config: String,

    /// Generate accessors for every participating module once, then exit.
    #[arg(long)]
    pub once: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `RESWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Discover and classify modules, print the result, but don't run Gradle.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
