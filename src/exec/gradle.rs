// src/exec/gradle.rs

//! Gradle process runner.

use std::path::Path;
use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info};

use crate::config::GradleSection;
use crate::exec::backend::{BuildFuture, BuildOrchestrator, BuildOutcome, BuildRequest};

/// Wrapper script name for the current platform.
pub fn wrapper_name() -> &'static str {
    if cfg!(windows) { "gradlew.bat" } else { "gradlew" }
}

/// Runs tasks with `<command> <args...> <task>` in the request's working
/// directory.
#[derive(Debug, Clone)]
pub struct GradleOrchestrator {
    command: String,
    args: Vec<String>,
}

impl GradleOrchestrator {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
        }
    }

    /// Use the configured command, else the project's wrapper, else `gradle`.
    pub fn from_config(cfg: &GradleSection, project_root: &Path) -> Self {
        let command = match cfg.command {
            Some(ref command) => command.clone(),
            None => {
                let wrapper = project_root.join(wrapper_name());
                if wrapper.is_file() {
                    wrapper.to_string_lossy().into_owned()
                } else {
                    "gradle".to_string()
                }
            }
        };
        Self::new(command, cfg.args.clone())
    }

    pub fn command(&self) -> &str {
        &self.command
    }
}

impl BuildOrchestrator for GradleOrchestrator {
    fn submit(&self, request: BuildRequest) -> BuildFuture {
        let command = self.command.clone();
        let args = self.args.clone();
        Box::pin(async move {
            match run_gradle(&command, &args, &request).await {
                Ok(outcome) => outcome,
                Err(err) => BuildOutcome::Failed(format!("{err:#}")),
            }
        })
    }
}

async fn run_gradle(command: &str, args: &[String], request: &BuildRequest) -> Result<BuildOutcome> {
    info!(
        task = %request.task_name,
        cmd = %command,
        cwd = ?request.working_dir,
        "starting Gradle"
    );

    let mut child = Command::new(command)
        .args(args)
        .arg(&request.task_name)
        .current_dir(&request.working_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .with_context(|| format!("spawning '{command}' for task '{}'", request.task_name))?;

    if let Some(stdout) = child.stdout.take() {
        let task_name = request.task_name.clone();
        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                debug!(task = %task_name, "stdout: {}", line);
            }
        });
    }

    // Keep the last non-empty stderr line as the failure reason.
    let stderr_tail = child.stderr.take().map(|stderr| {
        let task_name = request.task_name.clone();
        tokio::spawn(async move {
            let mut last = None;
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                debug!(task = %task_name, "stderr: {}", line);
                if !line.trim().is_empty() {
                    last = Some(line);
                }
            }
            last
        })
    });

    let status = child
        .wait()
        .await
        .with_context(|| format!("waiting for Gradle task '{}'", request.task_name))?;

    let tail = match stderr_tail {
        Some(handle) => handle.await.ok().flatten(),
        None => None,
    };

    let code = status.code().unwrap_or(-1);
    info!(
        task = %request.task_name,
        exit_code = code,
        success = status.success(),
        "Gradle exited"
    );

    if status.success() {
        Ok(BuildOutcome::Success)
    } else {
        let reason = match tail {
            Some(line) => format!("exit code {code}: {line}"),
            None => format!("exit code {code}"),
        };
        Ok(BuildOutcome::Failed(reason))
    }
}
