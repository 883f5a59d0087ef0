//! Process execution.
//!
//! A tool run is split in two: a [`ToolStrategy`] turns a typed request
//! into an [`ExecutionPlan`], and a [`ProcessAdapter`] executes the plan.
//! Tests substitute the adapter to avoid spawning real processes.

use async_trait::async_trait;
use std::process::Stdio;
use std::time::{Duration, Instant};

use crate::error::ToolError;

pub const MAX_LOG_TEXT_LENGTH: usize = 500;

/// Command line of one process invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionPlan {
    pub command: String,
    pub args: Vec<String>,
}

impl ExecutionPlan {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Value following `flag` in the argument list.
    pub fn arg_value(&self, flag: &str) -> Option<&str> {
        self.args
            .iter()
            .position(|a| a == flag)
            .and_then(|i| self.args.get(i + 1))
            .map(String::as_str)
    }
}

/// Captured result of a finished process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, `None` when terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub duration: Duration,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Builds the execution plan for a request.
pub trait ToolStrategy<R>: Send + Sync {
    fn build_plan(&self, request: &R) -> Result<ExecutionPlan, ToolError>;
}

/// Runs an execution plan to completion or until `timeout` elapses.
#[async_trait]
pub trait ProcessAdapter: Send + Sync {
    async fn execute(
        &self,
        plan: &ExecutionPlan,
        timeout: Duration,
    ) -> Result<ProcessOutput, ToolError>;
}

/// Cuts `text` to [`MAX_LOG_TEXT_LENGTH`] characters for logging.
pub fn truncate_log_text(text: &str) -> String {
    match text.char_indices().nth(MAX_LOG_TEXT_LENGTH) {
        Some((cut, _)) => format!("{}...(truncated)", &text[..cut]),
        None => text.to_string(),
    }
}

/// Spawns real processes with tokio.
///
/// The child is spawned with `kill_on_drop`, so when the timeout wins the
/// race the dropped wait future takes the process down with it.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioProcessAdapter;

#[async_trait]
impl ProcessAdapter for TokioProcessAdapter {
    async fn execute(
        &self,
        plan: &ExecutionPlan,
        timeout: Duration,
    ) -> Result<ProcessOutput, ToolError> {
        tracing::info!(
            "Starting {} {:?} (timeout {} ms)",
            plan.command,
            plan.args,
            timeout.as_millis()
        );

        let child = tokio::process::Command::new(&plan.command)
            .args(&plan.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| {
                tracing::error!("Failed to start {}: {}", plan.command, source);
                ToolError::Spawn {
                    command: plan.command.clone(),
                    source,
                }
            })?;

        let started = Instant::now();
        let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(result) => result?,
            Err(_) => {
                tracing::error!(
                    "{} timed out after {} ms, killing it",
                    plan.command,
                    timeout.as_millis()
                );
                return Err(ToolError::Timeout {
                    command: plan.command.clone(),
                    timeout_ms: timeout.as_millis() as u64,
                });
            }
        };
        let duration = started.elapsed();

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        tracing::debug!("{} stdout: {}", plan.command, truncate_log_text(&stdout));
        tracing::debug!("{} stderr: {}", plan.command, truncate_log_text(&stderr));
        tracing::info!(
            "{} finished with {:?} in {} ms",
            plan.command,
            output.status.code(),
            duration.as_millis()
        );

        Ok(ProcessOutput {
            code: output.status.code(),
            stdout,
            stderr,
            duration,
        })
    }
}
