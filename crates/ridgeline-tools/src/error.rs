//! External tool errors.

use std::path::PathBuf;
use thiserror::Error;

/// Failures of an external tool run. Every variant leaves the annotation
/// state untouched.
#[derive(Error, Debug)]
pub enum ToolError {
    /// No executable is available for the tool on this machine
    #[error("External tool not configured: {0}")]
    NotConfigured(String),

    /// The process could not be started
    #[error("Failed to start {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The process outlived its time budget and was killed
    #[error("{command} timed out after {timeout_ms} ms")]
    Timeout { command: String, timeout_ms: u64 },

    /// The process exited unsuccessfully
    #[error("{command} failed with {}: {stderr}", exit_description(.code))]
    NonZeroExit {
        command: String,
        /// `None` when the process was terminated by a signal.
        code: Option<i32>,
        stderr: String,
    },

    #[error("Output template missing: {}", .path.display())]
    MissingTemplate { path: PathBuf },

    #[error("Output JSON missing: {}", .path.display())]
    MissingJson { path: PathBuf },

    #[error("Output JSON {} failed to parse: {source}", .path.display())]
    MalformedJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The JSON parsed but does not have the expected layout
    #[error("Unexpected output JSON: {0}")]
    WrongJsonShape(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "a signal".to_string(),
    }
}
