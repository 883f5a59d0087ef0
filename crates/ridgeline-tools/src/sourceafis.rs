//! SourceAFIS minutiae extraction.
//!
//! The CLI is invoked as
//! `<exe> --image <path> --out-template <path> --out-json <path>`. A run
//! succeeds when the process exits with 0 and both output files exist; the
//! JSON must be an object whose optional `minutiae` field is an array.

use ridgeline_core::MinutiaRecord;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ToolError;
use crate::process::{
    ExecutionPlan, ProcessAdapter, ProcessOutput, ToolStrategy, TokioProcessAdapter,
};

pub const SOURCEAFIS_TIMEOUT_MS: u64 = 30_000;

/// Where to read the image and write the tool's outputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceAfisRequest {
    pub image_path: PathBuf,
    pub out_template_path: PathBuf,
    pub out_json_path: PathBuf,
}

/// Parsed `--out-json` document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceAfisJson {
    #[serde(default)]
    pub minutiae: Option<Vec<MinutiaRecord>>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
}

impl SourceAfisJson {
    pub fn minutiae(&self) -> &[MinutiaRecord] {
        self.minutiae.as_deref().unwrap_or_default()
    }

    /// Image size reported by the tool, when both dimensions are present.
    pub fn image_size(&self) -> Option<(f64, f64)> {
        self.width.zip(self.height)
    }
}

/// Invokes a SourceAFIS CLI executable.
#[derive(Debug, Clone)]
pub struct SourceAfisStrategy {
    executable: PathBuf,
}

impl SourceAfisStrategy {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }
}

impl ToolStrategy<SourceAfisRequest> for SourceAfisStrategy {
    fn build_plan(&self, request: &SourceAfisRequest) -> Result<ExecutionPlan, ToolError> {
        Ok(ExecutionPlan::new(self.executable.display().to_string())
            .arg("--image")
            .arg(request.image_path.display().to_string())
            .arg("--out-template")
            .arg(request.out_template_path.display().to_string())
            .arg("--out-json")
            .arg(request.out_json_path.display().to_string()))
    }
}

/// Strategy used when no executable is known. Every plan fails.
#[derive(Debug, Clone, Default)]
pub struct UnconfiguredStrategy;

impl ToolStrategy<SourceAfisRequest> for UnconfiguredStrategy {
    fn build_plan(&self, _request: &SourceAfisRequest) -> Result<ExecutionPlan, ToolError> {
        Err(ToolError::NotConfigured(format!(
            "no SourceAFIS executable set for {}",
            std::env::consts::OS
        )))
    }
}

/// Reads and checks the tool's JSON output.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonOutputAdapter;

impl JsonOutputAdapter {
    pub async fn read(&self, path: &Path) -> Result<SourceAfisJson, ToolError> {
        if !tokio::fs::try_exists(path).await? {
            return Err(ToolError::MissingJson {
                path: path.to_path_buf(),
            });
        }
        let text = tokio::fs::read_to_string(path).await?;
        tracing::debug!("JSON output: {} bytes", text.len());
        Self::parse(&text, path)
    }

    /// Checks the layout of `text` read from `path`.
    pub fn parse(text: &str, path: &Path) -> Result<SourceAfisJson, ToolError> {
        let root: serde_json::Value =
            serde_json::from_str(text).map_err(|source| ToolError::MalformedJson {
                path: path.to_path_buf(),
                source,
            })?;
        let Some(object) = root.as_object() else {
            return Err(ToolError::WrongJsonShape("root is not an object".into()));
        };
        if let Some(minutiae) = object.get("minutiae") {
            if !minutiae.is_array() && !minutiae.is_null() {
                return Err(ToolError::WrongJsonShape(
                    "field \"minutiae\" is not an array".into(),
                ));
            }
        }
        serde_json::from_value(root).map_err(|err| ToolError::WrongJsonShape(err.to_string()))
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceAfisRun {
    pub process: ProcessOutput,
    pub json: SourceAfisJson,
}

/// The SourceAFIS tool: strategy, process adapter and output reader.
pub struct SourceAfisTool<A = TokioProcessAdapter> {
    strategy: Box<dyn ToolStrategy<SourceAfisRequest>>,
    adapter: A,
    json: JsonOutputAdapter,
    timeout: Duration,
}

impl SourceAfisTool<TokioProcessAdapter> {
    /// Real-process tool. Without an executable every run fails with
    /// [`ToolError::NotConfigured`].
    pub fn from_executable(executable: Option<PathBuf>, timeout: Duration) -> Self {
        let strategy: Box<dyn ToolStrategy<SourceAfisRequest>> = match executable {
            Some(path) => Box::new(SourceAfisStrategy::new(path)),
            None => Box::new(UnconfiguredStrategy),
        };
        Self::new(strategy, TokioProcessAdapter, timeout)
    }
}

impl<A: ProcessAdapter> SourceAfisTool<A> {
    pub fn new(
        strategy: Box<dyn ToolStrategy<SourceAfisRequest>>,
        adapter: A,
        timeout: Duration,
    ) -> Self {
        Self {
            strategy,
            adapter,
            json: JsonOutputAdapter,
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn run(&self, request: &SourceAfisRequest) -> Result<SourceAfisRun, ToolError> {
        let plan = self.strategy.build_plan(request)?;
        let process = self.adapter.execute(&plan, self.timeout).await?;
        if !process.success() {
            tracing::error!("{} exited with {:?}", plan.command, process.code);
            return Err(ToolError::NonZeroExit {
                command: plan.command,
                code: process.code,
                stderr: process.stderr,
            });
        }
        if !tokio::fs::try_exists(&request.out_template_path).await? {
            return Err(ToolError::MissingTemplate {
                path: request.out_template_path.clone(),
            });
        }
        let json = self.json.read(&request.out_json_path).await?;
        tracing::info!("SourceAFIS reported {} minutiae", json.minutiae().len());
        Ok(SourceAfisRun { process, json })
    }
}

impl<A> std::fmt::Debug for SourceAfisTool<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceAfisTool")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
