//! # Ridgeline Tools
//!
//! External tool integration. Tools are described by a strategy that
//! builds the command line and run through a [`ProcessAdapter`]; the
//! SourceAFIS minutiae detector is the one tool shipped today.

pub mod automark;
pub mod error;
pub mod process;
pub mod sourceafis;

pub use automark::{auto_mark, temp_output_paths, AutoMarkReport};
pub use error::ToolError;
pub use process::{
    truncate_log_text, ExecutionPlan, ProcessAdapter, ProcessOutput, TokioProcessAdapter,
    ToolStrategy,
};
pub use sourceafis::{
    JsonOutputAdapter, SourceAfisJson, SourceAfisRequest, SourceAfisRun, SourceAfisStrategy,
    SourceAfisTool, UnconfiguredStrategy, SOURCEAFIS_TIMEOUT_MS,
};
