//! # Ridgeline Annotator
//!
//! Dual-canvas annotation engine. Two images are annotated side by side
//! with typed geometric markings that share one label space.
//!
//! - [`model`]: the marking union, marking types and geometry helpers
//! - [`store`] and [`registry`]: per-canvas state and the canvas registry
//! - [`handlers`]: pointer-driven creation state machines and the session
//! - [`render`]: the frame pipeline over a [`render::DrawSurface`]
//! - [`info`]: the cross-canvas information table
//! - [`trace`]: the freehand tracing layer drawn over each image
//! - [`serialization`], [`minutiae`], [`calibration`]: exchange formats,
//!   detector import and ruler calibration

pub mod calibration;
pub mod handlers;
pub mod info;
pub mod labels;
pub mod marking_types;
pub mod minutiae;
pub mod model;
pub mod overlay;
pub mod registry;
pub mod render;
pub mod selection;
pub mod serialization;
pub mod store;
pub mod trace;
pub mod viewport;

pub use handlers::{
    HandlerOutcome, MarkingHandler, MarkingOptions, MarkingSession, PointerButton, PointerEvent,
    Tool,
};
pub use info::{merged_rows, InfoRow};
pub use labels::LabelGenerator;
pub use marking_types::MarkingTypes;
pub use model::{
    default_fingerprint_types, Color, Marking, MarkingClass, MarkingPatch, MarkingShape,
    MarkingType, Point, MEASUREMENT_TOOL_TYPE_ID,
};
pub use registry::{Canvas, CanvasRegistry};
pub use render::{render_frame, FrameInput, RenderOptions, Renderer};
pub use serialization::ExportDocument;
pub use store::MarkingsStore;
pub use trace::{Brush, TracingDocument, TracingMode, TracingPath, TracingStore};
pub use viewport::CanvasViewport;
