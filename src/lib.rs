//! # Ridgeline
//!
//! Dual-canvas forensic annotation engine. Two images (typically a latent
//! print and a reference print) are annotated side by side with typed
//! geometric markings that share a single label space.
//!
//! ## Architecture
//!
//! Ridgeline is organized as a workspace with multiple crates:
//!
//! 1. **ridgeline-core** - Shared data types, errors, event bus, units
//! 2. **ridgeline-annotator** - Markings, stores, creation handlers, rendering
//! 3. **ridgeline-tools** - External tool integration (SourceAFIS)
//! 4. **ridgeline-settings** - Engine configuration and persistence
//! 5. **ridgeline** - This crate: logging setup and the command line

pub mod commands;

pub use ridgeline_annotator as annotator;
pub use ridgeline_core as core;
pub use ridgeline_settings as settings;
pub use ridgeline_tools as tools;

pub use ridgeline_annotator::{CanvasRegistry, ExportDocument, MarkingOptions, RenderOptions};
pub use ridgeline_core::{CanvasId, Error, Result, WorkingMode};
pub use ridgeline_settings::Config;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("RIDGELINE_BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support (INFO when unset)
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // stdout is reserved for command output
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

/// Creation thresholds from the `marking` settings.
pub fn marking_options(config: &Config) -> MarkingOptions {
    MarkingOptions {
        min_shape_px: config.marking.min_shape_px,
        min_measurement_px: config.marking.min_measurement_px,
        polygon_close_px: config.marking.polygon_close_px,
        hit_tolerance_px: config.marking.hit_tolerance_px,
    }
}

pub fn render_options(config: &Config) -> RenderOptions {
    RenderOptions {
        show_labels: config.display.show_labels,
        unlabeled_alpha: config.display.unlabeled_alpha,
    }
}
