//! Command implementations behind the `ridgeline` binary.

use anyhow::{anyhow, Context, Result};
use ridgeline_annotator::calibration::{
    calibration_from_ruler, dpi_scale_factor, RulerReading, DEFAULT_TARGET_DPI,
};
use ridgeline_annotator::model::{default_fingerprint_types, Color, Point};
use ridgeline_annotator::render::PixmapSurface;
use ridgeline_annotator::{
    render_frame, CanvasRegistry, ExportDocument, FrameInput, RenderOptions, TracingDocument,
};
use ridgeline_core::CanvasId;
use ridgeline_settings::Config;
use ridgeline_tools::{auto_mark, AutoMarkReport, SourceAfisTool};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::VERSION;

const BACKGROUND: Color = Color::rgb(255, 255, 255);

/// Parses `x,y` into a point.
pub fn parse_point(value: &str) -> std::result::Result<Point, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected x,y but got '{}'", value))?;
    let coord = |s: &str| {
        s.trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| format!("invalid coordinate '{}'", s.trim()))
    };
    Ok(Point::new(coord(x)?, coord(y)?))
}

/// View transform applied when rendering offline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    pub rotation: f64,
    pub zoom: f64,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            rotation: 0.0,
            zoom: 1.0,
        }
    }
}

/// Draws the markings of `document`, and the strokes of `traces` if given,
/// over a blank `width` x `height` image.
pub fn render_document(
    document: &ExportDocument,
    traces: Option<TracingDocument>,
    width: u32,
    height: u32,
    view: RenderView,
    options: RenderOptions,
) -> Result<PixmapSurface> {
    let mut registry = CanvasRegistry::new(document.metadata.working_mode)
        .with_types(default_fingerprint_types());
    document
        .import_into(&mut registry, CanvasId::Left)
        .context("Markings do not fit the default type set")?;

    let canvas = registry.canvas_mut(CanvasId::Left);
    if let Some(traces) = traces {
        canvas.edit_traces(|store| traces.load_into(store));
    }
    canvas
        .viewport
        .set_image_size(f64::from(width), f64::from(height));
    canvas
        .viewport
        .set_screen_size(f64::from(width), f64::from(height));
    canvas.set_rotation(view.rotation);
    canvas.set_zoom(view.zoom);

    let mut surface = PixmapSurface::new(width, height, BACKGROUND)
        .ok_or_else(|| anyhow!("Cannot create a {}x{} surface", width, height))?;
    let input = FrameInput::from_canvas(
        registry.canvas(CanvasId::Left),
        registry.types(),
        options,
    );
    let painted = render_frame(&mut surface, &input);
    tracing::info!("Rendered {} markings at {}x{}", painted, width, height);
    Ok(surface)
}

/// Loads `path` (and the tracing file, if any) and renders it to a PNG at
/// `out`.
pub fn render_file(
    path: &Path,
    tracing: Option<&Path>,
    out: &Path,
    width: u32,
    height: u32,
    view: RenderView,
    options: RenderOptions,
) -> Result<()> {
    let document = ExportDocument::load_from_file(path)?;
    let traces = tracing.map(TracingDocument::load_from_file).transpose()?;
    let surface = render_document(&document, traces, width, height, view, options)?;
    surface.save_png(out)
}

/// Reads a ruler line on the image at `path`.
pub fn calibrate_image(
    path: &Path,
    from: Point,
    to: Point,
    min_distance: usize,
) -> Result<RulerReading> {
    let image = image::open(path)
        .with_context(|| format!("Failed to open image {}", path.display()))?
        .to_rgb8();
    calibration_from_ruler(&image, from, to, min_distance)
        .ok_or_else(|| anyhow!("Fewer than two ruler ticks found along the line"))
}

/// Human-readable summary of a ruler reading.
pub fn describe_reading(reading: &RulerReading) -> String {
    let mut text = format!(
        "ticks: {}\npixels/mm: {:.4}\ndpi: {:.1}",
        reading.peaks.len(),
        reading.pixels_per_mm,
        reading.dpi()
    );
    if let Some(factor) = dpi_scale_factor(&reading.peaks, DEFAULT_TARGET_DPI) {
        text.push_str(&format!(
            "\nscale to {} dpi: {:.4}",
            DEFAULT_TARGET_DPI, factor
        ));
    }
    text
}

/// Writes the default fingerprint type set as JSON.
pub fn write_default_types(out: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&default_fingerprint_types())
        .context("Failed to serialize marking types")?;
    std::fs::write(out, json)
        .with_context(|| format!("Failed to write {}", out.display()))?;
    Ok(())
}

/// Overrides for the configured detector.
#[derive(Debug, Clone, Default)]
pub struct AutoMarkArgs {
    pub executable: Option<PathBuf>,
    pub timeout_ms: Option<u64>,
}

/// Runs the detector on `image` and returns the resulting document along
/// with the run report.
pub async fn automark_image(
    config: &Config,
    args: &AutoMarkArgs,
    image: &Path,
    image_size: (u32, u32),
) -> Result<(ExportDocument, AutoMarkReport)> {
    let executable = args
        .executable
        .clone()
        .or_else(|| config.tools.sourceafis_path.clone());
    let timeout = Duration::from_millis(args.timeout_ms.unwrap_or(config.tools.timeout_ms));
    let tool = SourceAfisTool::from_executable(executable, timeout);

    let mut registry =
        CanvasRegistry::new(config.marking.working_mode).with_types(default_fingerprint_types());
    let size = (f64::from(image_size.0), f64::from(image_size.1));
    let report = auto_mark(
        &tool,
        &mut registry,
        CanvasId::Left,
        image,
        Some(size),
        &config.tools.temp_dir(),
    )
    .await?;

    let document = ExportDocument::from_registry(&registry, CanvasId::Left, VERSION);
    Ok((document, report))
}
