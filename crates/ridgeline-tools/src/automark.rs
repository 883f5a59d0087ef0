//! Detector-driven auto-marking of a canvas.

use ridgeline_annotator::minutiae::auto_mark_minutiae;
use ridgeline_annotator::CanvasRegistry;
use ridgeline_core::CanvasId;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ToolError;
use crate::process::ProcessAdapter;
use crate::sourceafis::{SourceAfisRequest, SourceAfisTool};

/// Summary of one auto-mark run.
#[derive(Debug, Clone, PartialEq)]
pub struct AutoMarkReport {
    /// Labels of the markings that were added.
    pub labels: Vec<u32>,
    /// Minutiae reported by the detector, including skipped ones.
    pub detected: usize,
    pub duration: Duration,
}

/// Temp output paths `sourceafis_<millis>.dat` and `.json` under `dir`.
pub fn temp_output_paths(dir: &Path, stamp_millis: i64) -> (PathBuf, PathBuf) {
    (
        dir.join(format!("sourceafis_{}.dat", stamp_millis)),
        dir.join(format!("sourceafis_{}.json", stamp_millis)),
    )
}

/// Runs the detector on `image_path` and adds one ray per usable minutia
/// to `canvas` in a single batch.
///
/// Tool outputs go to `temp_dir` and are removed afterwards. On any error
/// the registry is left unchanged.
pub async fn auto_mark<A: ProcessAdapter>(
    tool: &SourceAfisTool<A>,
    registry: &mut CanvasRegistry,
    canvas: CanvasId,
    image_path: &Path,
    image_size: Option<(f64, f64)>,
    temp_dir: &Path,
) -> Result<AutoMarkReport, ToolError> {
    let (out_template_path, out_json_path) =
        temp_output_paths(temp_dir, chrono::Utc::now().timestamp_millis());
    let request = SourceAfisRequest {
        image_path: image_path.to_path_buf(),
        out_template_path,
        out_json_path,
    };

    let result = tool.run(&request).await;
    remove_outputs(&request).await;
    let run = result?;

    if let (Some((w, h)), Some((tool_w, tool_h))) = (image_size, run.json.image_size()) {
        if (w, h) != (tool_w, tool_h) {
            tracing::warn!(
                "Detector saw a {}x{} image, canvas image is {}x{}",
                tool_w,
                tool_h,
                w,
                h
            );
        }
    }

    let minutiae = run.json.minutiae();
    let labels = auto_mark_minutiae(registry, canvas, minutiae, image_size);
    Ok(AutoMarkReport {
        labels,
        detected: minutiae.len(),
        duration: run.process.duration,
    })
}

async fn remove_outputs(request: &SourceAfisRequest) {
    for path in [&request.out_template_path, &request.out_json_path] {
        match tokio::fs::remove_file(path).await {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => tracing::debug!("Could not remove {}: {}", path.display(), err),
        }
    }
}
