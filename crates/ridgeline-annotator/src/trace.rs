//! Freehand tracing layer.
//!
//! Each canvas carries a stack of brush strokes drawn over the image,
//! independent of the markings and the label space. Strokes live in
//! unrotated image pixels. Every stroke that starts pushes an undo
//! snapshot, so undo removes whole strokes.

use anyhow::{Context, Result};
use ridgeline_core::ImportError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

use crate::model::{Color, Point};
use crate::serialization::{SoftwareInfo, SOFTWARE_NAME};

/// Freehand strokes append every pointer position; line strokes keep two
/// points and move the second.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TracingMode {
    #[default]
    Free,
    Line,
}

/// Brush used for new strokes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brush {
    pub color: Color,
    /// 0..=1, applied to the whole stroke.
    pub opacity: f64,
    /// Stroke width in image pixels.
    pub brush_size: f64,
    pub mode: TracingMode,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            color: Color::rgb(0xff, 0x00, 0x00),
            opacity: 1.0,
            brush_size: 2.0,
            mode: TracingMode::Free,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TracingPath {
    pub id: String,
    pub points: Vec<Point>,
    pub color: Color,
    pub opacity: f64,
    pub brush_size: f64,
}

impl TracingPath {
    fn drawn_with(&self, brush: &Brush) -> bool {
        self.color == brush.color
            && self.opacity == brush.opacity
            && self.brush_size == brush.brush_size
    }
}

/// Strokes of one canvas with snapshot history.
#[derive(Debug, Clone, Default)]
pub struct TracingStore {
    paths: Vec<TracingPath>,
    past: Vec<Vec<TracingPath>>,
    future: Vec<Vec<TracingPath>>,
    /// Stroke following the pointer, if any.
    active: Option<(String, TracingMode)>,
    /// Last line stroke that a new line stroke may continue from.
    chain: Option<String>,
    revision: u64,
}

impl TracingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paths(&self) -> &[TracingPath] {
        &self.paths
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Bumped on every visible change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn is_drawing(&self) -> bool {
        self.active.is_some()
    }

    /// Records the current strokes as an undo step and drops the redo
    /// history.
    pub fn snapshot(&mut self) {
        self.past.push(self.paths.clone());
        self.future.clear();
    }

    pub fn add_path(&mut self, path: TracingPath) {
        self.paths.push(path);
        self.revision += 1;
    }

    /// Starts a stroke at `at`. A line stroke drawn with the same brush
    /// right after another line stroke starts at that stroke's last point.
    pub fn begin_stroke(&mut self, at: Point, brush: &Brush) -> String {
        let start = match brush.mode {
            TracingMode::Line => self
                .paths
                .last()
                .filter(|last| Some(&last.id) == self.chain.as_ref() && last.drawn_with(brush))
                .and_then(|last| last.points.last().copied())
                .unwrap_or(at),
            TracingMode::Free => at,
        };
        let points = match brush.mode {
            TracingMode::Line => vec![start, at],
            TracingMode::Free => vec![at],
        };

        let id = Uuid::new_v4().to_string();
        self.snapshot();
        self.add_path(TracingPath {
            id: id.clone(),
            points,
            color: brush.color,
            opacity: brush.opacity,
            brush_size: brush.brush_size,
        });
        self.active = Some((id.clone(), brush.mode));
        self.chain = Some(id.clone());
        id
    }

    /// Follows the pointer with the active stroke. Returns false when no
    /// stroke is active.
    pub fn extend_stroke(&mut self, to: Point) -> bool {
        let Some((id, mode)) = self.active.clone() else {
            return false;
        };
        let Some(path) = self.paths.iter_mut().find(|p| p.id == id) else {
            self.active = None;
            return false;
        };
        match mode {
            TracingMode::Free => path.points.push(to),
            TracingMode::Line => match path.points.as_mut_slice() {
                [_, .., last] => *last = to,
                _ => return false,
            },
        }
        self.revision += 1;
        true
    }

    /// Releases the pointer. A following line stroke may still continue
    /// from this one.
    pub fn end_stroke(&mut self) {
        self.active = None;
    }

    /// Breaks a chain of line strokes.
    pub fn finish_chain(&mut self) {
        self.chain = None;
    }

    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.past.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.paths, previous);
        self.future.push(current);
        self.active = None;
        self.revision += 1;
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(next) = self.future.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.paths, next);
        self.past.push(current);
        self.active = None;
        self.revision += 1;
        true
    }

    /// Removes every stroke. Undoable.
    pub fn clear_paths(&mut self) {
        self.snapshot();
        self.paths.clear();
        self.active = None;
        self.chain = None;
        self.revision += 1;
    }

    /// Replaces every stroke and forgets the history.
    pub fn load_paths(&mut self, paths: Vec<TracingPath>) {
        self.paths = paths;
        self.past.clear();
        self.future.clear();
        self.active = None;
        self.chain = None;
        self.revision += 1;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TracingMetadata {
    pub software: SoftwareInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TracingData {
    pub paths: Vec<TracingPath>,
}

/// Tracing exchange file for one canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TracingDocument {
    pub metadata: TracingMetadata,
    pub data: TracingData,
}

impl TracingDocument {
    pub fn from_store(store: &TracingStore, version: &str) -> Self {
        Self {
            metadata: TracingMetadata {
                software: SoftwareInfo {
                    name: SOFTWARE_NAME.to_string(),
                    version: version.to_string(),
                },
            },
            data: TracingData {
                paths: store.paths().to_vec(),
            },
        }
    }

    /// Parses a document written by this software.
    pub fn parse(json: &str) -> Result<Self, ImportError> {
        let document: Self = serde_json::from_str(json)?;
        if document.metadata.software.name != SOFTWARE_NAME {
            return Err(ImportError::ForeignSoftware {
                name: document.metadata.software.name,
            });
        }
        Ok(document)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize tracing data")?;
        std::fs::write(path.as_ref(), json).context("Failed to write tracing file")?;
        Ok(())
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read tracing file")?;
        Self::parse(&content).context("Failed to parse tracing file")
    }

    /// Replaces the strokes of `store`.
    pub fn load_into(self, store: &mut TracingStore) {
        tracing::info!("Loading {} tracing paths", self.data.paths.len());
        store.load_paths(self.data.paths);
    }
}
