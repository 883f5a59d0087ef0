//! Marking exchange files.
//!
//! One document holds the markings of one canvas plus metadata about both
//! images and the marking types in use. Import validates the entire
//! document before any store is touched, so a rejected file leaves the
//! session exactly as it was.

use anyhow::{Context, Result};
use ridgeline_core::{CanvasId, ImportError, WorkingMode};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::model::{Marking, MarkingClass, MarkingShape, Point};
use crate::registry::CanvasRegistry;

pub const SOFTWARE_NAME: &str = "ridgeline";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoftwareInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

/// Identity of an image a document was made against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageInfo {
    pub name: Option<String>,
    pub path: Option<String>,
    pub sha256: String,
    pub size: ImageSize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub software: SoftwareInfo,
    #[serde(default)]
    pub image: Option<ImageInfo>,
    #[serde(default)]
    pub compared_image: Option<ImageInfo>,
    #[serde(rename = "workingMode")]
    pub working_mode: WorkingMode,
    #[serde(default)]
    pub types: Vec<TypeRef>,
}

/// One marking on the wire. Variant fields are present only for the
/// classes that use them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkingRecord {
    #[serde(default)]
    pub ids: Vec<String>,
    pub marking_class: MarkingClass,
    pub origin: Point,
    pub type_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle_rad: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<Point>>,
}

impl MarkingRecord {
    pub fn from_marking(marking: &Marking) -> Self {
        Self {
            ids: marking.ids.clone(),
            marking_class: marking.class(),
            origin: marking.origin,
            type_id: marking.type_id.clone(),
            angle_rad: marking.angle_rad(),
            endpoint: marking.endpoint(),
            points: marking.points().map(<[Point]>::to_vec),
        }
    }

    /// Rebuilds the shape, reporting the first missing variant field.
    fn to_shape(&self, index: usize) -> Result<MarkingShape, ImportError> {
        let missing = |field: &str| ImportError::MissingField {
            index,
            class: self.marking_class.to_string(),
            field: field.to_string(),
        };
        let endpoint = || self.endpoint.ok_or_else(|| missing("endpoint"));
        let points = || self.points.clone().ok_or_else(|| missing("points"));

        Ok(match self.marking_class {
            MarkingClass::Point => MarkingShape::Point,
            MarkingClass::Ray => MarkingShape::Ray {
                angle_rad: self.angle_rad.ok_or_else(|| missing("angleRad"))?,
            },
            MarkingClass::LineSegment => MarkingShape::LineSegment {
                endpoint: endpoint()?,
            },
            MarkingClass::Measurement => MarkingShape::Measurement {
                endpoint: endpoint()?,
            },
            MarkingClass::BoundingBox => MarkingShape::BoundingBox {
                endpoint: endpoint()?,
            },
            MarkingClass::Polygon => MarkingShape::Polygon { points: points()? },
            MarkingClass::Rectangle => MarkingShape::Rectangle { points: points()? },
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportData {
    pub markings: Vec<MarkingRecord>,
}

/// A complete marking exchange document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub metadata: ExportMetadata,
    pub data: ExportData,
}

impl ExportDocument {
    /// Snapshot of `canvas`. The type list covers types used on either
    /// canvas.
    pub fn from_registry(registry: &CanvasRegistry, canvas: CanvasId, version: &str) -> Self {
        let types = registry
            .types_in_use()
            .into_iter()
            .map(|t| TypeRef {
                id: t.id.clone(),
                name: t.name.clone(),
            })
            .collect();
        let markings = registry
            .store(canvas)
            .markings()
            .iter()
            .map(MarkingRecord::from_marking)
            .collect();

        Self {
            metadata: ExportMetadata {
                software: SoftwareInfo {
                    name: SOFTWARE_NAME.to_string(),
                    version: version.to_string(),
                },
                image: None,
                compared_image: None,
                working_mode: registry.working_mode(),
                types,
            },
            data: ExportData { markings },
        }
    }

    pub fn with_images(mut self, image: Option<ImageInfo>, compared_image: Option<ImageInfo>) -> Self {
        self.metadata.image = image;
        self.metadata.compared_image = compared_image;
        self
    }

    pub fn parse(json: &str) -> Result<Self, ImportError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize markings")
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = self.to_json_pretty()?;
        std::fs::write(path.as_ref(), json).context("Failed to write markings file")?;
        Ok(())
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read markings file")?;
        Self::parse(&content).context("Failed to parse markings file")
    }

    /// Checks the whole document against the session and returns the
    /// markings it describes, with label 0 as a placeholder.
    pub fn validate(&self, registry: &CanvasRegistry) -> Result<Vec<Marking>, ImportError> {
        let expected = registry.working_mode();
        if self.metadata.working_mode != expected {
            return Err(ImportError::WorkingModeMismatch {
                expected: expected.to_string(),
                found: self.metadata.working_mode.to_string(),
            });
        }

        self.data
            .markings
            .iter()
            .enumerate()
            .map(|(index, record)| {
                if !registry.types().is_known(&record.type_id) {
                    return Err(ImportError::UnknownType {
                        index,
                        type_id: record.type_id.clone(),
                    });
                }
                let shape = record.to_shape(index)?;
                let mut marking = Marking::new(0, record.type_id.clone(), record.origin, shape);
                if !record.ids.is_empty() {
                    marking = marking.with_ids(record.ids.clone());
                }
                marking
                    .check_finite()
                    .map_err(|source| ImportError::Geometry { index, source })?;
                Ok(marking)
            })
            .collect()
    }

    /// Adds every marking to `canvas` with fresh labels in one batch.
    /// Returns the assigned labels. Nothing changes on error.
    pub fn import_into(
        &self,
        registry: &mut CanvasRegistry,
        canvas: CanvasId,
    ) -> Result<Vec<u32>, ImportError> {
        let mut markings = self.validate(registry)?;
        for marking in &mut markings {
            marking.label = registry.next_label();
        }
        let labels: Vec<u32> = markings.iter().map(|m| m.label).collect();
        tracing::info!("Importing {} markings into {} canvas", labels.len(), canvas);
        registry.store_mut(canvas).add_many(markings);
        Ok(labels)
    }
}
