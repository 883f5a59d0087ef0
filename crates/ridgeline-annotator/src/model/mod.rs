//! Marking data model.
//!
//! A marking is a labelled, typed geometric annotation. Variant-specific
//! geometry lives in the closed [`MarkingShape`] union; everything the
//! engine does with a marking dispatches on it with a `match`.

mod geometry;
mod line;
mod marking_type;

pub use geometry::{rotate_about, ViewportRatios};
pub use line::{distance_to_segment, formatted_distance_px};
pub use marking_type::{
    default_fingerprint_types, measurement_tool_type, Color, MarkingType, MarkingTypePatch,
    MEASUREMENT_TOOL_TYPE_ID,
};
pub use ridgeline_core::Point;

use ridgeline_core::GeometryError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Discriminator of the marking variants, as written in exchange files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkingClass {
    Point,
    Ray,
    LineSegment,
    BoundingBox,
    Polygon,
    Rectangle,
    Measurement,
}

impl MarkingClass {
    pub const ALL: [MarkingClass; 7] = [
        MarkingClass::Point,
        MarkingClass::Ray,
        MarkingClass::LineSegment,
        MarkingClass::BoundingBox,
        MarkingClass::Polygon,
        MarkingClass::Rectangle,
        MarkingClass::Measurement,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MarkingClass::Point => "point",
            MarkingClass::Ray => "ray",
            MarkingClass::LineSegment => "line_segment",
            MarkingClass::BoundingBox => "bounding_box",
            MarkingClass::Polygon => "polygon",
            MarkingClass::Rectangle => "rectangle",
            MarkingClass::Measurement => "measurement",
        }
    }
}

impl fmt::Display for MarkingClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Variant geometry. All points are unrotated image pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkingShape {
    Point,
    Ray { angle_rad: f64 },
    LineSegment { endpoint: Point },
    Measurement { endpoint: Point },
    /// `endpoint` is the corner opposite the marking origin.
    BoundingBox { endpoint: Point },
    Polygon { points: Vec<Point> },
    Rectangle { points: Vec<Point> },
}

impl MarkingShape {
    pub fn class(&self) -> MarkingClass {
        match self {
            MarkingShape::Point => MarkingClass::Point,
            MarkingShape::Ray { .. } => MarkingClass::Ray,
            MarkingShape::LineSegment { .. } => MarkingClass::LineSegment,
            MarkingShape::Measurement { .. } => MarkingClass::Measurement,
            MarkingShape::BoundingBox { .. } => MarkingClass::BoundingBox,
            MarkingShape::Polygon { .. } => MarkingClass::Polygon,
            MarkingShape::Rectangle { .. } => MarkingClass::Rectangle,
        }
    }

    /// Zero-sized geometry of the given class anchored at `at`.
    pub fn seed(class: MarkingClass, at: Point) -> MarkingShape {
        match class {
            MarkingClass::Point => MarkingShape::Point,
            MarkingClass::Ray => MarkingShape::Ray { angle_rad: 0.0 },
            MarkingClass::LineSegment => MarkingShape::LineSegment { endpoint: at },
            MarkingClass::Measurement => MarkingShape::Measurement { endpoint: at },
            MarkingClass::BoundingBox => MarkingShape::BoundingBox { endpoint: at },
            MarkingClass::Polygon => MarkingShape::Polygon {
                points: vec![at, at],
            },
            MarkingClass::Rectangle => MarkingShape::Rectangle {
                points: vec![at; 4],
            },
        }
    }
}

/// Shallow partial update applied to the temporary marking.
///
/// Fields that do not apply to the marking's variant are ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkingPatch {
    pub origin: Option<Point>,
    pub endpoint: Option<Point>,
    pub angle_rad: Option<f64>,
    pub points: Option<Vec<Point>>,
    pub type_id: Option<String>,
}

impl MarkingPatch {
    pub fn origin(origin: Point) -> Self {
        Self {
            origin: Some(origin),
            ..Default::default()
        }
    }

    pub fn endpoint(endpoint: Point) -> Self {
        Self {
            endpoint: Some(endpoint),
            ..Default::default()
        }
    }

    pub fn angle(angle_rad: f64) -> Self {
        Self {
            angle_rad: Some(angle_rad),
            ..Default::default()
        }
    }

    pub fn points(points: Vec<Point>) -> Self {
        Self {
            points: Some(points),
            ..Default::default()
        }
    }

    pub fn with_endpoint(mut self, endpoint: Point) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == MarkingPatch::default()
    }
}

/// A labelled, typed annotation on one canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct Marking {
    pub label: u32,
    /// Opaque provenance identifiers. Preserved verbatim across export/import.
    pub ids: Vec<String>,
    pub type_id: String,
    pub origin: Point,
    pub shape: MarkingShape,
}

impl Marking {
    /// New marking with a freshly generated identifier.
    pub fn new(label: u32, type_id: impl Into<String>, origin: Point, shape: MarkingShape) -> Self {
        Self {
            label,
            ids: vec![Uuid::new_v4().to_string()],
            type_id: type_id.into(),
            origin,
            shape,
        }
    }

    pub fn with_ids(mut self, ids: Vec<String>) -> Self {
        self.ids = ids;
        self
    }

    pub fn class(&self) -> MarkingClass {
        self.shape.class()
    }

    pub fn endpoint(&self) -> Option<Point> {
        match &self.shape {
            MarkingShape::LineSegment { endpoint }
            | MarkingShape::Measurement { endpoint }
            | MarkingShape::BoundingBox { endpoint } => Some(*endpoint),
            _ => None,
        }
    }

    pub fn angle_rad(&self) -> Option<f64> {
        match &self.shape {
            MarkingShape::Ray { angle_rad } => Some(*angle_rad),
            _ => None,
        }
    }

    pub fn points(&self) -> Option<&[Point]> {
        match &self.shape {
            MarkingShape::Polygon { points } | MarkingShape::Rectangle { points } => Some(points),
            _ => None,
        }
    }

    /// Image-space length of line-like markings.
    pub fn distance_px(&self) -> Option<f64> {
        match &self.shape {
            MarkingShape::LineSegment { endpoint } | MarkingShape::Measurement { endpoint } => {
                Some(self.origin.distance_to(endpoint))
            }
            _ => None,
        }
    }

    /// Applies a shallow partial update in place.
    pub fn apply(&mut self, patch: &MarkingPatch) {
        if let Some(origin) = patch.origin {
            self.origin = origin;
        }
        if let Some(type_id) = &patch.type_id {
            self.type_id = type_id.clone();
        }
        match &mut self.shape {
            MarkingShape::Point => {}
            MarkingShape::Ray { angle_rad } => {
                if let Some(angle) = patch.angle_rad {
                    *angle_rad = angle;
                }
            }
            MarkingShape::LineSegment { endpoint }
            | MarkingShape::Measurement { endpoint }
            | MarkingShape::BoundingBox { endpoint } => {
                if let Some(p) = patch.endpoint {
                    *endpoint = p;
                }
            }
            MarkingShape::Polygon { points } | MarkingShape::Rectangle { points } => {
                if let Some(new_points) = &patch.points {
                    *points = new_points.clone();
                }
            }
        }
    }

    /// Every image-space point that defines the marking, origin first.
    pub fn anchor_points(&self) -> Vec<Point> {
        let mut anchors = vec![self.origin];
        match &self.shape {
            MarkingShape::Point | MarkingShape::Ray { .. } => {}
            MarkingShape::LineSegment { endpoint }
            | MarkingShape::Measurement { endpoint }
            | MarkingShape::BoundingBox { endpoint } => anchors.push(*endpoint),
            MarkingShape::Polygon { points } | MarkingShape::Rectangle { points } => {
                anchors.extend(points.iter().copied())
            }
        }
        anchors
    }

    /// Rejects NaN and infinite coordinates.
    pub fn check_finite(&self) -> Result<(), GeometryError> {
        if !self.origin.is_finite() {
            return Err(non_finite("origin"));
        }
        match &self.shape {
            MarkingShape::Ray { angle_rad } if !angle_rad.is_finite() => {
                Err(non_finite("angleRad"))
            }
            MarkingShape::LineSegment { endpoint }
            | MarkingShape::Measurement { endpoint }
            | MarkingShape::BoundingBox { endpoint }
                if !endpoint.is_finite() =>
            {
                Err(non_finite("endpoint"))
            }
            MarkingShape::Polygon { points } | MarkingShape::Rectangle { points }
                if points.iter().any(|p| !p.is_finite()) =>
            {
                Err(non_finite("points"))
            }
            _ => Ok(()),
        }
    }

    /// Rejects anchors outside a `width` x `height` image. Points on the
    /// border are inside.
    pub fn check_inside(&self, width: f64, height: f64) -> Result<(), GeometryError> {
        let outside = self.anchor_points().into_iter().find(|p| {
            !(0.0..=width).contains(&p.x) || !(0.0..=height).contains(&p.y)
        });
        match outside {
            Some(p) => Err(GeometryError::OutOfImage {
                x: p.x,
                y: p.y,
                width: width as u32,
                height: height as u32,
            }),
            None => Ok(()),
        }
    }

    /// Checks that the shape is large enough to keep.
    ///
    /// Points and rays are never degenerate. Line-like shapes need a length
    /// of at least `min_px`, boxes and rectangles need both extents of at
    /// least `min_px`, polygons need two distinct vertices.
    pub fn check_extent(&self, min_px: f64) -> Result<(), GeometryError> {
        let class = self.class();
        let degenerate = |reason: String| GeometryError::Degenerate {
            shape: class.to_string(),
            reason,
        };
        match &self.shape {
            MarkingShape::Point | MarkingShape::Ray { .. } => Ok(()),
            MarkingShape::LineSegment { endpoint } | MarkingShape::Measurement { endpoint } => {
                let length = self.origin.distance_to(endpoint);
                if length < min_px {
                    Err(degenerate(format!("length {:.2} px", length)))
                } else {
                    Ok(())
                }
            }
            MarkingShape::BoundingBox { endpoint } => {
                let w = (endpoint.x - self.origin.x).abs();
                let h = (endpoint.y - self.origin.y).abs();
                if w < min_px || h < min_px {
                    Err(degenerate(format!("{:.2} x {:.2} px", w, h)))
                } else {
                    Ok(())
                }
            }
            MarkingShape::Rectangle { points } => {
                let (w, h) = extent(points);
                if w < min_px || h < min_px {
                    Err(degenerate(format!("{:.2} x {:.2} px", w, h)))
                } else {
                    Ok(())
                }
            }
            MarkingShape::Polygon { points } => {
                let distinct = points
                    .iter()
                    .enumerate()
                    .any(|(i, p)| points[..i].iter().any(|q| q.distance_to(p) >= min_px));
                if points.len() < 2 || !distinct {
                    Err(degenerate(format!("{} vertices", points.len())))
                } else {
                    Ok(())
                }
            }
        }
    }
}

fn non_finite(field: &str) -> GeometryError {
    GeometryError::NonFinite {
        field: field.to_string(),
    }
}

fn extent(points: &[Point]) -> (f64, f64) {
    let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
    let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    if points.is_empty() {
        (0.0, 0.0)
    } else {
        (max_x - min_x, max_y - min_y)
    }
}
