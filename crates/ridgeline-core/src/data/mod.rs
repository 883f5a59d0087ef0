//! Data models for Ridgeline
//!
//! Plain value types shared by the annotation engine and the external
//! tool layer: image-space points, canvas identities, working modes and
//! minutia records.

mod minutia;

pub use minutia::{MinutiaKind, MinutiaRecord};

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 2D point.
///
/// Inside stores this is always an unrotated image-pixel coordinate; the
/// renderer projects copies of it into viewport space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Creates a new point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Component-wise translation.
    pub fn offset(&self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }

    /// Both coordinates are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

/// Identity of one of the side-by-side canvases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CanvasId {
    Left,
    Right,
}

impl CanvasId {
    /// Both canvases in display order.
    pub const ALL: [CanvasId; 2] = [CanvasId::Left, CanvasId::Right];

    /// The mirror canvas.
    pub fn opposite(self) -> CanvasId {
        match self {
            CanvasId::Left => CanvasId::Right,
            CanvasId::Right => CanvasId::Left,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CanvasId::Left => "left",
            CanvasId::Right => "right",
        }
    }
}

impl fmt::Display for CanvasId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CanvasId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(CanvasId::Left),
            "right" => Ok(CanvasId::Right),
            other => Err(format!("Unknown canvas '{}'", other)),
        }
    }
}

/// Evidence category the session is working on. Marking types are grouped
/// by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkingMode {
    #[default]
    Fingerprint,
    Ear,
    Shoeprint,
}

impl WorkingMode {
    pub fn as_str(self) -> &'static str {
        match self {
            WorkingMode::Fingerprint => "fingerprint",
            WorkingMode::Ear => "ear",
            WorkingMode::Shoeprint => "shoeprint",
        }
    }
}

impl fmt::Display for WorkingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
