use serde::{Deserialize, Serialize};

/// One minutia reported by the external detector.
///
/// `direction` is in radians in the detector's convention; the annotation
/// engine converts it when building ray markings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinutiaRecord {
    pub x: f64,
    pub y: f64,
    pub direction: f64,
    #[serde(rename = "type")]
    pub kind: String,
}

impl MinutiaRecord {
    pub fn new(x: f64, y: f64, direction: f64, kind: impl Into<String>) -> Self {
        Self {
            x,
            y,
            direction,
            kind: kind.into(),
        }
    }

    /// Classified kind of this minutia.
    pub fn minutia_kind(&self) -> MinutiaKind {
        MinutiaKind::parse(&self.kind)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.direction.is_finite()
    }
}

/// Minutia categories the detector distinguishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MinutiaKind {
    Ending,
    Bifurcation,
    Other(String),
}

impl MinutiaKind {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "ending" | "ridge_ending" | "ridge-ending" => MinutiaKind::Ending,
            "bifurcation" => MinutiaKind::Bifurcation,
            _ => MinutiaKind::Other(raw.to_string()),
        }
    }
}
