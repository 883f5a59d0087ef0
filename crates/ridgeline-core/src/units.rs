//! Measurement units and per-canvas calibration.
//!
//! Distances are always computed in image pixels; a calibration only changes
//! how they are displayed.

use serde::{Deserialize, Serialize};

/// Unit string meaning "no calibration".
pub const PIXEL_UNIT: &str = "px";

/// Pixel-to-physical-unit scale of one canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Calibration {
    pub unit: String,
    pub pixels_per_unit: f64,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            unit: PIXEL_UNIT.to_string(),
            pixels_per_unit: 1.0,
        }
    }
}

impl Calibration {
    pub fn new(unit: impl Into<String>, pixels_per_unit: f64) -> Self {
        Self {
            unit: unit.into(),
            pixels_per_unit,
        }
    }

    /// True when distances should be shown in a physical unit.
    pub fn is_calibrated(&self) -> bool {
        self.unit != PIXEL_UNIT && self.pixels_per_unit > 0.0
    }

    /// Formats an image-space distance for display.
    ///
    /// ```
    /// use ridgeline_core::units::Calibration;
    /// assert_eq!(Calibration::default().format_distance(10.0), "10.00 px");
    /// assert_eq!(Calibration::new("mm", 2.0).format_distance(40.0), "20.00 mm");
    /// ```
    pub fn format_distance(&self, distance_px: f64) -> String {
        if self.is_calibrated() {
            format!("{:.2} {}", distance_px / self.pixels_per_unit, self.unit)
        } else {
            format!("{:.2} {}", distance_px, PIXEL_UNIT)
        }
    }
}
