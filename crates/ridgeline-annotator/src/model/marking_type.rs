use ridgeline_core::WorkingMode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::MarkingClass;
use crate::minutiae::{BIFURCATION_TYPE_ID, RIDGE_ENDING_TYPE_ID};

/// Id of the synthetic type used by the measurement tool. Never persisted
/// in the type registry.
pub const MEASUREMENT_TOOL_TYPE_ID: &str = "__measurement__";

/// RGBA colour, written as `#rrggbb` or `#rrggbbaa`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same colour with its alpha multiplied by `factor` (0..=1).
    pub fn with_alpha(self, factor: f64) -> Self {
        let a = (self.a as f64 * factor.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| format!("Invalid colour '{}'", s))
        };
        match hex.len() {
            6 if hex.is_ascii() => Ok(Color::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 if hex.is_ascii() => Ok(Color::rgba(
                channel(0)?,
                channel(2)?,
                channel(4)?,
                channel(6)?,
            )),
            _ => Err(format!("Invalid colour '{}'", s)),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

/// Operator-defined category of markings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkingType {
    pub id: String,
    pub name: String,
    pub display_name: String,
    pub marking_class: MarkingClass,
    pub background_color: Color,
    pub text_color: Color,
    pub size: f64,
    pub category: WorkingMode,
}

impl MarkingType {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        marking_class: MarkingClass,
        category: WorkingMode,
    ) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            display_name: name.clone(),
            name,
            marking_class,
            background_color: Color::rgb(0x61, 0xd1, 0xfd),
            text_color: Color::rgb(0x00, 0x00, 0x00),
            size: 10.0,
            category,
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    pub fn with_colors(mut self, background: Color, text: Color) -> Self {
        self.background_color = background;
        self.text_color = text;
        self
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    pub fn apply(&mut self, patch: &MarkingTypePatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(display_name) = &patch.display_name {
            self.display_name = display_name.clone();
        }
        if let Some(class) = patch.marking_class {
            self.marking_class = class;
        }
        if let Some(color) = patch.background_color {
            self.background_color = color;
        }
        if let Some(color) = patch.text_color {
            self.text_color = color;
        }
        if let Some(size) = patch.size {
            self.size = size;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
    }
}

/// Partial update of a [`MarkingType`]. The id cannot change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkingTypePatch {
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub marking_class: Option<MarkingClass>,
    pub background_color: Option<Color>,
    pub text_color: Option<Color>,
    pub size: Option<f64>,
    pub category: Option<WorkingMode>,
}

/// The synthetic type drawn for measurement-tool lines.
pub fn measurement_tool_type() -> MarkingType {
    MarkingType::new(
        MEASUREMENT_TOOL_TYPE_ID,
        "measurement-tool",
        MarkingClass::Measurement,
        WorkingMode::Fingerprint,
    )
    .with_display_name("Measurement")
    .with_colors(Color::rgb(0xff, 0xff, 0x00), Color::rgb(0xff, 0xff, 0x00))
    .with_size(2.0)
}

/// Starter type set for fingerprint work.
pub fn default_fingerprint_types() -> Vec<MarkingType> {
    let fp = WorkingMode::Fingerprint;
    vec![
        MarkingType::new(RIDGE_ENDING_TYPE_ID, "ridge ending", MarkingClass::Ray, fp)
            .with_display_name("Ridge ending")
            .with_colors(Color::rgb(0xf5, 0x3b, 0x3b), Color::rgb(0xff, 0xff, 0xff)),
        MarkingType::new(BIFURCATION_TYPE_ID, "bifurcation", MarkingClass::Ray, fp)
            .with_display_name("Bifurcation")
            .with_colors(Color::rgb(0x3b, 0x82, 0xf6), Color::rgb(0xff, 0xff, 0xff)),
        MarkingType::new("5b0cbd53-4ad5-4c34-a3bb-4f5a4e1b7c01", "core", MarkingClass::Point, fp)
            .with_display_name("Core"),
        MarkingType::new("9a3a4f7e-0f0e-4e7b-9d5c-2c0f6f1d8e02", "delta", MarkingClass::Point, fp)
            .with_display_name("Delta"),
        MarkingType::new(
            "c2d1e0f3-7b6a-4c59-8e4d-3b2a1f0e9d03",
            "ridge count",
            MarkingClass::LineSegment,
            fp,
        )
        .with_display_name("Ridge count"),
        MarkingType::new("e7f6d5c4-b3a2-4918-8776-655443322104", "scar", MarkingClass::Polygon, fp)
            .with_display_name("Scar")
            .with_colors(Color::rgb(0xa8, 0x55, 0xf7), Color::rgb(0xff, 0xff, 0xff)),
        MarkingType::new(
            "0a1b2c3d-4e5f-4a6b-8c7d-8e9f0a1b2c05",
            "region",
            MarkingClass::BoundingBox,
            fp,
        )
        .with_display_name("Region"),
        MarkingType::new(
            "1f2e3d4c-5b6a-4798-a8b7-c6d5e4f3a206",
            "rectangle",
            MarkingClass::Rectangle,
            fp,
        )
        .with_display_name("Rectangle"),
    ]
}
