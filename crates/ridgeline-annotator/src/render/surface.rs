use crate::model::{Color, Point};

/// Stroke colour and width in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub color: Color,
    pub width: f64,
}

impl LineStyle {
    pub fn new(color: Color, width: f64) -> Self {
        Self { color, width }
    }
}

/// Text drawn centred on its anchor point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f64,
    pub color: Color,
    /// Filled box drawn behind the text.
    pub backdrop: Option<Color>,
}

/// Approximate width and height of `text` at `size`, used to lay out
/// backdrops. Both surfaces use the same metric so recorded frames match
/// rasterised ones.
pub fn text_extent(text: &str, size: f64) -> (f64, f64) {
    (text.chars().count() as f64 * size * 0.6, size)
}

/// Drawing backend for a marking frame.
///
/// Coordinates are surface pixels with the origin at the top-left.
pub trait DrawSurface {
    fn size(&self) -> (u32, u32);

    /// Erases everything drawn so far.
    fn clear(&mut self);

    fn circle(&mut self, center: Point, radius: f64, fill: Option<Color>, stroke: Option<LineStyle>);

    fn line(&mut self, from: Point, to: Point, style: LineStyle);

    /// Axis-aligned rectangle between two corners.
    fn rect(&mut self, min: Point, max: Point, fill: Option<Color>, stroke: Option<LineStyle>);

    fn polygon(&mut self, points: &[Point], fill: Color);

    fn polyline(&mut self, points: &[Point], closed: bool, style: LineStyle);

    fn text(&mut self, text: &str, at: Point, style: &TextStyle);
}
