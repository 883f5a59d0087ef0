//! A surface that records draw calls instead of rasterising them.

use super::surface::{DrawSurface, LineStyle, TextStyle};
use crate::model::{Color, Point};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    Circle {
        center: Point,
        radius: f64,
        fill: Option<Color>,
        stroke: Option<LineStyle>,
    },
    Line {
        from: Point,
        to: Point,
        style: LineStyle,
    },
    Rect {
        min: Point,
        max: Point,
        fill: Option<Color>,
        stroke: Option<LineStyle>,
    },
    Polygon {
        points: Vec<Point>,
        fill: Color,
    },
    Polyline {
        points: Vec<Point>,
        closed: bool,
        style: LineStyle,
    },
    Text {
        text: String,
        at: Point,
        style: TextStyle,
    },
}

/// Keeps the commands of the most recent frame. `clear` starts a new frame.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
    frames: usize,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of times the surface has been cleared.
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// All text drawn in the current frame, in draw order.
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Whether the current frame draws anything besides the clear.
    pub fn is_blank(&self) -> bool {
        self.commands.iter().all(|c| matches!(c, DrawCommand::Clear))
    }
}

impl DrawSurface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
        self.frames += 1;
    }

    fn circle(&mut self, center: Point, radius: f64, fill: Option<Color>, stroke: Option<LineStyle>) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            fill,
            stroke,
        });
    }

    fn line(&mut self, from: Point, to: Point, style: LineStyle) {
        self.commands.push(DrawCommand::Line { from, to, style });
    }

    fn rect(&mut self, min: Point, max: Point, fill: Option<Color>, stroke: Option<LineStyle>) {
        self.commands.push(DrawCommand::Rect {
            min,
            max,
            fill,
            stroke,
        });
    }

    fn polygon(&mut self, points: &[Point], fill: Color) {
        self.commands.push(DrawCommand::Polygon {
            points: points.to_vec(),
            fill,
        });
    }

    fn polyline(&mut self, points: &[Point], closed: bool, style: LineStyle) {
        self.commands.push(DrawCommand::Polyline {
            points: points.to_vec(),
            closed,
            style,
        });
    }

    fn text(&mut self, text: &str, at: Point, style: &TextStyle) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            at,
            style: *style,
        });
    }
}
