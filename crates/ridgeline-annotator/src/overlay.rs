//! Guide lines drawn on top of the markings but never stored as markings.

use crate::model::Point;

/// Line from `start` to `end` in unrotated image pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuideLine {
    pub start: Point,
    pub end: Point,
}

impl GuideLine {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }

    /// Direction of the line in image space, `atan2(dy, dx)`.
    pub fn angle(&self) -> f64 {
        (self.end.y - self.start.y).atan2(self.end.x - self.start.x)
    }
}

/// Auto-rotate alignment lines of one canvas.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlayLines {
    pub auto_rotate_temp: Option<GuideLine>,
    pub auto_rotate_finished: Option<GuideLine>,
    revision: u64,
}

impl OverlayLines {
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn set_temp(&mut self, line: Option<GuideLine>) -> bool {
        if self.auto_rotate_temp == line {
            return false;
        }
        self.auto_rotate_temp = line;
        self.revision += 1;
        true
    }

    pub fn finish(&mut self, line: GuideLine) {
        self.auto_rotate_temp = None;
        self.auto_rotate_finished = Some(line);
        self.revision += 1;
    }

    /// Canvas rotation that makes the finished line horizontal.
    pub fn alignment_rotation(&self) -> Option<f64> {
        self.auto_rotate_finished.map(|line| -line.angle())
    }
}
