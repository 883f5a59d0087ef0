use ridgeline_core::Point;
use serde::{Deserialize, Serialize};

/// Scale factors from image pixels to viewport space.
///
/// `width = visible_world_width / world_width`, and likewise for height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportRatios {
    pub width: f64,
    pub height: f64,
}

impl Default for ViewportRatios {
    fn default() -> Self {
        Self::identity()
    }
}

impl ViewportRatios {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn identity() -> Self {
        Self::new(1.0, 1.0)
    }

    /// Ratios from visible and total world sizes. A zero world size maps to 1.
    pub fn from_world(
        visible_world_width: f64,
        world_width: f64,
        visible_world_height: f64,
        world_height: f64,
    ) -> Self {
        let ratio = |visible: f64, world: f64| {
            if world > 0.0 {
                visible / world
            } else {
                1.0
            }
        };
        Self::new(
            ratio(visible_world_width, world_width),
            ratio(visible_world_height, world_height),
        )
    }

    /// Projects an image-space point into viewport space.
    pub fn project(&self, p: Point) -> Point {
        Point::new(p.x * self.width, p.y * self.height)
    }

    /// Inverse of [`ViewportRatios::project`].
    pub fn unproject(&self, p: Point) -> Point {
        Point::new(p.x / self.width, p.y / self.height)
    }
}

/// Rotates `p` by `angle` radians about the pivot `(cx, cy)`.
///
/// Returns `p` unchanged for a zero angle so unrotated canvases stay exact.
pub fn rotate_about(p: Point, angle: f64, cx: f64, cy: f64) -> Point {
    if angle == 0.0 {
        return p;
    }
    let (sin, cos) = angle.sin_cos();
    let dx = p.x - cx;
    let dy = p.y - cy;
    Point::new(cx + dx * cos - dy * sin, cy + dx * sin + dy * cos)
}
