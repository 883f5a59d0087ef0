//! Viewport and coordinate transformation for one canvas.
//!
//! Handles conversion between screen pixels and unrotated image pixels.
//! The image origin sits at the top-left, +Y goes down, like the screen.
//!
//! Formula:
//! ```text
//! image = (screen - pan) / zoom                      // pan/zoom normalisation
//! stored = rotate_about(image, -rotation, w/2, h/2)  // undo canvas rotation
//! ```

use std::fmt;

use crate::model::{rotate_about, Point, ViewportRatios};

const MIN_ZOOM: f64 = 0.05;
const MAX_ZOOM: f64 = 64.0;

#[derive(Debug, Clone, PartialEq)]
pub struct CanvasViewport {
    zoom: f64,
    pan_x: f64,
    pan_y: f64,
    rotation: f64,
    screen_width: f64,
    screen_height: f64,
    image_width: f64,
    image_height: f64,
}

impl Default for CanvasViewport {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl CanvasViewport {
    /// Creates a viewport showing an image of the given size at 100%.
    pub fn new(image_width: f64, image_height: f64) -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
            rotation: 0.0,
            screen_width: image_width,
            screen_height: image_height,
            image_width,
            image_height,
        }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Sets the zoom level, clamped to a sane range. Returns whether it changed.
    pub fn set_zoom(&mut self, zoom: f64) -> bool {
        let zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        if !zoom.is_finite() || zoom == self.zoom {
            return false;
        }
        self.zoom = zoom;
        true
    }

    pub fn pan(&self) -> (f64, f64) {
        (self.pan_x, self.pan_y)
    }

    pub fn set_pan(&mut self, x: f64, y: f64) -> bool {
        if (x, y) == (self.pan_x, self.pan_y) {
            return false;
        }
        self.pan_x = x;
        self.pan_y = y;
        true
    }

    /// Canvas rotation in radians.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: f64) -> bool {
        if !rotation.is_finite() || rotation == self.rotation {
            return false;
        }
        self.rotation = rotation;
        true
    }

    pub fn image_size(&self) -> (f64, f64) {
        (self.image_width, self.image_height)
    }

    pub fn set_image_size(&mut self, width: f64, height: f64) {
        self.image_width = width;
        self.image_height = height;
    }

    pub fn screen_size(&self) -> (f64, f64) {
        (self.screen_width, self.screen_height)
    }

    pub fn set_screen_size(&mut self, width: f64, height: f64) {
        self.screen_width = width;
        self.screen_height = height;
    }

    /// Width and height of the image region visible on screen.
    pub fn visible_world_size(&self) -> (f64, f64) {
        (self.screen_width / self.zoom, self.screen_height / self.zoom)
    }

    /// Image-to-viewport ratios for the renderer.
    pub fn ratios(&self) -> ViewportRatios {
        let (visible_w, visible_h) = self.visible_world_size();
        ViewportRatios::from_world(visible_w, self.image_width, visible_h, self.image_height)
    }

    /// Screen pixel to image pixel (pan/zoom only).
    pub fn screen_to_image(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.pan_x) / self.zoom,
            (screen.y - self.pan_y) / self.zoom,
        )
    }

    /// Image pixel to screen pixel (pan/zoom only).
    pub fn image_to_screen(&self, image: Point) -> Point {
        Point::new(
            image.x * self.zoom + self.pan_x,
            image.y * self.zoom + self.pan_y,
        )
    }

    /// Centre of the image in image pixels; the rotation pivot.
    pub fn image_center(&self) -> Point {
        Point::new(self.image_width / 2.0, self.image_height / 2.0)
    }

    /// Screen pixel to the unrotated image coordinate stored in markings.
    pub fn adjusted_position(&self, screen: Point) -> Point {
        let normalized = self.screen_to_image(screen);
        let c = self.image_center();
        rotate_about(normalized, -self.rotation, c.x, c.y)
    }

    /// Inverse of [`CanvasViewport::adjusted_position`].
    pub fn stored_to_screen(&self, stored: Point) -> Point {
        let c = self.image_center();
        self.image_to_screen(rotate_about(stored, self.rotation, c.x, c.y))
    }
}

impl fmt::Display for CanvasViewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Viewport(zoom: {:.2}, pan: ({:.1}, {:.1}), rotation: {:.3} rad)",
            self.zoom, self.pan_x, self.pan_y, self.rotation
        )
    }
}
