//! Interactive marking creation.
//!
//! Each shape has its own handler: a small state machine with an explicit
//! `Stage` enum that turns a stream of pointer events into a temporary
//! marking and, on its terminating event, a committed one. Handlers are
//! driven by [`MarkingSession`], which owns at most one of them at a time.
//!
//! Pointer positions arrive in screen pixels and are converted with
//! [`CanvasViewport::adjusted_position`](crate::viewport::CanvasViewport::adjusted_position)
//! before anything is stored.

mod auto_rotate;
mod measurement;
mod point;
mod polygon;
mod ray;
mod rectangle;
mod segment;
mod session;

pub use auto_rotate::AutoRotateHandler;
pub use measurement::MeasurementHandler;
pub use point::PointHandler;
pub use polygon::PolygonHandler;
pub use ray::RayHandler;
pub use rectangle::RectangleHandler;
pub use segment::SegmentHandler;
pub use session::{MarkingSession, Tool};

use ridgeline_core::GeometryError;

use crate::labels::LabelGenerator;
use crate::model::{Marking, MarkingClass, Point};
use crate::registry::Canvas;

/// Pointer button of an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerButton {
    #[default]
    Primary,
    /// Finalizes multi-vertex shapes without adding a vertex.
    Secondary,
    Middle,
}

/// A pointer event in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub position: Point,
    pub button: PointerButton,
}

impl PointerEvent {
    pub fn primary(x: f64, y: f64) -> Self {
        Self {
            position: Point::new(x, y),
            button: PointerButton::Primary,
        }
    }

    pub fn secondary(x: f64, y: f64) -> Self {
        Self {
            position: Point::new(x, y),
            button: PointerButton::Secondary,
        }
    }
}

/// Result of feeding one event to a handler.
#[derive(Debug, Clone, PartialEq)]
pub enum HandlerOutcome {
    /// The interaction is still in progress (or the event was ignored).
    Continue,
    /// A marking with this label was committed.
    Committed(u32),
    /// The interaction finished without producing a marking.
    Completed,
    /// The in-progress shape was dropped.
    Discarded(GeometryError),
}

impl HandlerOutcome {
    /// The handler has nothing left to do.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, HandlerOutcome::Continue)
    }
}

/// Size thresholds used while creating shapes, in image pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkingOptions {
    /// Minimum length/extent for segments, boxes and rectangles.
    pub min_shape_px: f64,
    /// Minimum length of a measurement line.
    pub min_measurement_px: f64,
    /// Clicking this close to the first polygon vertex closes the polygon.
    pub polygon_close_px: f64,
    /// Selection hit radius in screen pixels.
    pub hit_tolerance_px: f64,
}

impl Default for MarkingOptions {
    fn default() -> Self {
        Self {
            min_shape_px: 1.0,
            min_measurement_px: 0.5,
            polygon_close_px: 6.0,
            hit_tolerance_px: 8.0,
        }
    }
}

/// What a handler may touch while processing an event.
pub struct HandlerContext<'a> {
    pub canvas: &'a mut Canvas,
    pub labels: &'a mut LabelGenerator,
    pub options: &'a MarkingOptions,
}

impl HandlerContext<'_> {
    /// Unrotated image position of a pointer event.
    pub fn position(&self, event: &PointerEvent) -> Point {
        self.canvas.viewport.adjusted_position(event.position)
    }

    /// Checks `marking` against the canvas image. Always passes while no
    /// image size is known.
    pub fn check_inside_image(&self, marking: &Marking) -> Result<(), GeometryError> {
        let (width, height) = self.canvas.viewport.image_size();
        if width <= 0.0 || height <= 0.0 {
            return Ok(());
        }
        marking.check_inside(width, height)
    }

    /// Starts a temporary marking with a fresh label.
    pub(crate) fn begin_temporary(&mut self, marking: Marking) -> u32 {
        let label = marking.label;
        self.canvas.store.set_temporary(Some(marking));
        label
    }

    /// Commits the temporary marking if it lies on the image and is large
    /// enough, otherwise drops it.
    pub(crate) fn finalize_temporary(&mut self, min_px: f64) -> HandlerOutcome {
        let Some(temporary) = self.canvas.store.temporary() else {
            return HandlerOutcome::Completed;
        };
        let check = temporary
            .check_finite()
            .and_then(|_| self.check_inside_image(temporary))
            .and_then(|_| temporary.check_extent(min_px));
        match check {
            Ok(()) => match self.canvas.store.commit_temporary() {
                Some(label) => HandlerOutcome::Committed(label),
                None => HandlerOutcome::Completed,
            },
            Err(err) => {
                tracing::debug!("Discarding in-progress marking: {}", err);
                self.canvas.store.set_temporary(None);
                HandlerOutcome::Discarded(err)
            }
        }
    }
}

/// Per-shape creation state machine.
///
/// `begin` receives the pointer-down that created the handler; the other
/// methods receive every later event on the same canvas until a terminal
/// outcome is returned or the session interrupts the handler.
pub trait MarkingHandler {
    /// Short name for diagnostics.
    fn name(&self) -> &'static str;

    fn begin(&mut self, ctx: &mut HandlerContext<'_>, event: &PointerEvent) -> HandlerOutcome;

    fn handle_pointer_down(
        &mut self,
        _ctx: &mut HandlerContext<'_>,
        _event: &PointerEvent,
    ) -> HandlerOutcome {
        HandlerOutcome::Continue
    }

    fn handle_pointer_move(
        &mut self,
        ctx: &mut HandlerContext<'_>,
        event: &PointerEvent,
    ) -> HandlerOutcome;

    fn handle_pointer_up(
        &mut self,
        ctx: &mut HandlerContext<'_>,
        event: &PointerEvent,
    ) -> HandlerOutcome;

    /// Drops any in-progress state. Called on interrupt.
    fn cleanup(&mut self, ctx: &mut HandlerContext<'_>);
}

/// Creates the handler for a marking class.
pub fn create_handler(class: MarkingClass, type_id: impl Into<String>) -> Box<dyn MarkingHandler> {
    let type_id = type_id.into();
    match class {
        MarkingClass::Point => Box::new(PointHandler::new(type_id)),
        MarkingClass::Ray => Box::new(RayHandler::new(type_id)),
        MarkingClass::LineSegment | MarkingClass::BoundingBox => {
            Box::new(SegmentHandler::new(class, type_id))
        }
        MarkingClass::Rectangle => Box::new(RectangleHandler::new(type_id)),
        MarkingClass::Polygon => Box::new(PolygonHandler::new(type_id)),
        MarkingClass::Measurement => Box::new(MeasurementHandler::new(type_id)),
    }
}
