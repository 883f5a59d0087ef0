use ridgeline_core::GeometryError;

use super::{HandlerContext, HandlerOutcome, MarkingHandler, PointerEvent};
use crate::model::Point;
use crate::overlay::GuideLine;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Stage {
    Idle,
    First { start: Point },
    Second { start: Point },
    Done,
}

/// Draws the alignment line used to auto-rotate a canvas.
///
/// Same two-stage interaction as the measurement tool, but the line lives
/// in the canvas overlay instead of the marking store. Once finished,
/// [`Canvas::apply_auto_rotation`](crate::registry::Canvas::apply_auto_rotation)
/// turns it into a canvas rotation.
#[derive(Debug)]
pub struct AutoRotateHandler {
    stage: Stage,
}

impl Default for AutoRotateHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl AutoRotateHandler {
    pub fn new() -> Self {
        Self { stage: Stage::Idle }
    }
}

impl MarkingHandler for AutoRotateHandler {
    fn name(&self) -> &'static str {
        "auto_rotate"
    }

    fn begin(&mut self, ctx: &mut HandlerContext<'_>, event: &PointerEvent) -> HandlerOutcome {
        if self.stage != Stage::Idle {
            return HandlerOutcome::Continue;
        }
        let start = ctx.position(event);
        ctx.canvas
            .set_overlay_temp(Some(GuideLine::new(start, start)));
        self.stage = Stage::First { start };
        HandlerOutcome::Continue
    }

    fn handle_pointer_down(
        &mut self,
        ctx: &mut HandlerContext<'_>,
        event: &PointerEvent,
    ) -> HandlerOutcome {
        let Stage::Second { start } = self.stage else {
            return HandlerOutcome::Continue;
        };
        let line = GuideLine::new(start, ctx.position(event));
        self.stage = Stage::Done;
        if line.length() < ctx.options.min_shape_px {
            ctx.canvas.set_overlay_temp(None);
            return HandlerOutcome::Discarded(GeometryError::Degenerate {
                shape: "auto_rotate_line".to_string(),
                reason: format!("length {:.2} px", line.length()),
            });
        }
        tracing::info!(
            "Auto-rotate line on {} canvas at {:.3} rad",
            ctx.canvas.id(),
            line.angle()
        );
        ctx.canvas.finish_overlay(line);
        HandlerOutcome::Completed
    }

    fn handle_pointer_move(
        &mut self,
        ctx: &mut HandlerContext<'_>,
        event: &PointerEvent,
    ) -> HandlerOutcome {
        let p = ctx.position(event);
        match self.stage {
            Stage::First { .. } => {
                ctx.canvas.set_overlay_temp(Some(GuideLine::new(p, p)));
                self.stage = Stage::First { start: p };
            }
            Stage::Second { start } => {
                ctx.canvas.set_overlay_temp(Some(GuideLine::new(start, p)));
            }
            _ => {}
        }
        HandlerOutcome::Continue
    }

    fn handle_pointer_up(
        &mut self,
        ctx: &mut HandlerContext<'_>,
        event: &PointerEvent,
    ) -> HandlerOutcome {
        if let Stage::First { start } = self.stage {
            let p = ctx.position(event);
            ctx.canvas.set_ray_position(Some(p));
            self.stage = Stage::Second { start };
        }
        HandlerOutcome::Continue
    }

    fn cleanup(&mut self, ctx: &mut HandlerContext<'_>) {
        ctx.canvas.set_overlay_temp(None);
        ctx.canvas.set_ray_position(None);
        self.stage = Stage::Done;
    }
}
