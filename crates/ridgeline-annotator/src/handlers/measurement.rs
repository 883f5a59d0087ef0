use super::{HandlerContext, HandlerOutcome, MarkingHandler, PointerEvent};
use crate::model::{Marking, MarkingPatch, MarkingShape};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Stage {
    Idle,
    /// Button held after the first press; the origin follows the pointer.
    First,
    /// Button released; the endpoint follows the pointer until the next press.
    Second,
    Done,
}

/// Two-click measurement line.
///
/// The first pointer-up does not commit: it moves the handler to its second
/// stage and records the position on the canvas. The next pointer-down
/// commits the line, or discards it when it is shorter than
/// `min_measurement_px`.
#[derive(Debug)]
pub struct MeasurementHandler {
    type_id: String,
    stage: Stage,
}

impl MeasurementHandler {
    pub fn new(type_id: String) -> Self {
        Self {
            type_id,
            stage: Stage::Idle,
        }
    }
}

impl MarkingHandler for MeasurementHandler {
    fn name(&self) -> &'static str {
        "measurement"
    }

    fn begin(&mut self, ctx: &mut HandlerContext<'_>, event: &PointerEvent) -> HandlerOutcome {
        if self.stage != Stage::Idle {
            return HandlerOutcome::Continue;
        }
        let origin = ctx.position(event);
        let label = ctx.labels.next_label();
        ctx.begin_temporary(Marking::new(
            label,
            self.type_id.clone(),
            origin,
            MarkingShape::Measurement { endpoint: origin },
        ));
        self.stage = Stage::First;
        HandlerOutcome::Continue
    }

    fn handle_pointer_down(
        &mut self,
        ctx: &mut HandlerContext<'_>,
        event: &PointerEvent,
    ) -> HandlerOutcome {
        if self.stage != Stage::Second {
            return HandlerOutcome::Continue;
        }
        let endpoint = ctx.position(event);
        ctx.canvas
            .store
            .update_temporary(&MarkingPatch::endpoint(endpoint));
        let min_px = ctx.options.min_measurement_px;
        let outcome = ctx.finalize_temporary(min_px);
        self.cleanup(ctx);
        outcome
    }

    fn handle_pointer_move(
        &mut self,
        ctx: &mut HandlerContext<'_>,
        event: &PointerEvent,
    ) -> HandlerOutcome {
        let p = ctx.position(event);
        let patch = match self.stage {
            Stage::First => MarkingPatch::origin(p),
            Stage::Second => MarkingPatch::endpoint(p),
            _ => return HandlerOutcome::Continue,
        };
        ctx.canvas.store.update_temporary(&patch);
        HandlerOutcome::Continue
    }

    fn handle_pointer_up(
        &mut self,
        ctx: &mut HandlerContext<'_>,
        event: &PointerEvent,
    ) -> HandlerOutcome {
        if self.stage == Stage::First {
            let p = ctx.position(event);
            ctx.canvas.set_ray_position(Some(p));
            self.stage = Stage::Second;
            tracing::debug!("Measurement origin fixed at {}", p);
        }
        HandlerOutcome::Continue
    }

    fn cleanup(&mut self, ctx: &mut HandlerContext<'_>) {
        ctx.canvas.store.set_temporary(None);
        ctx.canvas.set_ray_position(None);
        self.stage = Stage::Done;
    }
}
