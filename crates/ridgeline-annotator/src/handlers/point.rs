use super::{HandlerContext, HandlerOutcome, MarkingHandler, PointerEvent};
use crate::model::{Marking, MarkingShape};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Stage {
    Idle,
    Done,
}

/// Commits a point marking on the pointer-down that starts it.
#[derive(Debug)]
pub struct PointHandler {
    type_id: String,
    stage: Stage,
}

impl PointHandler {
    pub fn new(type_id: String) -> Self {
        Self {
            type_id,
            stage: Stage::Idle,
        }
    }
}

impl MarkingHandler for PointHandler {
    fn name(&self) -> &'static str {
        "point"
    }

    fn begin(&mut self, ctx: &mut HandlerContext<'_>, event: &PointerEvent) -> HandlerOutcome {
        if self.stage != Stage::Idle {
            return HandlerOutcome::Continue;
        }
        self.stage = Stage::Done;
        let origin = ctx.position(event);
        let marking = Marking::new(0, self.type_id.clone(), origin, MarkingShape::Point);
        if let Err(err) = ctx.check_inside_image(&marking) {
            tracing::debug!("Ignoring point: {}", err);
            return HandlerOutcome::Discarded(err);
        }
        let label = ctx.labels.next_label();
        ctx.canvas.store.add_one(Marking { label, ..marking });
        HandlerOutcome::Committed(label)
    }

    fn handle_pointer_move(
        &mut self,
        _ctx: &mut HandlerContext<'_>,
        _event: &PointerEvent,
    ) -> HandlerOutcome {
        HandlerOutcome::Continue
    }

    fn handle_pointer_up(
        &mut self,
        _ctx: &mut HandlerContext<'_>,
        _event: &PointerEvent,
    ) -> HandlerOutcome {
        HandlerOutcome::Continue
    }

    fn cleanup(&mut self, _ctx: &mut HandlerContext<'_>) {
        self.stage = Stage::Done;
    }
}
