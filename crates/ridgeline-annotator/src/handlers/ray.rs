use super::{HandlerContext, HandlerOutcome, MarkingHandler, PointerEvent};
use crate::model::{Marking, MarkingPatch, MarkingShape, Point};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Stage {
    Idle,
    Aiming { origin: Point },
    Done,
}

/// Places a ray on pointer-down, aims it while the pointer moves and
/// commits it on pointer-up.
///
/// The angle is `atan2(dy, dx)` of the vector from the origin to the
/// pointer, both in unrotated image space, so the canvas rotation is
/// already compensated.
#[derive(Debug)]
pub struct RayHandler {
    type_id: String,
    stage: Stage,
}

impl RayHandler {
    pub fn new(type_id: String) -> Self {
        Self {
            type_id,
            stage: Stage::Idle,
        }
    }
}

impl MarkingHandler for RayHandler {
    fn name(&self) -> &'static str {
        "ray"
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
            MarkingShape::Ray { angle_rad: 0.0 },
        ));
        self.stage = Stage::Aiming { origin };
        HandlerOutcome::Continue
    }

    fn handle_pointer_move(
        &mut self,
        ctx: &mut HandlerContext<'_>,
        event: &PointerEvent,
    ) -> HandlerOutcome {
        if let Stage::Aiming { origin } = self.stage {
            let p = ctx.position(event);
            let angle = (p.y - origin.y).atan2(p.x - origin.x);
            ctx.canvas.store.update_temporary(&MarkingPatch::angle(angle));
        }
        HandlerOutcome::Continue
    }

    fn handle_pointer_up(
        &mut self,
        ctx: &mut HandlerContext<'_>,
        _event: &PointerEvent,
    ) -> HandlerOutcome {
        match self.stage {
            Stage::Aiming { .. } => {
                self.stage = Stage::Done;
                ctx.finalize_temporary(0.0)
            }
            _ => HandlerOutcome::Continue,
        }
    }

    fn cleanup(&mut self, ctx: &mut HandlerContext<'_>) {
        ctx.canvas.store.set_temporary(None);
        self.stage = Stage::Done;
    }
}
