use super::{HandlerContext, HandlerOutcome, MarkingHandler, PointerButton, PointerEvent};
use crate::model::{Marking, MarkingClass, MarkingPatch, MarkingShape, Point};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Stage {
    Idle,
    Dragging { corner: Point },
    Done,
}

/// Corners of the axis-aligned rectangle spanned by `a` and `b`, in
/// drawing order starting at `a`.
pub(crate) fn corners(a: Point, b: Point) -> Vec<Point> {
    vec![a, Point::new(b.x, a.y), b, Point::new(a.x, b.y)]
}

/// Corner-drag rectangle handler.
#[derive(Debug)]
pub struct RectangleHandler {
    type_id: String,
    stage: Stage,
}

impl RectangleHandler {
    pub fn new(type_id: String) -> Self {
        Self {
            type_id,
            stage: Stage::Idle,
        }
    }

    fn finalize(&mut self, ctx: &mut HandlerContext<'_>, event: &PointerEvent) -> HandlerOutcome {
        if let Stage::Dragging { corner } = self.stage {
            let p = ctx.position(event);
            ctx.canvas
                .store
                .update_temporary(&MarkingPatch::points(corners(corner, p)));
        }
        self.stage = Stage::Done;
        let min_px = ctx.options.min_shape_px;
        ctx.finalize_temporary(min_px)
    }
}

impl MarkingHandler for RectangleHandler {
    fn name(&self) -> &'static str {
        "rectangle"
    }

    fn begin(&mut self, ctx: &mut HandlerContext<'_>, event: &PointerEvent) -> HandlerOutcome {
        if self.stage != Stage::Idle {
            return HandlerOutcome::Continue;
        }
        let corner = ctx.position(event);
        let label = ctx.labels.next_label();
        ctx.begin_temporary(Marking::new(
            label,
            self.type_id.clone(),
            corner,
            MarkingShape::seed(MarkingClass::Rectangle, corner),
        ));
        self.stage = Stage::Dragging { corner };
        HandlerOutcome::Continue
    }

    fn handle_pointer_down(
        &mut self,
        ctx: &mut HandlerContext<'_>,
        event: &PointerEvent,
    ) -> HandlerOutcome {
        if matches!(self.stage, Stage::Dragging { .. }) && event.button == PointerButton::Secondary
        {
            return self.finalize(ctx, event);
        }
        HandlerOutcome::Continue
    }

    fn handle_pointer_move(
        &mut self,
        ctx: &mut HandlerContext<'_>,
        event: &PointerEvent,
    ) -> HandlerOutcome {
        if let Stage::Dragging { corner } = self.stage {
            let p = ctx.position(event);
            ctx.canvas
                .store
                .update_temporary(&MarkingPatch::points(corners(corner, p)));
        }
        HandlerOutcome::Continue
    }

    fn handle_pointer_up(
        &mut self,
        ctx: &mut HandlerContext<'_>,
        event: &PointerEvent,
    ) -> HandlerOutcome {
        if matches!(self.stage, Stage::Dragging { .. }) {
            return self.finalize(ctx, event);
        }
        HandlerOutcome::Continue
    }

    fn cleanup(&mut self, ctx: &mut HandlerContext<'_>) {
        ctx.canvas.store.set_temporary(None);
        self.stage = Stage::Done;
    }
}
