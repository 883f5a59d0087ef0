use super::{HandlerContext, HandlerOutcome, MarkingHandler, PointerButton, PointerEvent};
use crate::model::{Marking, MarkingClass, MarkingPatch, MarkingShape};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Stage {
    Idle,
    Dragging,
    Done,
}

/// Drag-to-draw handler for line segments and bounding boxes.
///
/// Pointer-down fixes the origin, moves update the endpoint (the opposite
/// corner for boxes) and pointer-up, or a secondary-button down, finalizes.
/// Shapes under the minimum size are discarded.
#[derive(Debug)]
pub struct SegmentHandler {
    class: MarkingClass,
    type_id: String,
    stage: Stage,
}

impl SegmentHandler {
    /// `class` must be [`MarkingClass::LineSegment`] or
    /// [`MarkingClass::BoundingBox`]; anything else draws a line segment.
    pub fn new(class: MarkingClass, type_id: String) -> Self {
        let class = match class {
            MarkingClass::BoundingBox => MarkingClass::BoundingBox,
            _ => MarkingClass::LineSegment,
        };
        Self {
            class,
            type_id,
            stage: Stage::Idle,
        }
    }

    fn finalize(&mut self, ctx: &mut HandlerContext<'_>, event: &PointerEvent) -> HandlerOutcome {
        let endpoint = ctx.position(event);
        ctx.canvas
            .store
            .update_temporary(&MarkingPatch::endpoint(endpoint));
        self.stage = Stage::Done;
        let min_px = ctx.options.min_shape_px;
        ctx.finalize_temporary(min_px)
    }
}

impl MarkingHandler for SegmentHandler {
    fn name(&self) -> &'static str {
        match self.class {
            MarkingClass::BoundingBox => "bounding_box",
            _ => "line_segment",
        }
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
            MarkingShape::seed(self.class, origin),
        ));
        self.stage = Stage::Dragging;
        HandlerOutcome::Continue
    }

    fn handle_pointer_down(
        &mut self,
        ctx: &mut HandlerContext<'_>,
        event: &PointerEvent,
    ) -> HandlerOutcome {
        if self.stage == Stage::Dragging && event.button == PointerButton::Secondary {
            return self.finalize(ctx, event);
        }
        HandlerOutcome::Continue
    }

    fn handle_pointer_move(
        &mut self,
        ctx: &mut HandlerContext<'_>,
        event: &PointerEvent,
    ) -> HandlerOutcome {
        if self.stage == Stage::Dragging {
            let endpoint = ctx.position(event);
            ctx.canvas
                .store
                .update_temporary(&MarkingPatch::endpoint(endpoint));
        }
        HandlerOutcome::Continue
    }

    fn handle_pointer_up(
        &mut self,
        ctx: &mut HandlerContext<'_>,
        event: &PointerEvent,
    ) -> HandlerOutcome {
        if self.stage == Stage::Dragging {
            return self.finalize(ctx, event);
        }
        HandlerOutcome::Continue
    }

    fn cleanup(&mut self, ctx: &mut HandlerContext<'_>) {
        ctx.canvas.store.set_temporary(None);
        self.stage = Stage::Done;
    }
}
