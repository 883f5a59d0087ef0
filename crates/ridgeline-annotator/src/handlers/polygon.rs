use super::{HandlerContext, HandlerOutcome, MarkingHandler, PointerButton, PointerEvent};
use crate::model::{Marking, MarkingPatch, MarkingShape, Point};

#[derive(Debug, Clone, PartialEq)]
enum Stage {
    Idle,
    /// `fixed` holds the placed vertices; the temporary marking carries them
    /// plus one live vertex that follows the pointer.
    Collecting { fixed: Vec<Point> },
    Done,
}

/// Click-per-vertex polygon handler.
///
/// Every primary pointer-down places a vertex. A primary down near the first
/// vertex (with at least three placed) or any secondary down finalizes
/// without adding a vertex.
#[derive(Debug)]
pub struct PolygonHandler {
    type_id: String,
    stage: Stage,
}

impl PolygonHandler {
    pub fn new(type_id: String) -> Self {
        Self {
            type_id,
            stage: Stage::Idle,
        }
    }

    fn finalize(&mut self, ctx: &mut HandlerContext<'_>) -> HandlerOutcome {
        let stage = std::mem::replace(&mut self.stage, Stage::Done);
        if let Stage::Collecting { fixed } = stage {
            ctx.canvas
                .store
                .update_temporary(&MarkingPatch::points(fixed));
        }
        let min_px = ctx.options.min_shape_px;
        ctx.finalize_temporary(min_px)
    }
}

fn with_live(fixed: &[Point], live: Point) -> Vec<Point> {
    let mut points = fixed.to_vec();
    points.push(live);
    points
}

impl MarkingHandler for PolygonHandler {
    fn name(&self) -> &'static str {
        "polygon"
    }

    fn begin(&mut self, ctx: &mut HandlerContext<'_>, event: &PointerEvent) -> HandlerOutcome {
        if self.stage != Stage::Idle {
            return HandlerOutcome::Continue;
        }
        let first = ctx.position(event);
        let label = ctx.labels.next_label();
        ctx.begin_temporary(Marking::new(
            label,
            self.type_id.clone(),
            first,
            MarkingShape::Polygon {
                points: vec![first, first],
            },
        ));
        self.stage = Stage::Collecting { fixed: vec![first] };
        HandlerOutcome::Continue
    }

    fn handle_pointer_down(
        &mut self,
        ctx: &mut HandlerContext<'_>,
        event: &PointerEvent,
    ) -> HandlerOutcome {
        let p = ctx.position(event);
        let close_px = ctx.options.polygon_close_px;
        let Stage::Collecting { fixed } = &mut self.stage else {
            return HandlerOutcome::Continue;
        };
        match event.button {
            PointerButton::Secondary => self.finalize(ctx),
            PointerButton::Primary => {
                let closes = fixed.len() >= 3 && fixed[0].distance_to(&p) <= close_px;
                if closes {
                    return self.finalize(ctx);
                }
                fixed.push(p);
                let points = with_live(fixed, p);
                tracing::debug!("Polygon vertex {} at {}", fixed.len(), p);
                ctx.canvas
                    .store
                    .update_temporary(&MarkingPatch::points(points));
                HandlerOutcome::Continue
            }
            PointerButton::Middle => HandlerOutcome::Continue,
        }
    }

    fn handle_pointer_move(
        &mut self,
        ctx: &mut HandlerContext<'_>,
        event: &PointerEvent,
    ) -> HandlerOutcome {
        if let Stage::Collecting { fixed } = &self.stage {
            let points = with_live(fixed, ctx.position(event));
            ctx.canvas
                .store
                .update_temporary(&MarkingPatch::points(points));
        }
        HandlerOutcome::Continue
    }

    fn handle_pointer_up(
        &mut self,
        _ctx: &mut HandlerContext<'_>,
        _event: &PointerEvent,
    ) -> HandlerOutcome {
        HandlerOutcome::Continue
    }

    fn cleanup(&mut self, ctx: &mut HandlerContext<'_>) {
        ctx.canvas.store.set_temporary(None);
        self.stage = Stage::Done;
    }
}
