use ridgeline_core::CanvasId;
use std::fmt;

use super::{
    create_handler, AutoRotateHandler, HandlerContext, HandlerOutcome, MarkingHandler,
    MarkingOptions, PointerButton, PointerEvent,
};
use crate::model::{MarkingClass, MEASUREMENT_TOOL_TYPE_ID};
use crate::registry::CanvasRegistry;
use crate::selection::hit_test;

/// The active tool of an annotation session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Selection,
    /// Create markings of this class using the selected marking type.
    Mark(MarkingClass),
    Measurement,
    AutoRotate,
}

struct ActiveHandler {
    canvas: CanvasId,
    handler: Box<dyn MarkingHandler>,
}

/// Routes pointer events to at most one creation handler.
///
/// A handler lives from the pointer-down that starts it until it reports a
/// terminal [`HandlerOutcome`]. Switching tools, or pressing on the other
/// canvas, interrupts it and drops whatever it had in progress.
pub struct MarkingSession {
    tool: Tool,
    active: Option<ActiveHandler>,
    options: MarkingOptions,
}

impl fmt::Debug for MarkingSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarkingSession")
            .field("tool", &self.tool)
            .field(
                "active",
                &self.active.as_ref().map(|a| (a.canvas, a.handler.name())),
            )
            .field("options", &self.options)
            .finish()
    }
}

impl Default for MarkingSession {
    fn default() -> Self {
        Self::new(MarkingOptions::default())
    }
}

impl MarkingSession {
    pub fn new(options: MarkingOptions) -> Self {
        Self {
            tool: Tool::Selection,
            active: None,
            options,
        }
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn options(&self) -> &MarkingOptions {
        &self.options
    }

    /// Changes the tool, interrupting any handler in progress.
    pub fn set_tool(&mut self, registry: &mut CanvasRegistry, tool: Tool) {
        if self.tool != tool {
            self.interrupt(registry);
            tracing::debug!("Tool {:?} -> {:?}", self.tool, tool);
            self.tool = tool;
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_canvas(&self) -> Option<CanvasId> {
        self.active.as_ref().map(|a| a.canvas)
    }

    /// Drops the handler in progress and its temporary state.
    pub fn interrupt(&mut self, registry: &mut CanvasRegistry) {
        if let Some(mut active) = self.active.take() {
            tracing::debug!(
                "Interrupting {} handler on {} canvas",
                active.handler.name(),
                active.canvas
            );
            let (canvas, labels) = registry.canvas_and_labels(active.canvas);
            let mut ctx = HandlerContext {
                canvas,
                labels,
                options: &self.options,
            };
            active.handler.cleanup(&mut ctx);
        }
    }

    pub fn pointer_down(
        &mut self,
        registry: &mut CanvasRegistry,
        canvas: CanvasId,
        event: &PointerEvent,
    ) -> HandlerOutcome {
        if self.active_canvas().is_some_and(|id| id != canvas) {
            self.interrupt(registry);
        }
        if self.active.is_some() {
            return self.dispatch(registry, canvas, |h, ctx| h.handle_pointer_down(ctx, event));
        }
        if event.button != PointerButton::Primary {
            return HandlerOutcome::Continue;
        }

        let handler: Box<dyn MarkingHandler> = match self.tool {
            Tool::Selection => {
                self.select_at(registry, canvas, event);
                return HandlerOutcome::Continue;
            }
            Tool::Mark(class) => match self.resolve_type(registry, class) {
                Some(type_id) => create_handler(class, type_id),
                None => {
                    tracing::warn!("No marking type available for class {}", class);
                    return HandlerOutcome::Continue;
                }
            },
            Tool::Measurement => create_handler(MarkingClass::Measurement, MEASUREMENT_TOOL_TYPE_ID),
            Tool::AutoRotate => Box::new(AutoRotateHandler::new()),
        };

        self.active = Some(ActiveHandler { canvas, handler });
        self.dispatch(registry, canvas, |h, ctx| h.begin(ctx, event))
    }

    pub fn pointer_move(
        &mut self,
        registry: &mut CanvasRegistry,
        canvas: CanvasId,
        event: &PointerEvent,
    ) -> HandlerOutcome {
        if self.active_canvas() != Some(canvas) {
            return HandlerOutcome::Continue;
        }
        self.dispatch(registry, canvas, |h, ctx| h.handle_pointer_move(ctx, event))
    }

    pub fn pointer_up(
        &mut self,
        registry: &mut CanvasRegistry,
        canvas: CanvasId,
        event: &PointerEvent,
    ) -> HandlerOutcome {
        if self.active_canvas() != Some(canvas) {
            return HandlerOutcome::Continue;
        }
        self.dispatch(registry, canvas, |h, ctx| h.handle_pointer_up(ctx, event))
    }

    fn dispatch<F>(&mut self, registry: &mut CanvasRegistry, canvas: CanvasId, f: F) -> HandlerOutcome
    where
        F: FnOnce(&mut dyn MarkingHandler, &mut HandlerContext<'_>) -> HandlerOutcome,
    {
        let Some(active) = self.active.as_mut() else {
            return HandlerOutcome::Continue;
        };
        let (canvas_state, labels) = registry.canvas_and_labels(canvas);
        let mut ctx = HandlerContext {
            canvas: canvas_state,
            labels,
            options: &self.options,
        };
        let outcome = f(active.handler.as_mut(), &mut ctx);
        if outcome.is_terminal() {
            tracing::debug!("{} handler finished: {:?}", active.handler.name(), outcome);
            self.active = None;
        }
        outcome
    }

    /// Selected type if it matches `class`, else the first type of that
    /// class in the current working mode.
    fn resolve_type(&self, registry: &CanvasRegistry, class: MarkingClass) -> Option<String> {
        let types = registry.types();
        types
            .selected()
            .filter(|t| t.marking_class == class)
            .or_else(|| {
                types
                    .for_working_mode(registry.working_mode())
                    .find(|t| t.marking_class == class)
            })
            .map(|t| t.id.clone())
    }

    fn select_at(&self, registry: &mut CanvasRegistry, canvas: CanvasId, event: &PointerEvent) {
        let canvas = registry.canvas_mut(canvas);
        let p = canvas.viewport.adjusted_position(event.position);
        let tolerance = self.options.hit_tolerance_px / canvas.viewport.zoom();
        let hit = hit_test(canvas.store.markings(), p, tolerance);
        // The label comes from the store itself, so this cannot fail.
        if let Err(err) = canvas.store.set_selected(hit) {
            tracing::warn!("Selection failed: {}", err);
        }
    }
}
