//! Marking rendering pipeline.
//!
//! [`render_frame`] is stateless: it clears the surface and repaints the
//! committed markings, then the temporary marking, then the tracing
//! strokes and the overlay guide lines. [`Renderer`] decides when a canvas needs that repaint, using a
//! dirty flag fed by the event bus plus a [`FrameKey`] of every declared
//! input.

mod blink;
mod font;
mod pixmap;
mod recording;
mod shapes;
mod surface;

pub use blink::Blink;
pub use pixmap::PixmapSurface;
pub use recording::{DrawCommand, RecordingSurface};
pub use shapes::{label_font_size, paint_marking, PaintStyle, Projection};
pub use surface::{text_extent, DrawSurface, LineStyle, TextStyle};

use ridgeline_core::{Calibration, CanvasId, EventBus, EventFilter, SubscriptionId};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use uuid::Uuid;

use crate::marking_types::MarkingTypes;
use crate::model::{Color, Marking, ViewportRatios};
use crate::overlay::{GuideLine, OverlayLines};
use crate::registry::Canvas;
use crate::trace::TracingPath;

const GUIDE_COLOR: Color = Color::rgb(0x00, 0xff, 0xff);
const GUIDE_WIDTH: f64 = 1.5;

/// Display switches that affect every marking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    pub show_labels: bool,
    /// Layer opacity when labels are hidden.
    pub unlabeled_alpha: f64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_labels: true,
            unlabeled_alpha: 0.5,
        }
    }
}

impl RenderOptions {
    fn layer_alpha(&self) -> f64 {
        if self.show_labels {
            1.0
        } else {
            self.unlabeled_alpha
        }
    }
}

/// Everything one frame is drawn from.
#[derive(Debug, Clone, Copy)]
pub struct FrameInput<'a> {
    pub markings: &'a [Marking],
    pub temporary: Option<&'a Marking>,
    pub overlay: &'a OverlayLines,
    pub traces: &'a [TracingPath],
    pub types: &'a MarkingTypes,
    pub selected: Option<u32>,
    pub calibration: &'a Calibration,
    pub projection: Projection,
    pub options: RenderOptions,
    pub blink: Option<Blink>,
    pub now_ms: u64,
}

impl<'a> FrameInput<'a> {
    pub fn from_canvas(canvas: &'a Canvas, types: &'a MarkingTypes, options: RenderOptions) -> Self {
        let (image_w, image_h) = canvas.viewport.image_size();
        Self {
            markings: canvas.store.markings(),
            temporary: canvas.store.temporary(),
            overlay: canvas.overlay(),
            traces: canvas.traces().paths(),
            types,
            selected: canvas.store.selected_label(),
            calibration: canvas.store.calibration(),
            projection: Projection::new(
                canvas.viewport.ratios(),
                canvas.viewport.rotation(),
                image_w,
                image_h,
            ),
            options,
            blink: None,
            now_ms: 0,
        }
    }

    pub fn with_blink(mut self, blink: Option<Blink>, now_ms: u64) -> Self {
        self.blink = blink;
        self.now_ms = now_ms;
        self
    }

    fn emphasize(&self, label: u32) -> bool {
        self.blink
            .and_then(|b| b.emphasis(label, self.now_ms))
            .unwrap_or(self.selected == Some(label))
    }
}

/// Clears `surface` and draws one complete frame. Returns the number of
/// markings painted.
pub fn render_frame(surface: &mut dyn DrawSurface, input: &FrameInput<'_>) -> usize {
    surface.clear();
    let alpha = input.options.layer_alpha();
    let mut painted = 0;

    let visible = input
        .markings
        .iter()
        .filter(|m| !input.types.is_hidden(&m.type_id));
    for marking in visible.chain(input.temporary) {
        let Some(marking_type) = input.types.resolve_for_render(&marking.type_id) else {
            tracing::debug!(
                "Skipping marking {}: unknown type {}",
                marking.label,
                marking.type_id
            );
            continue;
        };
        let style = PaintStyle {
            marking_type,
            emphasize: input.emphasize(marking.label),
            show_labels: input.options.show_labels,
            alpha,
            calibration: input.calibration,
        };
        paint_marking(surface, marking, &input.projection, &style);
        painted += 1;
    }

    for path in input.traces {
        draw_trace(surface, path, &input.projection);
    }

    let guides = [
        input.overlay.auto_rotate_finished,
        input.overlay.auto_rotate_temp,
    ];
    for line in guides.into_iter().flatten() {
        draw_guide(surface, &line, &input.projection);
    }
    painted
}

fn draw_guide(surface: &mut dyn DrawSurface, line: &GuideLine, projection: &Projection) {
    surface.line(
        projection.apply(line.start),
        projection.apply(line.end),
        LineStyle::new(GUIDE_COLOR, GUIDE_WIDTH),
    );
}

fn draw_trace(surface: &mut dyn DrawSurface, path: &TracingPath, projection: &Projection) {
    let color = path.color.with_alpha(path.opacity);
    let scale = (projection.ratios.width + projection.ratios.height) / 2.0;
    let width = path.brush_size * scale;
    let points: Vec<_> = path.points.iter().map(|p| projection.apply(*p)).collect();
    match points.as_slice() {
        [] => {}
        [dot] => surface.circle(*dot, width / 2.0, Some(color), None),
        _ => surface.polyline(&points, false, LineStyle::new(color, width)),
    }
}

/// The declared inputs of a frame. Two equal keys draw the same frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameKey {
    pub markings_hash: Uuid,
    pub selected: Option<u32>,
    pub rotation: f64,
    pub ratios: ViewportRatios,
    pub calibration: Calibration,
    pub show_labels: bool,
    pub temporary_revision: u64,
    pub overlay_revision: u64,
    pub tracing_revision: u64,
}

impl FrameKey {
    pub fn from_canvas(canvas: &Canvas, options: &RenderOptions) -> Self {
        Self {
            markings_hash: canvas.store.markings_hash(),
            selected: canvas.store.selected_label(),
            rotation: canvas.viewport.rotation(),
            ratios: canvas.viewport.ratios(),
            calibration: canvas.store.calibration().clone(),
            show_labels: options.show_labels,
            temporary_revision: canvas.store.temporary_revision(),
            overlay_revision: canvas.overlay().revision(),
            tracing_revision: canvas.traces().revision(),
        }
    }
}

/// Redraw scheduler for one canvas.
#[derive(Debug)]
pub struct Renderer {
    canvas: CanvasId,
    options: RenderOptions,
    dirty: Arc<AtomicBool>,
    subscription: Option<SubscriptionId>,
    last_key: Option<FrameKey>,
    blink: Option<Blink>,
    frames: u64,
}

impl Renderer {
    pub fn new(canvas: CanvasId, options: RenderOptions) -> Self {
        Self {
            canvas,
            options,
            dirty: Arc::new(AtomicBool::new(true)),
            subscription: None,
            last_key: None,
            blink: None,
            frames: 0,
        }
    }

    pub fn canvas(&self) -> CanvasId {
        self.canvas
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: RenderOptions) {
        if self.options != options {
            self.options = options;
            self.invalidate();
        }
    }

    /// Subscribes to this canvas's events. Calling it twice keeps a single
    /// subscription.
    pub fn attach(&mut self, bus: &EventBus) {
        if self.subscription.is_some() {
            return;
        }
        let dirty = self.dirty.clone();
        let id = bus.subscribe(EventFilter::Canvas(self.canvas), move |_event| {
            dirty.store(true, Ordering::Release);
        });
        self.subscription = Some(id);
    }

    pub fn detach(&mut self, bus: &EventBus) -> bool {
        match self.subscription.take() {
            Some(id) => bus.unsubscribe(id),
            None => false,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// Forces the next `needs_redraw` to return true, e.g. after type
    /// visibility changed.
    pub fn invalidate(&self) {
        self.dirty.store(true, Ordering::Release);
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    pub fn start_blink(&mut self, label: u32, flashes: u32, period_ms: u64, now_ms: u64) {
        self.blink = Some(Blink::start(label, flashes, period_ms, now_ms));
    }

    pub fn blink(&self) -> Option<&Blink> {
        self.blink.as_ref()
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames
    }

    /// True when any declared input changed since the last frame, or a
    /// blink is running (or just ended and its last phase must be erased).
    pub fn needs_redraw(&self, key: &FrameKey, _now_ms: u64) -> bool {
        self.is_dirty() || self.blink.is_some() || self.last_key.as_ref() != Some(key)
    }

    /// Draws a frame if one is needed. Returns whether it drew.
    pub fn render(
        &mut self,
        surface: &mut dyn DrawSurface,
        canvas: &Canvas,
        types: &MarkingTypes,
        now_ms: u64,
    ) -> bool {
        let key = FrameKey::from_canvas(canvas, &self.options);
        if !self.needs_redraw(&key, now_ms) {
            return false;
        }
        let blink = self.blink.filter(|b| b.is_active(now_ms));
        let input = FrameInput::from_canvas(canvas, types, self.options).with_blink(blink, now_ms);
        render_frame(surface, &input);

        self.blink = blink;
        self.last_key = Some(key);
        self.dirty.store(false, Ordering::Release);
        self.frames += 1;
        true
    }
}
