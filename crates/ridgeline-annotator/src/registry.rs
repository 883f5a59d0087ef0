//! Canvas registry.
//!
//! Owns every canvas of a session, keyed by [`CanvasId`], together with the
//! state the canvases share: the label generator, the marking types and the
//! working mode. Cross-canvas rules (type usage, opposite-canvas lookups)
//! are implemented here.

use ridgeline_core::{
    AnnotationEvent, CanvasId, EventBus, IntegrityError, Point, ViewEvent, WorkingMode,
};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use crate::info::{merged_rows, InfoRow};
use crate::labels::LabelGenerator;
use crate::marking_types::MarkingTypes;
use crate::model::{Marking, MarkingType};
use crate::overlay::{GuideLine, OverlayLines};
use crate::store::MarkingsStore;
use crate::trace::TracingStore;
use crate::viewport::CanvasViewport;

/// Everything that belongs to one canvas.
#[derive(Debug)]
pub struct Canvas {
    id: CanvasId,
    pub store: MarkingsStore,
    pub viewport: CanvasViewport,
    overlay: OverlayLines,
    traces: TracingStore,
    ray_position: Option<Point>,
    bus: Arc<EventBus>,
}

impl Canvas {
    pub fn new(id: CanvasId, bus: Arc<EventBus>) -> Self {
        Self {
            id,
            store: MarkingsStore::new(id, bus.clone()),
            viewport: CanvasViewport::default(),
            overlay: OverlayLines::default(),
            traces: TracingStore::new(),
            ray_position: None,
            bus,
        }
    }

    pub fn id(&self) -> CanvasId {
        self.id
    }

    pub fn overlay(&self) -> &OverlayLines {
        &self.overlay
    }

    pub fn traces(&self) -> &TracingStore {
        &self.traces
    }

    /// Runs `edit` on the tracing layer and announces the change as an
    /// overlay event when anything visible moved.
    pub fn edit_traces<R>(&mut self, edit: impl FnOnce(&mut TracingStore) -> R) -> R {
        let before = self.traces.revision();
        let result = edit(&mut self.traces);
        if self.traces.revision() != before {
            self.publish_overlay();
        }
        result
    }

    /// Last position recorded by a two-stage tool between its stages.
    pub fn ray_position(&self) -> Option<Point> {
        self.ray_position
    }

    pub fn set_ray_position(&mut self, position: Option<Point>) {
        self.ray_position = position;
    }

    pub fn set_overlay_temp(&mut self, line: Option<GuideLine>) {
        if self.overlay.set_temp(line) {
            self.publish_overlay();
        }
    }

    pub fn finish_overlay(&mut self, line: GuideLine) {
        self.overlay.finish(line);
        self.publish_overlay();
    }

    pub fn set_rotation(&mut self, rotation: f64) {
        if self.viewport.set_rotation(rotation) {
            self.bus.publish(AnnotationEvent::View(ViewEvent::Rotated {
                canvas: self.id,
                rotation,
            }));
        }
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        if self.viewport.set_zoom(zoom) {
            self.bus.publish(AnnotationEvent::View(ViewEvent::Zoomed {
                canvas: self.id,
                zoom: self.viewport.zoom(),
            }));
        }
    }

    pub fn set_pan(&mut self, x: f64, y: f64) {
        if self.viewport.set_pan(x, y) {
            self.bus.publish(AnnotationEvent::View(ViewEvent::Panned {
                canvas: self.id,
                x,
                y,
            }));
        }
    }

    /// Rotates the canvas so the finished auto-rotate line is horizontal.
    pub fn apply_auto_rotation(&mut self) -> Option<f64> {
        let rotation = self.overlay.alignment_rotation()?;
        self.set_rotation(rotation);
        Some(rotation)
    }

    fn publish_overlay(&self) {
        self.bus
            .publish(AnnotationEvent::Overlay { canvas: self.id });
    }
}

/// All canvases of a session plus their shared state.
#[derive(Debug)]
pub struct CanvasRegistry {
    canvases: BTreeMap<CanvasId, Canvas>,
    labels: LabelGenerator,
    types: MarkingTypes,
    working_mode: WorkingMode,
    bus: Arc<EventBus>,
}

impl CanvasRegistry {
    pub fn new(working_mode: WorkingMode) -> Self {
        Self::with_bus(working_mode, Arc::new(EventBus::new()))
    }

    pub fn with_bus(working_mode: WorkingMode, bus: Arc<EventBus>) -> Self {
        let canvases = CanvasId::ALL
            .into_iter()
            .map(|id| (id, Canvas::new(id, bus.clone())))
            .collect();
        Self {
            canvases,
            labels: LabelGenerator::new(),
            types: MarkingTypes::new(),
            working_mode,
            bus,
        }
    }

    pub fn with_types(mut self, types: Vec<MarkingType>) -> Self {
        self.types.add_many(types);
        self
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    // Every CanvasId is inserted in `with_bus` and never removed.
    pub fn canvas(&self, id: CanvasId) -> &Canvas {
        &self.canvases[&id]
    }

    pub fn canvas_mut(&mut self, id: CanvasId) -> &mut Canvas {
        let bus = &self.bus;
        self.canvases
            .entry(id)
            .or_insert_with(|| Canvas::new(id, bus.clone()))
    }

    pub fn store(&self, id: CanvasId) -> &MarkingsStore {
        &self.canvas(id).store
    }

    pub fn store_mut(&mut self, id: CanvasId) -> &mut MarkingsStore {
        &mut self.canvas_mut(id).store
    }

    /// The mirror canvas of `id`.
    pub fn opposite(&self, id: CanvasId) -> &Canvas {
        self.canvas(id.opposite())
    }

    /// Canvas and label generator borrowed together for handlers.
    pub fn canvas_and_labels(&mut self, id: CanvasId) -> (&mut Canvas, &mut LabelGenerator) {
        let bus = &self.bus;
        let canvas = self
            .canvases
            .entry(id)
            .or_insert_with(|| Canvas::new(id, bus.clone()));
        (canvas, &mut self.labels)
    }

    pub fn labels(&self) -> &LabelGenerator {
        &self.labels
    }

    pub fn labels_mut(&mut self) -> &mut LabelGenerator {
        &mut self.labels
    }

    pub fn next_label(&mut self) -> u32 {
        self.labels.next_label()
    }

    /// Commits markings that already carry their labels, such as a
    /// restored session, and moves the generator past the highest one.
    /// A label already used on `canvas` rejects the whole batch.
    pub fn adopt_markings(
        &mut self,
        canvas: CanvasId,
        markings: Vec<Marking>,
    ) -> Result<(), IntegrityError> {
        let mut seen: HashSet<u32> = self.store(canvas).markings().iter().map(|m| m.label).collect();
        if let Some(m) = markings.iter().find(|m| !seen.insert(m.label)) {
            return Err(IntegrityError::DuplicateLabel {
                label: m.label,
                canvas: canvas.to_string(),
            });
        }
        if let Some(highest) = markings.iter().map(|m| m.label).max() {
            self.labels.ensure_above(highest);
        }
        self.store_mut(canvas).add_many(markings);
        Ok(())
    }

    pub fn types(&self) -> &MarkingTypes {
        &self.types
    }

    pub fn types_mut(&mut self) -> &mut MarkingTypes {
        &mut self.types
    }

    pub fn working_mode(&self) -> WorkingMode {
        self.working_mode
    }

    /// Switching the working mode resets type visibility.
    pub fn set_working_mode(&mut self, mode: WorkingMode) {
        if self.working_mode != mode {
            tracing::info!("Working mode {} -> {}", self.working_mode, mode);
            self.working_mode = mode;
            self.types.reset_visibility();
        }
    }

    /// Number of markings on any canvas that use `type_id`.
    pub fn type_usage(&self, type_id: &str) -> usize {
        self.canvases
            .values()
            .flat_map(|c| c.store.markings())
            .filter(|m| m.type_id == type_id)
            .count()
    }

    /// Registered types used by at least one marking on any canvas.
    pub fn types_in_use(&self) -> Vec<&MarkingType> {
        self.types
            .all()
            .iter()
            .filter(|t| self.type_usage(&t.id) > 0)
            .collect()
    }

    /// Removes a marking type unless a marking still uses it.
    pub fn remove_marking_type(&mut self, type_id: &str) -> Result<MarkingType, IntegrityError> {
        let count = self.type_usage(type_id);
        if count > 0 {
            tracing::warn!("Refusing to remove marking type {} ({} in use)", type_id, count);
            return Err(IntegrityError::TypeInUse {
                type_id: type_id.to_string(),
                count,
            });
        }
        self.types
            .remove_unchecked(type_id)
            .ok_or_else(|| IntegrityError::MissingType {
                type_id: type_id.to_string(),
            })
    }

    /// Information-table rows for `id`, merged with the opposite canvas.
    pub fn info_rows(&self, id: CanvasId) -> Vec<InfoRow<'_>> {
        merged_rows(
            self.store(id).markings(),
            self.store(id.opposite()).markings(),
        )
    }

    /// Runs the label integrity check on every canvas.
    pub fn validate_labels(&self) -> Result<(), IntegrityError> {
        self.canvases
            .values()
            .try_for_each(|c| c.store.validate_labels())
    }
}
