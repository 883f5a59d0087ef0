//! Per-canvas annotation store.
//!
//! Owns the committed markings of one canvas together with the in-progress
//! (temporary) marking, the selected label and the calibration. Every
//! mutation is synchronous and publishes one [`AnnotationEvent`]; mutations
//! of the committed list also regenerate the markings hash, which renderers
//! use as a cheap equality token.

use ridgeline_core::{
    AnnotationEvent, Calibration, CanvasId, EventBus, IntegrityError, MarkingsEvent, Point,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::labels::duplicate_labels;
use crate::model::{Marking, MarkingPatch};

#[derive(Debug)]
pub struct MarkingsStore {
    canvas: CanvasId,
    markings: Vec<Marking>,
    markings_hash: Uuid,
    selected_label: Option<u32>,
    temporary: Option<Marking>,
    temporary_revision: u64,
    calibration: Calibration,
    bus: Arc<EventBus>,
}

impl MarkingsStore {
    pub fn new(canvas: CanvasId, bus: Arc<EventBus>) -> Self {
        Self {
            canvas,
            markings: Vec::new(),
            markings_hash: Uuid::new_v4(),
            selected_label: None,
            temporary: None,
            temporary_revision: 0,
            calibration: Calibration::default(),
            bus,
        }
    }

    pub fn canvas(&self) -> CanvasId {
        self.canvas
    }

    pub fn markings(&self) -> &[Marking] {
        &self.markings
    }

    pub fn markings_hash(&self) -> Uuid {
        self.markings_hash
    }

    pub fn selected_label(&self) -> Option<u32> {
        self.selected_label
    }

    pub fn temporary(&self) -> Option<&Marking> {
        self.temporary.as_ref()
    }

    /// Bumped on every change of the temporary marking.
    pub fn temporary_revision(&self) -> u64 {
        self.temporary_revision
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn find(&self, label: u32) -> Option<&Marking> {
        self.markings.iter().find(|m| m.label == label)
    }

    pub fn max_label(&self) -> Option<u32> {
        self.markings.iter().map(|m| m.label).max()
    }

    pub fn add_one(&mut self, marking: Marking) {
        let label = marking.label;
        self.markings.push(marking);
        self.markings_changed(MarkingsEvent::Added {
            canvas: self.canvas,
            labels: vec![label],
            hash: Uuid::nil(),
        });
        tracing::info!("Committed marking {} on {} canvas", label, self.canvas);
    }

    /// Commits a batch with a single notification.
    pub fn add_many(&mut self, markings: Vec<Marking>) {
        if markings.is_empty() {
            return;
        }
        let labels: Vec<u32> = markings.iter().map(|m| m.label).collect();
        self.markings.extend(markings);
        tracing::info!("Committed {} markings on {} canvas", labels.len(), self.canvas);
        self.markings_changed(MarkingsEvent::Added {
            canvas: self.canvas,
            labels,
            hash: Uuid::nil(),
        });
    }

    /// Replaces the temporary marking. Clearing an absent one is a no-op.
    pub fn set_temporary(&mut self, marking: Option<Marking>) {
        if marking.is_none() && self.temporary.is_none() {
            return;
        }
        self.temporary = marking;
        self.temporary_changed();
    }

    /// Shallow-merges `patch` into the temporary marking. Returns false when
    /// there is none.
    pub fn update_temporary(&mut self, patch: &MarkingPatch) -> bool {
        let Some(temporary) = self.temporary.as_mut() else {
            return false;
        };
        if patch.is_empty() {
            return true;
        }
        temporary.apply(patch);
        self.temporary_changed();
        true
    }

    /// Moves the temporary marking into the committed list.
    pub fn commit_temporary(&mut self) -> Option<u32> {
        let marking = self.temporary.take()?;
        let label = marking.label;
        self.temporary_changed();
        self.add_one(marking);
        Some(label)
    }

    pub fn remove_by_label(&mut self, label: u32) -> Option<Marking> {
        let index = self.markings.iter().position(|m| m.label == label)?;
        let removed = self.markings.remove(index);
        if self.selected_label == Some(label) {
            self.set_selected_unchecked(None);
        }
        self.markings_changed(MarkingsEvent::Removed {
            canvas: self.canvas,
            label,
            hash: Uuid::nil(),
        });
        Some(removed)
    }

    pub fn clear(&mut self) {
        if self.markings.is_empty() {
            return;
        }
        self.markings.clear();
        if self.selected_label.is_some() {
            self.set_selected_unchecked(None);
        }
        self.markings_changed(MarkingsEvent::Cleared {
            canvas: self.canvas,
            hash: Uuid::nil(),
        });
    }

    /// Selects a committed marking, or clears the selection with `None`.
    pub fn set_selected(&mut self, label: Option<u32>) -> Result<(), IntegrityError> {
        if let Some(label) = label {
            if self.find(label).is_none() {
                return Err(IntegrityError::UnknownLabel { label });
            }
        }
        if self.selected_label != label {
            self.set_selected_unchecked(label);
        }
        Ok(())
    }

    pub fn set_calibration(&mut self, calibration: Calibration) {
        if self.calibration == calibration {
            return;
        }
        self.calibration = calibration.clone();
        self.bus.publish(AnnotationEvent::Calibration {
            canvas: self.canvas,
            calibration,
        });
    }

    /// Changes the type of a committed marking (selection tool edit).
    pub fn set_marking_type(&mut self, label: u32, type_id: &str) -> Result<(), IntegrityError> {
        self.edit(label, |m| {
            if m.type_id == type_id {
                false
            } else {
                m.type_id = type_id.to_string();
                true
            }
        })
    }

    /// Moves the origin of a committed marking (selection tool edit).
    pub fn move_marking_origin(&mut self, label: u32, origin: Point) -> Result<(), IntegrityError> {
        self.edit(label, |m| {
            if m.origin == origin {
                false
            } else {
                m.origin = origin;
                true
            }
        })
    }

    /// Reports duplicate labels in the committed list.
    pub fn validate_labels(&self) -> Result<(), IntegrityError> {
        match duplicate_labels(&self.markings).first() {
            Some(&label) => Err(IntegrityError::DuplicateLabel {
                label,
                canvas: self.canvas.to_string(),
            }),
            None => Ok(()),
        }
    }

    fn edit<F>(&mut self, label: u32, f: F) -> Result<(), IntegrityError>
    where
        F: FnOnce(&mut Marking) -> bool,
    {
        let marking = self
            .markings
            .iter_mut()
            .find(|m| m.label == label)
            .ok_or(IntegrityError::UnknownLabel { label })?;
        if f(marking) {
            self.markings_changed(MarkingsEvent::Updated {
                canvas: self.canvas,
                label,
                hash: Uuid::nil(),
            });
        }
        Ok(())
    }

    fn set_selected_unchecked(&mut self, label: Option<u32>) {
        self.selected_label = label;
        self.bus.publish(AnnotationEvent::Selection {
            canvas: self.canvas,
            label,
        });
    }

    fn temporary_changed(&mut self) {
        self.temporary_revision = self.temporary_revision.wrapping_add(1);
        self.bus.publish(AnnotationEvent::Temporary {
            canvas: self.canvas,
            present: self.temporary.is_some(),
        });
    }

    /// Regenerates the hash, stamps it into the event and publishes it.
    fn markings_changed(&mut self, mut event: MarkingsEvent) {
        self.markings_hash = Uuid::new_v4();
        match &mut event {
            MarkingsEvent::Added { hash, .. }
            | MarkingsEvent::Removed { hash, .. }
            | MarkingsEvent::Updated { hash, .. }
            | MarkingsEvent::Cleared { hash, .. } => *hash = self.markings_hash,
        }

        #[cfg(debug_assertions)]
        if let Err(err) = self.validate_labels() {
            tracing::error!("{}", err);
        }

        self.bus.publish(AnnotationEvent::Markings(event));
    }
}
