//! Event type definitions for the annotation bus.
//!
//! Every event names the canvas it concerns so renderers can subscribe to a
//! single canvas. Events are cloneable and serializable for logging/replay.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::data::CanvasId;
use crate::units::Calibration;

/// Root event enum for all annotation events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AnnotationEvent {
    /// Committed marking list changed
    Markings(MarkingsEvent),
    /// Selected label changed
    Selection {
        canvas: CanvasId,
        label: Option<u32>,
    },
    /// In-progress marking was created, updated or cleared
    Temporary { canvas: CanvasId, present: bool },
    /// Canvas calibration changed
    Calibration {
        canvas: CanvasId,
        calibration: Calibration,
    },
    /// Pan, zoom or rotation changed
    View(ViewEvent),
    /// Overlay line (auto-rotate or measurement guide) changed
    Overlay { canvas: CanvasId },
}

impl AnnotationEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            AnnotationEvent::Markings(_) => EventCategory::Markings,
            AnnotationEvent::Selection { .. } => EventCategory::Selection,
            AnnotationEvent::Temporary { .. } => EventCategory::Temporary,
            AnnotationEvent::Calibration { .. } => EventCategory::Calibration,
            AnnotationEvent::View(_) => EventCategory::View,
            AnnotationEvent::Overlay { .. } => EventCategory::Overlay,
        }
    }

    /// Canvas the event concerns
    pub fn canvas(&self) -> CanvasId {
        match self {
            AnnotationEvent::Markings(e) => e.canvas(),
            AnnotationEvent::Selection { canvas, .. }
            | AnnotationEvent::Temporary { canvas, .. }
            | AnnotationEvent::Calibration { canvas, .. }
            | AnnotationEvent::Overlay { canvas } => *canvas,
            AnnotationEvent::View(e) => e.canvas(),
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            AnnotationEvent::Markings(e) => e.description(),
            AnnotationEvent::Selection { canvas, label } => match label {
                Some(label) => format!("Selected label {} on {}", label, canvas),
                None => format!("Selection cleared on {}", canvas),
            },
            AnnotationEvent::Temporary { canvas, present } => {
                format!("Temporary marking on {} present={}", canvas, present)
            }
            AnnotationEvent::Calibration {
                canvas,
                calibration,
            } => format!(
                "Calibration on {}: {} px/{}",
                canvas, calibration.pixels_per_unit, calibration.unit
            ),
            AnnotationEvent::View(e) => e.description(),
            AnnotationEvent::Overlay { canvas } => format!("Overlay changed on {}", canvas),
        }
    }
}

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    Markings,
    Selection,
    Temporary,
    Calibration,
    View,
    Overlay,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::Markings => write!(f, "Markings"),
            EventCategory::Selection => write!(f, "Selection"),
            EventCategory::Temporary => write!(f, "Temporary"),
            EventCategory::Calibration => write!(f, "Calibration"),
            EventCategory::View => write!(f, "View"),
            EventCategory::Overlay => write!(f, "Overlay"),
        }
    }
}

/// Marking-list events. `hash` is the store's new markings hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MarkingsEvent {
    /// One or more markings were committed.
    Added {
        canvas: CanvasId,
        labels: Vec<u32>,
        hash: Uuid,
    },
    /// A marking was removed.
    Removed {
        canvas: CanvasId,
        label: u32,
        hash: Uuid,
    },
    /// A committed marking was edited in place (type or origin).
    Updated {
        canvas: CanvasId,
        label: u32,
        hash: Uuid,
    },
    /// All markings were removed.
    Cleared { canvas: CanvasId, hash: Uuid },
}

impl MarkingsEvent {
    pub fn canvas(&self) -> CanvasId {
        match self {
            MarkingsEvent::Added { canvas, .. }
            | MarkingsEvent::Removed { canvas, .. }
            | MarkingsEvent::Updated { canvas, .. }
            | MarkingsEvent::Cleared { canvas, .. } => *canvas,
        }
    }

    pub fn hash(&self) -> Uuid {
        match self {
            MarkingsEvent::Added { hash, .. }
            | MarkingsEvent::Removed { hash, .. }
            | MarkingsEvent::Updated { hash, .. }
            | MarkingsEvent::Cleared { hash, .. } => *hash,
        }
    }

    fn description(&self) -> String {
        match self {
            MarkingsEvent::Added { canvas, labels, .. } => {
                format!("Added {} marking(s) on {}", labels.len(), canvas)
            }
            MarkingsEvent::Removed { canvas, label, .. } => {
                format!("Removed marking {} on {}", label, canvas)
            }
            MarkingsEvent::Updated { canvas, label, .. } => {
                format!("Updated marking {} on {}", label, canvas)
            }
            MarkingsEvent::Cleared { canvas, .. } => format!("Cleared markings on {}", canvas),
        }
    }
}

/// Viewport events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ViewEvent {
    Rotated { canvas: CanvasId, rotation: f64 },
    Zoomed { canvas: CanvasId, zoom: f64 },
    Panned { canvas: CanvasId, x: f64, y: f64 },
}

impl ViewEvent {
    pub fn canvas(&self) -> CanvasId {
        match self {
            ViewEvent::Rotated { canvas, .. }
            | ViewEvent::Zoomed { canvas, .. }
            | ViewEvent::Panned { canvas, .. } => *canvas,
        }
    }

    fn description(&self) -> String {
        match self {
            ViewEvent::Rotated { canvas, rotation } => {
                format!("Rotated {} to {:.3} rad", canvas, rotation)
            }
            ViewEvent::Zoomed { canvas, zoom } => format!("Zoomed {} to {:.2}", canvas, zoom),
            ViewEvent::Panned { canvas, x, y } => {
                format!("Panned {} to ({:.1}, {:.1})", canvas, x, y)
            }
        }
    }
}
