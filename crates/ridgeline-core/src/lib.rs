//! # Ridgeline Core
//!
//! Core types, errors and change notification for Ridgeline.
//! Provides the value types shared by the annotation engine and the
//! external tool layer.

pub mod data;
pub mod error;
pub mod event_bus;
pub mod units;

pub use data::{CanvasId, MinutiaKind, MinutiaRecord, Point, WorkingMode};

pub use error::{Error, GeometryError, ImportError, IntegrityError, Result};

pub use event_bus::{
    AnnotationEvent, EventBus, EventBusConfig, EventCategory, EventFilter, MarkingsEvent,
    SubscriptionId, ViewEvent,
};

pub use units::{Calibration, PIXEL_UNIT};
