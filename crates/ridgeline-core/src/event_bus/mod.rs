//! # Event Bus Module
//!
//! Change notification for the annotation engine. Every store mutation with
//! a visible effect publishes exactly one event; renderers subscribe once per
//! canvas and redraw when notified.
//!
//! ## Usage
//!
//! ```rust
//! use ridgeline_core::data::CanvasId;
//! use ridgeline_core::event_bus::{EventBus, EventFilter};
//!
//! let bus = EventBus::new();
//! let subscription = bus.subscribe(EventFilter::Canvas(CanvasId::Left), |event| {
//!     println!("{}", event.description());
//! });
//! bus.unsubscribe(subscription);
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
