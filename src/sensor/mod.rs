//! Vehicle detection: arrival events, debouncing and the override handler.
//!
//! Detectors feed [`ArrivalEvent`]s into a bounded channel. A dedicated
//! handler task drains it and calls into the controller, so detector timing
//! never reaches the transition logic.

mod debounce;
mod handler;
mod lines;

pub use debounce::{Debouncer, DEFAULT_DEBOUNCE};
pub use handler::run_override_handler;
pub use lines::{parse_axis, LineSensor};

use crate::core::Axis;
use tokio::time::Instant;

/// A vehicle detected on an axis. Consumed by the handler, never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArrivalEvent {
    pub axis: Axis,
    pub at: Instant,
}

impl ArrivalEvent {
    pub fn new(axis: Axis, at: Instant) -> Self {
        Self { axis, at }
    }

    /// Arrival on `axis` detected now.
    pub fn now(axis: Axis) -> Self {
        Self::new(axis, Instant::now())
    }
}
