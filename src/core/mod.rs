//! Pure core of the intersection controller.
//!
//! This module contains the logic with no side effects:
//! - Phase, axis, direction and color values
//! - The phase table mapping phases to light configurations
//! - The override policy for vehicle arrivals
//! - Guard predicates over phase transitions
//! - Bounded transition history
//!
//! Everything that touches hardware, time or shared state lives in the
//! `controller`, `driver` and `sensor` modules.

mod guard;
mod history;
mod phase;
mod policy;
mod table;

pub use guard::Guard;
pub use history::{PhaseHistory, PhaseTransition, TransitionCause, DEFAULT_HISTORY_CAPACITY};
pub use phase::{Axis, Color, Direction, Phase};
pub use policy::{override_for, OverrideDecision};
pub use table::{LightConfiguration, PhaseTable, PhaseTimings};
