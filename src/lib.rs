//! Signalbox: signal control for a single four-way intersection
//!
//! Signalbox follows a "pure core, imperative shell" layout. The phase
//! cycle, phase table, override policy and safety guard are pure functions
//! in [`core`]. Everything with side effects (timing, shared state, output
//! lines, detectors) is isolated in [`controller`], [`driver`] and
//! [`sensor`].
//!
//! # Core Concepts
//!
//! - **Phase**: one of six light configurations, cycled east/west
//!   green → yellow → all-red, then north/south green → yellow → all-red
//! - **Override**: a vehicle arrival that advances the cycle early
//! - **Guard**: a predicate every override must pass before it is committed
//! - **Signal driver**: the output boundary the controller writes through
//!
//! # Example
//!
//! ```rust
//! use signalbox::core::{override_for, Axis, Guard, OverrideDecision, Phase};
//!
//! // A car waiting north/south while east/west is green ends the green early.
//! let decision = override_for(Axis::NorthSouth, Phase::EwGreen);
//! assert_eq!(decision, OverrideDecision::Jump(Phase::EwYellow));
//!
//! // The jump still clears through yellow.
//! assert!(Guard::clearance().check(&Phase::EwGreen, &Phase::EwYellow));
//! ```

pub mod config;
pub mod controller;
pub mod core;
pub mod driver;
pub mod sensor;

// Re-export commonly used types
pub use controller::{Controller, ControllerBuilder, ControllerError, ControllerStatus};
pub use self::core::{Axis, Color, Direction, Guard, OverrideDecision, Phase, PhaseTable};
pub use driver::{DriverError, SignalDriver};
