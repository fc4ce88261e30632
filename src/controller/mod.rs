//! Imperative shell around the pure core.
//!
//! The [`Controller`] owns the current phase and the pending override slot
//! and runs two activities against them:
//!
//! - **Scheduler** ([`Controller::run_cycle`]): applies the current phase
//!   through the signal driver, holds it, then advances.
//! - **Override handler** ([`Controller::request_override`]): evaluates a
//!   vehicle arrival against the current phase and wakes the scheduler when
//!   the cycle should jump.
//!
//! Both share one lock that is never held across an `.await`. Holds are
//! cancelable: an override request or a shutdown wakes a sleeping scheduler
//! immediately.

mod builder;
mod error;
mod machine;

pub use builder::ControllerBuilder;
pub use error::ControllerError;
pub use machine::{Controller, ControllerStatus};
