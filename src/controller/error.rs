//! Controller error types.

use crate::core::Axis;
use crate::driver::DriverError;
use thiserror::Error;

/// Errors that stop the signal cycle.
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("Signal driver failed: {0}")]
    Driver(#[from] DriverError),

    #[error("Arrival indicator for {axis} failed: {source}")]
    Indicator {
        axis: Axis,
        #[source]
        source: DriverError,
    },
}
