//! Driver error types.

use thiserror::Error;

/// Errors raised by the output side.
///
/// None of these are retried: a light that cannot be driven is a safety
/// condition software cannot repair.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DriverError {
    /// Writing an output line failed
    #[error("Failed to drive output line {pin}: {reason}")]
    Write { pin: u8, reason: String },

    /// No output line is assigned to a lamp or indicator
    #[error("No output line mapped for {target}")]
    Unmapped { target: String },
}
