//! Signal driver: the hardware boundary the controller writes through.
//!
//! The controller never touches output lines directly. It calls a
//! [`SignalDriver`], which can be backed by real pins, an in-memory board,
//! or a test recorder.

mod error;
pub mod pins;

pub use error::DriverError;
pub use pins::{MemoryPins, PinBackend, PinDriver, PinMap};

use crate::core::{Axis, Color, Direction, LightConfiguration};

/// Output side of the intersection.
///
/// Methods take `&self` because the driver is shared between the scheduler
/// and indicator pulse tasks; implementations use interior mutability.
pub trait SignalDriver: Send + Sync {
    /// Light exactly one color on `direction`, switching the others off.
    fn set_light(&self, direction: Direction, color: Color) -> Result<(), DriverError>;

    /// Switch an axis's arrival indicator on or off.
    fn set_indicator(&self, axis: Axis, on: bool) -> Result<(), DriverError>;

    /// De-energize every output, signal heads and indicators alike.
    ///
    /// A failed line must not stop the remaining lines from being switched off.
    fn all_off(&self) -> Result<(), DriverError>;

    /// Apply a full light configuration.
    ///
    /// Directions turning red are written first, then yellow, then green,
    /// so no intermediate state shows both axes lit.
    fn apply(&self, config: &LightConfiguration) -> Result<(), DriverError> {
        for color in [Color::Red, Color::Yellow, Color::Green] {
            for (direction, wanted) in config.lights() {
                if wanted == color {
                    self.set_light(direction, color)?;
                }
            }
        }
        Ok(())
    }
}

impl<D: SignalDriver + ?Sized> SignalDriver for std::sync::Arc<D> {
    fn set_light(&self, direction: Direction, color: Color) -> Result<(), DriverError> {
        (**self).set_light(direction, color)
    }

    fn set_indicator(&self, axis: Axis, on: bool) -> Result<(), DriverError> {
        (**self).set_indicator(axis, on)
    }

    fn all_off(&self) -> Result<(), DriverError> {
        (**self).all_off()
    }

    fn apply(&self, config: &LightConfiguration) -> Result<(), DriverError> {
        (**self).apply(config)
    }
}
