//! Pin-level driver: maps lamps and indicators to numbered output lines.

use super::{DriverError, SignalDriver};
use crate::core::{Axis, Color, Direction};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{trace, warn};

/// Assignment of lamps, indicators and detector inputs to line numbers.
///
/// The default is the BOARD-numbered wiring of the reference intersection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PinMap {
    /// Signal head lamps, per direction and color
    pub lights: BTreeMap<Direction, BTreeMap<Color, u8>>,
    /// Arrival indicator per axis
    pub indicators: BTreeMap<Axis, u8>,
    /// Detector input per axis. Informational; inputs are read by the sensor source.
    pub sensors: BTreeMap<Axis, u8>,
}

impl Default for PinMap {
    fn default() -> Self {
        let head = |green, yellow, red| {
            BTreeMap::from([(Color::Green, green), (Color::Yellow, yellow), (Color::Red, red)])
        };

        Self {
            lights: BTreeMap::from([
                (Direction::North, head(3, 5, 7)),
                (Direction::South, head(8, 10, 12)),
                (Direction::East, head(19, 21, 23)),
                (Direction::West, head(22, 24, 26)),
            ]),
            indicators: BTreeMap::from([(Axis::NorthSouth, 37), (Axis::EastWest, 35)]),
            sensors: BTreeMap::from([(Axis::NorthSouth, 40), (Axis::EastWest, 38)]),
        }
    }
}

impl PinMap {
    pub fn light_pin(&self, direction: Direction, color: Color) -> Option<u8> {
        self.lights.get(&direction)?.get(&color).copied()
    }

    pub fn indicator_pin(&self, axis: Axis) -> Option<u8> {
        self.indicators.get(&axis).copied()
    }

    /// Every output line, lamps first, then indicators.
    pub fn output_pins(&self) -> Vec<u8> {
        self.lights
            .values()
            .flat_map(|head| head.values().copied())
            .chain(self.indicators.values().copied())
            .collect()
    }
}

/// Raw output lines.
pub trait PinBackend: Send + Sync {
    fn write(&self, pin: u8, high: bool) -> Result<(), DriverError>;
}

/// In-process board that remembers the level of every line it was asked to drive.
///
/// Used when no hardware is attached and by tests.
#[derive(Debug, Default)]
pub struct MemoryPins {
    levels: Mutex<BTreeMap<u8, bool>>,
}

impl MemoryPins {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current level of a line. Lines never written read low.
    pub fn level(&self, pin: u8) -> bool {
        self.levels.lock().get(&pin).copied().unwrap_or(false)
    }

    /// Lines currently driven high, in ascending order.
    pub fn high_pins(&self) -> Vec<u8> {
        self.levels
            .lock()
            .iter()
            .filter(|(_, high)| **high)
            .map(|(pin, _)| *pin)
            .collect()
    }
}

impl PinBackend for MemoryPins {
    fn write(&self, pin: u8, high: bool) -> Result<(), DriverError> {
        trace!(pin, high, "write output line");
        self.levels.lock().insert(pin, high);
        Ok(())
    }
}

/// [`SignalDriver`] over a [`PinBackend`] using a [`PinMap`].
pub struct PinDriver<B: PinBackend> {
    pins: PinMap,
    backend: B,
}

impl<B: PinBackend> PinDriver<B> {
    pub fn new(pins: PinMap, backend: B) -> Self {
        Self { pins, backend }
    }

    pub fn pins(&self) -> &PinMap {
        &self.pins
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn light_pin(&self, direction: Direction, color: Color) -> Result<u8, DriverError> {
        self.pins
            .light_pin(direction, color)
            .ok_or_else(|| DriverError::Unmapped {
                target: format!("{direction}_{color}"),
            })
    }
}

impl<B: PinBackend> SignalDriver for PinDriver<B> {
    fn set_light(&self, direction: Direction, color: Color) -> Result<(), DriverError> {
        // Resolve every line before writing so an unmapped lamp leaves the head untouched.
        let target = self.light_pin(direction, color)?;
        let others = Color::ALL
            .iter()
            .filter(|c| **c != color)
            .map(|c| self.light_pin(direction, *c))
            .collect::<Result<Vec<_>, _>>()?;

        for pin in others {
            self.backend.write(pin, false)?;
        }
        self.backend.write(target, true)
    }

    fn set_indicator(&self, axis: Axis, on: bool) -> Result<(), DriverError> {
        let pin = self
            .pins
            .indicator_pin(axis)
            .ok_or_else(|| DriverError::Unmapped {
                target: format!("{axis}_indicator"),
            })?;
        self.backend.write(pin, on)
    }

    /// Drives every line low even if some writes fail; the first failure is returned.
    fn all_off(&self) -> Result<(), DriverError> {
        let mut first_err = None;
        for pin in self.pins.output_pins() {
            if let Err(err) = self.backend.write(pin, false) {
                warn!(pin, error = %err, "Failed to switch output line off");
                first_err.get_or_insert(err);
            }
        }

        match first_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
