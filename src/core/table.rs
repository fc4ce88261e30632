//! Static mapping from phase to light configuration and hold duration.

use super::phase::{Axis, Color, Direction, Phase};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Nominal hold durations for each color, shared by both axes.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct PhaseTimings {
    pub green: Duration,
    pub yellow: Duration,
    pub red: Duration,
}

impl PhaseTimings {
    /// Reference timings: 5 s green, 3 s yellow, 1.75 s all-red.
    pub const REFERENCE: PhaseTimings = PhaseTimings {
        green: Duration::from_secs(5),
        yellow: Duration::from_secs(3),
        red: Duration::from_millis(1750),
    };

    /// Length of one full default cycle through all six phases.
    pub fn cycle_length(&self) -> Duration {
        (self.green + self.yellow + self.red) * 2
    }
}

impl Default for PhaseTimings {
    fn default() -> Self {
        Self::REFERENCE
    }
}

/// Light configuration for a single phase.
///
/// North and south always share a color, as do east and west, and at most
/// one axis shows anything other than red.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct LightConfiguration {
    pub phase: Phase,
    pub north_south: Color,
    pub east_west: Color,
    /// How long the phase is held absent an override
    pub hold: Duration,
}

impl LightConfiguration {
    /// Color shown on a single direction.
    pub fn color(&self, direction: Direction) -> Color {
        self.axis_color(direction.axis())
    }

    pub fn axis_color(&self, axis: Axis) -> Color {
        match axis {
            Axis::NorthSouth => self.north_south,
            Axis::EastWest => self.east_west,
        }
    }

    /// Every direction paired with its color.
    pub fn lights(&self) -> [(Direction, Color); 4] {
        Direction::ALL.map(|direction| (direction, self.color(direction)))
    }
}

/// Pure lookup from phase to light configuration.
///
/// # Example
///
/// ```rust
/// use signalbox::core::{Color, Direction, Phase, PhaseTable};
/// use std::time::Duration;
///
/// let table = PhaseTable::default();
/// let config = table.config_for(Phase::NsYellow);
///
/// assert_eq!(config.color(Direction::North), Color::Yellow);
/// assert_eq!(config.color(Direction::East), Color::Red);
/// assert_eq!(config.hold, Duration::from_secs(3));
/// ```
#[derive(Clone, Copy, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct PhaseTable {
    timings: PhaseTimings,
}

impl PhaseTable {
    pub fn new(timings: PhaseTimings) -> Self {
        Self { timings }
    }

    pub fn timings(&self) -> &PhaseTimings {
        &self.timings
    }

    /// Light configuration for `phase`. Total over every phase.
    pub fn config_for(&self, phase: Phase) -> LightConfiguration {
        let hold = match phase {
            Phase::EwGreen | Phase::NsGreen => self.timings.green,
            Phase::EwYellow | Phase::NsYellow => self.timings.yellow,
            Phase::EwRed | Phase::NsRed => self.timings.red,
        };

        LightConfiguration {
            phase,
            north_south: phase.axis_color(Axis::NorthSouth),
            east_west: phase.axis_color(Axis::EastWest),
            hold,
        }
    }
}
