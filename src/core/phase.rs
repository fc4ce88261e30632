//! Phase, axis, direction and color values for a four-way intersection.
//!
//! These are plain values with pure methods. Nothing here touches hardware
//! or shared state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two perpendicular pairs of approaches.
///
/// Both directions of an axis always show the same color.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    NorthSouth,
    EastWest,
}

impl Axis {
    pub const ALL: [Axis; 2] = [Axis::NorthSouth, Axis::EastWest];

    /// The perpendicular axis.
    pub fn other(self) -> Axis {
        match self {
            Axis::NorthSouth => Axis::EastWest,
            Axis::EastWest => Axis::NorthSouth,
        }
    }

    /// Stable index for per-axis arrays.
    pub fn index(self) -> usize {
        match self {
            Axis::NorthSouth => 0,
            Axis::EastWest => 1,
        }
    }

    /// The two directions served by this axis.
    pub fn directions(self) -> [Direction; 2] {
        match self {
            Axis::NorthSouth => [Direction::North, Direction::South],
            Axis::EastWest => [Direction::East, Direction::West],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Axis::NorthSouth => "north_south",
            Axis::EastWest => "east_west",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An approach into the intersection, each with its own signal head.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    pub fn axis(self) -> Axis {
        match self {
            Direction::North | Direction::South => Axis::NorthSouth,
            Direction::East | Direction::West => Axis::EastWest,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lamp color of a signal head. Exactly one is lit per direction.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Green,
    Yellow,
    Red,
}

impl Color {
    pub const ALL: [Color; 3] = [Color::Green, Color::Yellow, Color::Red];

    pub fn name(&self) -> &'static str {
        match self {
            Color::Green => "green",
            Color::Yellow => "yellow",
            Color::Red => "red",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Position in the six-phase signal cycle.
///
/// Phases are ordered cyclically: east/west green, yellow, all-red, then
/// north/south green, yellow, all-red, and back to the start.
///
/// # Example
///
/// ```rust
/// use signalbox::core::Phase;
///
/// let mut phase = Phase::EwGreen;
/// for _ in 0..6 {
///     phase = phase.successor();
/// }
/// assert_eq!(phase, Phase::EwGreen);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    #[default]
    EwGreen,
    EwYellow,
    EwRed,
    NsGreen,
    NsYellow,
    NsRed,
}

impl Phase {
    /// All phases in cycle order.
    pub const ALL: [Phase; 6] = [
        Phase::EwGreen,
        Phase::EwYellow,
        Phase::EwRed,
        Phase::NsGreen,
        Phase::NsYellow,
        Phase::NsRed,
    ];

    /// Default cyclic successor of this phase.
    pub fn successor(self) -> Phase {
        match self {
            Phase::EwGreen => Phase::EwYellow,
            Phase::EwYellow => Phase::EwRed,
            Phase::EwRed => Phase::NsGreen,
            Phase::NsGreen => Phase::NsYellow,
            Phase::NsYellow => Phase::NsRed,
            Phase::NsRed => Phase::EwGreen,
        }
    }

    /// Color shown on both directions of `axis` during this phase.
    pub fn axis_color(self, axis: Axis) -> Color {
        match (self, axis) {
            (Phase::EwGreen, Axis::EastWest) => Color::Green,
            (Phase::EwYellow, Axis::EastWest) => Color::Yellow,
            (Phase::NsGreen, Axis::NorthSouth) => Color::Green,
            (Phase::NsYellow, Axis::NorthSouth) => Color::Yellow,
            _ => Color::Red,
        }
    }

    /// The axis showing green or yellow, or `None` during an all-red phase.
    pub fn active_axis(self) -> Option<Axis> {
        match self {
            Phase::EwGreen | Phase::EwYellow => Some(Axis::EastWest),
            Phase::NsGreen | Phase::NsYellow => Some(Axis::NorthSouth),
            Phase::EwRed | Phase::NsRed => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Phase::EwGreen => "EW_GREEN",
            Phase::EwYellow => "EW_YELLOW",
            Phase::EwRed => "EW_RED",
            Phase::NsGreen => "NS_GREEN",
            Phase::NsYellow => "NS_YELLOW",
            Phase::NsRed => "NS_RED",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
