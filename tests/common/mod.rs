//! Shared test doubles.

#![allow(dead_code)]

use parking_lot::Mutex;
use signalbox::core::{Axis, Color, Direction};
use signalbox::driver::{DriverError, SignalDriver};
use std::collections::BTreeMap;
use tokio::time::Instant;

#[derive(Default)]
struct Board {
    heads: BTreeMap<Direction, Color>,
    indicators: BTreeMap<Axis, bool>,
    writes: Vec<(Instant, Direction, Color)>,
    conflicts: usize,
    dark: bool,
}

impl Board {
    fn axis_lit(&self, axis: Axis) -> bool {
        axis.directions()
            .iter()
            .any(|d| matches!(self.heads.get(d), Some(Color::Green | Color::Yellow)))
    }
}

/// Driver that records every write and counts moments where both axes
/// were lit at once.
#[derive(Default)]
pub struct RecordingDriver {
    board: Mutex<Board>,
    fail_on: Option<(Direction, Color)>,
}

impl RecordingDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Driver whose write of `color` on `direction` fails.
    pub fn failing_on(direction: Direction, color: Color) -> Self {
        Self {
            fail_on: Some((direction, color)),
            ..Self::default()
        }
    }

    pub fn conflicts(&self) -> usize {
        self.board.lock().conflicts
    }

    pub fn is_dark(&self) -> bool {
        let board = self.board.lock();
        board.dark && board.heads.is_empty() && !board.indicators.values().any(|on| *on)
    }

    pub fn color(&self, direction: Direction) -> Option<Color> {
        self.board.lock().heads.get(&direction).copied()
    }

    pub fn indicator(&self, axis: Axis) -> bool {
        self.board
            .lock()
            .indicators
            .get(&axis)
            .copied()
            .unwrap_or(false)
    }

    /// Time of the first write of `color` to `direction`.
    pub fn first_write(&self, direction: Direction, color: Color) -> Option<Instant> {
        self.board
            .lock()
            .writes
            .iter()
            .find(|(_, d, c)| *d == direction && *c == color)
            .map(|(at, _, _)| *at)
    }

    pub fn write_count(&self) -> usize {
        self.board.lock().writes.len()
    }
}

impl SignalDriver for RecordingDriver {
    fn set_light(&self, direction: Direction, color: Color) -> Result<(), DriverError> {
        if self.fail_on == Some((direction, color)) {
            return Err(DriverError::Write {
                pin: 0,
                reason: format!("{direction} {color} lamp open circuit"),
            });
        }

        let mut board = self.board.lock();
        board.dark = false;
        board.heads.insert(direction, color);
        board.writes.push((Instant::now(), direction, color));
        if board.axis_lit(Axis::NorthSouth) && board.axis_lit(Axis::EastWest) {
            board.conflicts += 1;
        }
        Ok(())
    }

    fn set_indicator(&self, axis: Axis, on: bool) -> Result<(), DriverError> {
        self.board.lock().indicators.insert(axis, on);
        Ok(())
    }

    fn all_off(&self) -> Result<(), DriverError> {
        let mut board = self.board.lock();
        board.heads.clear();
        board.indicators.clear();
        board.dark = true;
        Ok(())
    }
}
