//! Builder for constructing controllers.

use super::machine::Controller;
use crate::config::ControllerSettings;
use crate::core::{Guard, Phase, PhaseTable, PhaseTimings, DEFAULT_HISTORY_CAPACITY};
use crate::driver::SignalDriver;

/// Builder for [`Controller`] with a fluent API.
///
/// # Example
///
/// ```rust
/// use signalbox::controller::ControllerBuilder;
/// use signalbox::core::Phase;
/// use signalbox::driver::{MemoryPins, PinDriver, PinMap};
///
/// let controller = ControllerBuilder::new(PinDriver::new(PinMap::default(), MemoryPins::new()))
///     .initial_phase(Phase::NsRed)
///     .history_capacity(32)
///     .build();
///
/// assert_eq!(controller.current_phase(), Phase::NsRed);
/// ```
pub struct ControllerBuilder<D: SignalDriver + 'static> {
    driver: D,
    initial: Phase,
    table: PhaseTable,
    guard: Guard,
    history_capacity: usize,
}

impl<D: SignalDriver + 'static> ControllerBuilder<D> {
    /// Start from the reference timings, east/west green, and the clearance guard.
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            initial: Phase::default(),
            table: PhaseTable::default(),
            guard: Guard::clearance(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }

    pub fn initial_phase(mut self, phase: Phase) -> Self {
        self.initial = phase;
        self
    }

    pub fn timings(mut self, timings: PhaseTimings) -> Self {
        self.table = PhaseTable::new(timings);
        self
    }

    /// Replace the guard checked before committing an override.
    pub fn guard(mut self, guard: Guard) -> Self {
        self.guard = guard;
        self
    }

    /// Add a site-specific rule on top of the current guard; overrides must pass both.
    pub fn require(self, extra: Guard) -> Self {
        Self {
            guard: self.guard.and(extra),
            ..self
        }
    }

    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    /// Apply timings, initial phase and history capacity from validated settings.
    pub fn settings(self, settings: &ControllerSettings) -> Self {
        self.timings(settings.timings)
            .initial_phase(settings.initial_phase)
            .history_capacity(settings.history_capacity)
    }

    pub fn build(self) -> Controller<D> {
        Controller::from_parts(
            self.driver,
            self.table,
            self.guard,
            self.initial,
            self.history_capacity,
        )
    }
}
