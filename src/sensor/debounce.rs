//! Per-axis debouncing of detector triggers.

use super::ArrivalEvent;
use std::time::Duration;
use tokio::time::Instant;

/// Window used by the reference detectors.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_secs(1);

/// Collapses repeated triggers on one axis within a window into one event.
///
/// Each axis is tracked separately; the window restarts only on an
/// accepted event.
#[derive(Clone, Debug)]
pub struct Debouncer {
    window: Duration,
    last: [Option<Instant>; 2],
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last: [None, None],
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Whether `event` should be forwarded.
    pub fn accept(&mut self, event: &ArrivalEvent) -> bool {
        let last = &mut self.last[event.axis.index()];
        if let Some(previous) = *last {
            if event.at.saturating_duration_since(previous) < self.window {
                return false;
            }
        }
        *last = Some(event.at);
        true
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Axis;

    #[test]
    fn first_event_is_accepted() {
        let mut debouncer = Debouncer::default();
        assert!(debouncer.accept(&ArrivalEvent::now(Axis::NorthSouth)));
    }

    #[test]
    fn burst_within_window_collapses() {
        let mut debouncer = Debouncer::default();
        let start = Instant::now();

        assert!(debouncer.accept(&ArrivalEvent::new(Axis::EastWest, start)));
        assert!(!debouncer.accept(&ArrivalEvent::new(
            Axis::EastWest,
            start + Duration::from_millis(200)
        )));
        assert!(!debouncer.accept(&ArrivalEvent::new(
            Axis::EastWest,
            start + Duration::from_millis(999)
        )));
        assert!(debouncer.accept(&ArrivalEvent::new(
            Axis::EastWest,
            start + Duration::from_secs(1)
        )));
    }

    #[test]
    fn window_restarts_only_on_accepted_event() {
        let mut debouncer = Debouncer::new(Duration::from_millis(500));
        let start = Instant::now();

        assert!(debouncer.accept(&ArrivalEvent::new(Axis::NorthSouth, start)));
        assert!(!debouncer.accept(&ArrivalEvent::new(
            Axis::NorthSouth,
            start + Duration::from_millis(400)
        )));
        // 600ms after the accepted event, even though only 200ms after the rejected one
        assert!(debouncer.accept(&ArrivalEvent::new(
            Axis::NorthSouth,
            start + Duration::from_millis(600)
        )));
    }

    #[test]
    fn axes_are_independent() {
        let mut debouncer = Debouncer::default();
        let start = Instant::now();

        assert!(debouncer.accept(&ArrivalEvent::new(Axis::NorthSouth, start)));
        assert!(debouncer.accept(&ArrivalEvent::new(Axis::EastWest, start)));
        assert!(!debouncer.accept(&ArrivalEvent::new(Axis::NorthSouth, start)));
    }
}
