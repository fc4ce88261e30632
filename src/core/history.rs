//! Phase transition history.
//!
//! The controller runs indefinitely, so history is a bounded window of the
//! most recent transitions rather than a complete log.

use super::phase::Phase;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Default number of transitions retained.
pub const DEFAULT_HISTORY_CAPACITY: usize = 256;

/// Why the scheduler moved to a new phase.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionCause {
    /// Hold elapsed and default succession applied
    Scheduled,
    /// A vehicle arrival requested this phase
    Override,
}

/// Record of a single committed phase change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhaseTransition {
    /// The phase being left
    pub from: Phase,
    /// The phase being entered
    pub to: Phase,
    pub cause: TransitionCause,
    /// When the transition was committed
    pub timestamp: DateTime<Utc>,
}

impl PhaseTransition {
    pub fn new(from: Phase, to: Phase, cause: TransitionCause) -> Self {
        Self {
            from,
            to,
            cause,
            timestamp: Utc::now(),
        }
    }
}

/// Bounded, ordered window of recent phase transitions.
///
/// # Example
///
/// ```rust
/// use signalbox::core::{Phase, PhaseHistory, PhaseTransition, TransitionCause};
///
/// let mut history = PhaseHistory::with_capacity(8);
/// history.record(PhaseTransition::new(
///     Phase::EwGreen,
///     Phase::EwYellow,
///     TransitionCause::Scheduled,
/// ));
/// history.record(PhaseTransition::new(
///     Phase::EwYellow,
///     Phase::EwRed,
///     TransitionCause::Scheduled,
/// ));
///
/// assert_eq!(
///     history.get_path(),
///     vec![Phase::EwGreen, Phase::EwYellow, Phase::EwRed]
/// );
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PhaseHistory {
    capacity: usize,
    transitions: VecDeque<PhaseTransition>,
}

impl Default for PhaseHistory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl PhaseHistory {
    /// Create an empty history keeping at most `capacity` transitions.
    /// A capacity of zero is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            transitions: VecDeque::with_capacity(capacity),
        }
    }

    /// Append a transition, evicting the oldest when full.
    pub fn record(&mut self, transition: PhaseTransition) {
        if self.transitions.len() == self.capacity {
            self.transitions.pop_front();
        }
        self.transitions.push_back(transition);
    }

    /// Phases traversed: the `from` of the oldest retained transition,
    /// then the `to` of each transition.
    pub fn get_path(&self) -> Vec<Phase> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(first) = self.transitions.front() {
            path.push(first.from);
        }
        path.extend(self.transitions.iter().map(|t| t.to));
        path
    }

    /// Time between the oldest and newest retained transitions.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.transitions.front()?, self.transitions.back()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    pub fn count(&self, cause: TransitionCause) -> usize {
        self.transitions.iter().filter(|t| t.cause == cause).count()
    }

    pub fn last(&self) -> Option<&PhaseTransition> {
        self.transitions.back()
    }

    pub fn transitions(&self) -> impl Iterator<Item = &PhaseTransition> {
        self.transitions.iter()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
