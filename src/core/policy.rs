//! Vehicle-actuated override policy.
//!
//! A detected arrival never cuts short a green or yellow already serving
//! its own axis, but fast-forwards through red phases and phases serving
//! the other axis toward giving the arriving axis green as soon as it is
//! safe to do so.

use super::phase::{Axis, Phase};
use serde::{Deserialize, Serialize};

/// Outcome of evaluating an arrival against the current phase.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum OverrideDecision {
    /// The arriving axis already has green. Nothing to do.
    AlreadyServing,
    /// Let default succession run; it already leads to the arriving axis.
    Defer,
    /// Jump to this phase at the next scheduler evaluation.
    Jump(Phase),
}

impl OverrideDecision {
    /// The requested phase, if the decision asks for one.
    pub fn requested(&self) -> Option<Phase> {
        match self {
            OverrideDecision::Jump(phase) => Some(*phase),
            OverrideDecision::AlreadyServing | OverrideDecision::Defer => None,
        }
    }
}

/// Decide which phase an arrival on `axis` should advance the cycle to.
///
/// # Example
///
/// ```rust
/// use signalbox::core::{override_for, Axis, OverrideDecision, Phase};
///
/// assert_eq!(
///     override_for(Axis::NorthSouth, Phase::EwGreen),
///     OverrideDecision::Jump(Phase::EwYellow)
/// );
/// assert_eq!(
///     override_for(Axis::EastWest, Phase::EwGreen),
///     OverrideDecision::AlreadyServing
/// );
/// assert_eq!(override_for(Axis::EastWest, Phase::NsRed), OverrideDecision::Defer);
/// ```
pub fn override_for(axis: Axis, current: Phase) -> OverrideDecision {
    use OverrideDecision::{AlreadyServing, Defer, Jump};

    match (axis, current) {
        (Axis::EastWest, Phase::EwGreen) => AlreadyServing,
        (Axis::EastWest, Phase::EwYellow) => Jump(Phase::NsRed),
        (Axis::EastWest, Phase::EwRed) => Jump(Phase::NsRed),
        (Axis::EastWest, Phase::NsGreen) => Jump(Phase::NsYellow),
        (Axis::EastWest, Phase::NsYellow) => Jump(Phase::NsRed),
        (Axis::EastWest, Phase::NsRed) => Defer,

        (Axis::NorthSouth, Phase::NsGreen) => AlreadyServing,
        (Axis::NorthSouth, Phase::NsYellow) => Jump(Phase::EwRed),
        (Axis::NorthSouth, Phase::NsRed) => Jump(Phase::EwRed),
        (Axis::NorthSouth, Phase::EwGreen) => Jump(Phase::EwYellow),
        (Axis::NorthSouth, Phase::EwYellow) => Jump(Phase::EwRed),
        (Axis::NorthSouth, Phase::EwRed) => Defer,
    }
}
