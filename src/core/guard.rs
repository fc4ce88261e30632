//! Guard predicates over phase transitions.
//!
//! Guards are pure boolean functions that decide whether moving from one
//! phase to another may be committed. The scheduler checks every override
//! request against its guard ([`Guard::clearance`] unless replaced) before
//! it touches the lights.

use super::phase::{Axis, Color, Phase};

/// Pure predicate that determines if a transition can be committed.
///
/// # Example
///
/// ```rust
/// use signalbox::core::{Guard, Phase};
///
/// let guard = Guard::clearance();
///
/// assert!(guard.check(&Phase::EwGreen, &Phase::EwYellow));
/// assert!(!guard.check(&Phase::EwGreen, &Phase::NsGreen));
/// ```
pub struct Guard {
    predicate: Box<dyn Fn(&Phase, &Phase) -> bool + Send + Sync>,
}

impl Guard {
    /// Create a guard from a pure predicate over `(from, to)`.
    ///
    /// The predicate must be deterministic and free of side effects.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&Phase, &Phase) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Box::new(predicate),
        }
    }

    /// Safety guard for signal clearance.
    ///
    /// A transition passes only if:
    /// - the lit axis afterwards is the same axis as before, or none, so
    ///   right-of-way never passes to the perpendicular axis without an
    ///   all-red phase in between;
    /// - an axis that was green stays green or turns yellow;
    /// - an axis shows yellow only if it was green or yellow before.
    pub fn clearance() -> Self {
        Guard::new(|from, to| {
            no_perpendicular_handoff(*from, *to)
                && Axis::ALL.iter().all(|axis| {
                    let before = from.axis_color(*axis);
                    let after = to.axis_color(*axis);
                    green_clears_through_yellow(before, after)
                        && yellow_follows_green(before, after)
                })
        })
    }

    /// Combine two guards; both must pass.
    pub fn and(self, other: Guard) -> Guard {
        Guard::new(move |from, to| self.check(from, to) && other.check(from, to))
    }

    /// Check whether the guard allows moving from `from` to `to`.
    pub fn check(&self, from: &Phase, to: &Phase) -> bool {
        (self.predicate)(from, to)
    }
}

impl Default for Guard {
    fn default() -> Self {
        Guard::clearance()
    }
}

fn no_perpendicular_handoff(from: Phase, to: Phase) -> bool {
    match (from.active_axis(), to.active_axis()) {
        (Some(before), Some(after)) => before == after,
        _ => true,
    }
}

fn green_clears_through_yellow(before: Color, after: Color) -> bool {
    before != Color::Green || matches!(after, Color::Green | Color::Yellow)
}

fn yellow_follows_green(before: Color, after: Color) -> bool {
    after != Color::Yellow || matches!(before, Color::Green | Color::Yellow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::policy::override_for;

    #[test]
    fn default_succession_passes_clearance() {
        let guard = Guard::clearance();

        for phase in Phase::ALL {
            assert!(
                guard.check(&phase, &phase.successor()),
                "{phase} -> {}",
                phase.successor()
            );
        }
    }

    #[test]
    fn override_targets_pass_clearance() {
        let guard = Guard::clearance();

        for axis in Axis::ALL {
            for phase in Phase::ALL {
                if let Some(target) = override_for(axis, phase).requested() {
                    assert!(guard.check(&phase, &target), "{axis}: {phase} -> {target}");
                }
            }
        }
    }

    #[test]
    fn green_to_green_across_axes_is_blocked() {
        let guard = Guard::clearance();

        assert!(!guard.check(&Phase::EwGreen, &Phase::NsGreen));
        assert!(!guard.check(&Phase::NsGreen, &Phase::EwGreen));
        assert!(!guard.check(&Phase::EwYellow, &Phase::NsGreen));
        assert!(!guard.check(&Phase::NsYellow, &Phase::EwYellow));
    }

    #[test]
    fn green_straight_to_red_is_blocked() {
        let guard = Guard::clearance();

        assert!(!guard.check(&Phase::EwGreen, &Phase::EwRed));
        assert!(!guard.check(&Phase::NsGreen, &Phase::NsRed));
    }

    #[test]
    fn yellow_from_red_is_blocked() {
        let guard = Guard::clearance();

        assert!(!guard.check(&Phase::EwRed, &Phase::EwYellow));
        assert!(!guard.check(&Phase::NsRed, &Phase::NsYellow));
    }

    #[test]
    fn combined_guard_requires_both() {
        let never_from_red = Guard::new(|from: &Phase, _: &Phase| from.active_axis().is_some());
        let guard = Guard::clearance().and(never_from_red);

        assert!(guard.check(&Phase::EwGreen, &Phase::EwYellow));
        assert!(!guard.check(&Phase::EwRed, &Phase::NsGreen));
    }

    #[test]
    fn guard_is_deterministic() {
        let guard = Guard::clearance();

        let first = guard.check(&Phase::NsYellow, &Phase::NsRed);
        let second = guard.check(&Phase::NsYellow, &Phase::NsRed);

        assert_eq!(first, second);
    }
}
