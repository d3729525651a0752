//! Schedule reconciliation after an availability change.

use tracing::debug;

use crate::availability::effective_availability;
use crate::team::{PilotAvailability, StintAssignment};

/// Clear assignments that the updated availability no longer allows.
///
/// A slot is cleared when its pilot has no record in `pilots` or is not
/// available for that hour. Comments are kept and slots are never removed.
/// Applying this twice gives the same schedule as applying it once.
#[must_use]
pub fn reconcile(
    pilots: &[PilotAvailability],
    schedule: &[StintAssignment],
    hours: usize,
) -> Vec<StintAssignment> {
    schedule
        .iter()
        .enumerate()
        .map(|(hour, slot)| {
            let Some(name) = slot.pilot.as_deref() else {
                return slot.clone();
            };
            let keep = hour < hours
                && pilots
                    .iter()
                    .find(|p| p.name == name)
                    .is_some_and(|p| effective_availability(p, hour, hours));
            if keep {
                slot.clone()
            } else {
                debug!(hour, pilot = name, "clearing stint no longer covered by availability");
                StintAssignment {
                    pilot: None,
                    comment: slot.comment.clone(),
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(pilot: Option<&str>, comment: &str) -> StintAssignment {
        StintAssignment {
            pilot: pilot.map(str::to_string),
            comment: comment.to_string(),
        }
    }

    fn alex(hourly_1: bool) -> PilotAvailability {
        PilotAvailability {
            name: "Alex".to_string(),
            wants_to_start: true,
            wants_to_finish: false,
            hourly: vec![true, hourly_1, true],
            stint_cap: 0,
        }
    }

    #[test]
    fn test_alex_loses_hour_one() {
        let schedule = vec![slot(Some("Alex"), ""), slot(Some("Alex"), "pit"), slot(None, "")];

        let updated = reconcile(&[alex(false)], &schedule, 3);

        assert_eq!(updated[0].pilot.as_deref(), Some("Alex"));
        assert_eq!(updated[1].pilot, None);
        assert_eq!(updated[1].comment, "pit");
        assert_eq!(updated[2].pilot, None);
    }

    #[test]
    fn test_available_assignments_survive() {
        let schedule = vec![slot(Some("Alex"), ""), slot(Some("Alex"), ""), slot(None, "")];
        let updated = reconcile(&[alex(true)], &schedule, 3);
        assert_eq!(updated, schedule);
    }

    #[test]
    fn test_removed_pilot_is_cleared() {
        let schedule = vec![slot(None, ""), slot(Some("Ghost"), "old"), slot(None, "")];
        let updated = reconcile(&[alex(true)], &schedule, 3);
        assert_eq!(updated[1], slot(None, "old"));
    }

    #[test]
    fn test_finish_flag_governs_last_slot() {
        let schedule = vec![slot(None, ""), slot(None, ""), slot(Some("Alex"), "")];
        // Alex is available hourly at 2 but does not want to finish.
        let updated = reconcile(&[alex(true)], &schedule, 3);
        assert_eq!(updated[2].pilot, None);
    }

    #[test]
    fn test_idempotent() {
        let pilots = vec![alex(false)];
        let schedule = vec![slot(Some("Alex"), "a"), slot(Some("Alex"), "b"), slot(Some("Bo"), "c")];

        let once = reconcile(&pilots, &schedule, 3);
        let twice = reconcile(&pilots, &once, 3);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_length_preserved() {
        let schedule = vec![slot(Some("Alex"), ""); 3];
        assert_eq!(reconcile(&[], &schedule, 3).len(), 3);
    }
}
