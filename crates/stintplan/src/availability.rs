//! Per-hour pilot availability.
//!
//! The opening and closing slots are governed by the pilot's start/finish
//! preference rather than the hourly table; every other slot reads the table.

use crate::team::PilotAvailability;

/// Whether `pilot` may drive slot `hour` of a race lasting `hours` slots.
///
/// Slot 0 uses `wants_to_start`, the last slot uses `wants_to_finish`, and
/// all other slots use the hourly table, defaulting to unavailable.
#[must_use]
pub fn effective_availability(pilot: &PilotAvailability, hour: usize, hours: usize) -> bool {
    if hour == 0 {
        pilot.wants_to_start
    } else if hour + 1 == hours {
        pilot.wants_to_finish
    } else {
        pilot.hourly_at(hour)
    }
}

/// Names of the pilots available for `hour`, in table order.
#[must_use]
pub fn eligible_pilots(hour: usize, pilots: &[PilotAvailability], hours: usize) -> Vec<&str> {
    pilots
        .iter()
        .filter(|p| effective_availability(p, hour, hours))
        .map(|p| p.name.as_str())
        .collect()
}
