//! Stint counts and cap alerts.

use serde::Serialize;

use crate::team::{PilotAvailability, UNASSIGNED};

/// Number of stints assigned to one pilot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StintCount {
    /// Pilot name.
    pub pilot: String,
    /// Assigned stints.
    pub stints: usize,
}

/// A pilot assigned more stints than their cap allows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapAlert {
    /// Pilot name.
    pub pilot: String,
    /// Configured stint cap.
    pub cap: u32,
    /// Stints actually assigned.
    pub assigned: usize,
}

impl std::fmt::Display for CapAlert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} exceeds their limit of {} stints ({} assigned)",
            self.pilot, self.cap, self.assigned
        )
    }
}

/// Derived schedule summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Stints per pilot, most stints first; ties keep first-appearance order.
    pub counts: Vec<StintCount>,
    /// Pilots over their cap, in `counts` order.
    pub alerts: Vec<CapAlert>,
}

impl Summary {
    /// Stints assigned to `pilot`, zero if none.
    #[must_use]
    pub fn count_for(&self, pilot: &str) -> usize {
        self.counts
            .iter()
            .find(|c| c.pilot == pilot)
            .map_or(0, |c| c.stints)
    }
}

/// Count stints per pilot and flag pilots over their cap.
///
/// Unassigned slots are not counted. A cap of 0 means no cap.
#[must_use]
pub fn summarize<S: AsRef<str>>(assignments: &[S], pilots: &[PilotAvailability]) -> Summary {
    let mut counts: Vec<StintCount> = Vec::new();
    for name in assignments.iter().map(AsRef::as_ref) {
        if name == UNASSIGNED {
            continue;
        }
        match counts.iter_mut().find(|c| c.pilot == name) {
            Some(entry) => entry.stints += 1,
            None => counts.push(StintCount {
                pilot: name.to_string(),
                stints: 1,
            }),
        }
    }
    // Stable sort keeps first-appearance order among equal counts.
    counts.sort_by(|a, b| b.stints.cmp(&a.stints));

    let alerts = counts
        .iter()
        .filter_map(|count| {
            let pilot = pilots.iter().find(|p| p.name == count.pilot)?;
            (pilot.stint_cap > 0 && count.stints > pilot.stint_cap as usize).then(|| CapAlert {
                pilot: count.pilot.clone(),
                cap: pilot.stint_cap,
                assigned: count.stints,
            })
        })
        .collect();

    Summary { counts, alerts }
}
