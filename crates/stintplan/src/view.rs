//! Read-only view of a team, ready for display.
//!
//! A [`TeamView`] is rebuilt from the session snapshot after every command;
//! it carries everything the front end prints and nothing it can mutate.

use serde::Serialize;

use crate::availability::eligible_pilots;
use crate::color::{color_for, text_color_for, Color};
use crate::summary::{summarize, Summary};
use crate::team::{Team, UNASSIGNED};

/// One legend entry: a pilot and their color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    /// Pilot name.
    pub pilot: String,
    /// Display color.
    pub color: Color,
}

/// One row of the availability table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PilotRow {
    /// Pilot name.
    pub name: String,
    /// Wants the opening stint.
    pub wants_to_start: bool,
    /// Wants the closing stint.
    pub wants_to_finish: bool,
    /// Stint cap, 0 for none.
    pub stint_cap: u32,
    /// Raw hourly availability, one entry per race hour.
    pub hourly: Vec<bool>,
}

/// One hour of the schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotView {
    /// Hour index from race start.
    pub hour: usize,
    /// Wall-clock span, e.g. `"14:00 - 15:00"`.
    pub label: String,
    /// Assigned pilot or the unassigned sentinel.
    pub pilot: String,
    /// Slot comment.
    pub comment: String,
    /// Background color for the pilot.
    pub color: Color,
    /// Foreground color readable on `color`.
    pub text_color: Color,
    /// Valid selections: the sentinel followed by every eligible pilot.
    pub choices: Vec<String>,
}

/// Everything displayed for one team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamView {
    /// Team name.
    pub team: String,
    /// Race start hour.
    pub start_hour: u32,
    /// Race length in hours.
    pub duration: u32,
    /// Pilot color legend.
    pub legend: Vec<LegendEntry>,
    /// Column labels of the availability table, e.g. `"14:00"`.
    pub hour_labels: Vec<String>,
    /// Availability table.
    pub pilots: Vec<PilotRow>,
    /// Schedule slots in race order.
    pub slots: Vec<SlotView>,
    /// Stint counts and cap alerts.
    pub summary: Summary,
}

impl TeamView {
    /// Build the view for `team`, stored under `name`.
    #[must_use]
    pub fn build(name: &str, team: &Team) -> Self {
        let hours = team.hours();
        let names = team.pilot_names();
        let config = &team.race_config;

        let legend = names
            .iter()
            .map(|pilot| LegendEntry {
                pilot: (*pilot).to_string(),
                color: color_for(pilot, &names),
            })
            .collect();

        let pilots = team
            .pilots
            .iter()
            .map(|p| PilotRow {
                name: p.name.clone(),
                wants_to_start: p.wants_to_start,
                wants_to_finish: p.wants_to_finish,
                stint_cap: p.stint_cap,
                hourly: (0..hours).map(|h| p.hourly_at(h)).collect(),
            })
            .collect();

        let slots = team
            .schedule
            .iter()
            .enumerate()
            .map(|(hour, slot)| {
                let pilot = slot.pilot_label();
                let color = color_for(pilot, &names);
                let choices = std::iter::once(UNASSIGNED)
                    .chain(eligible_pilots(hour, &team.pilots, hours))
                    .map(str::to_string)
                    .collect();
                SlotView {
                    hour,
                    label: config.slot_label(hour),
                    pilot: pilot.to_string(),
                    comment: slot.comment.clone(),
                    color,
                    text_color: text_color_for(color),
                    choices,
                }
            })
            .collect();

        Self {
            team: name.to_string(),
            start_hour: config.start_hour,
            duration: config.duration,
            legend,
            hour_labels: (0..hours).map(|h| config.hour_label(h)).collect(),
            pilots,
            slots,
            summary: summarize(&team.assignments(), &team.pilots),
        }
    }

    /// Whether any pilot is over their stint cap.
    #[must_use]
    pub fn has_alerts(&self) -> bool {
        !self.summary.alerts.is_empty()
    }
}
