//! Plain-text rendering of team views for the terminal.

use std::fmt::Write as _;

use crate::summary::Summary;
use crate::view::TeamView;

const NAME_WIDTH: usize = 16;

fn name_column(view: &TeamView) -> usize {
    view.pilots
        .iter()
        .map(|p| p.name.chars().count())
        .chain(view.slots.iter().map(|s| s.pilot.chars().count()))
        .chain(std::iter::once(NAME_WIDTH))
        .max()
        .unwrap_or(NAME_WIDTH)
}

/// Render the team header line.
#[must_use]
pub fn header(view: &TeamView) -> String {
    format!(
        "{} - {}h race starting at {:02}:00",
        view.team, view.duration, view.start_hour
    )
}

/// Render the availability table, one row per pilot and one column per hour.
///
/// Hours are marked `x` when available and `.` otherwise.
#[must_use]
pub fn availability_table(view: &TeamView) -> String {
    let width = name_column(view);
    let mut out = String::new();

    let _ = write!(out, "{:<width$}  Start  Finish  Cap ", "Pilot");
    for label in &view.hour_labels {
        let _ = write!(out, " {}", &label[..2]);
    }
    out.push('\n');

    for row in &view.pilots {
        let cap = if row.stint_cap == 0 {
            "-".to_string()
        } else {
            row.stint_cap.to_string()
        };
        let _ = write!(
            out,
            "{:<width$}  {:<5}  {:<6}  {:<3} ",
            row.name,
            yes_no(row.wants_to_start),
            yes_no(row.wants_to_finish),
            cap
        );
        for available in &row.hourly {
            out.push_str(if *available { "  x" } else { "  ." });
        }
        out.push('\n');
    }
    out
}

/// Render the schedule, one line per hour slot.
#[must_use]
pub fn schedule_table(view: &TeamView) -> String {
    let width = name_column(view);
    let mut out = String::new();
    let _ = writeln!(out, "{:>3}  {:<13}  {:<width$}  Comment", "#", "Hours", "Pilot");
    for slot in &view.slots {
        let line = format!(
            "{:>3}  {:<13}  {:<width$}  {}",
            slot.hour, slot.label, slot.pilot, slot.comment
        );
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// Render the pilot color legend.
#[must_use]
pub fn legend(view: &TeamView) -> String {
    view.legend
        .iter()
        .map(|entry| format!("{} {}", entry.color, entry.pilot))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render stint counts followed by any cap alerts.
#[must_use]
pub fn summary(summary: &Summary) -> String {
    let mut out = String::new();
    if summary.counts.is_empty() {
        out.push_str("No stints assigned\n");
    }
    for count in &summary.counts {
        let _ = writeln!(out, "{:<NAME_WIDTH$}  {}", count.pilot, count.stints);
    }
    for alert in &summary.alerts {
        let _ = writeln!(out, "warning: {alert}");
    }
    out
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
