//! CSV export of a team's schedule.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, TimeZone};
use csv::WriterBuilder;

use crate::error::{Error, Result};
use crate::team::Team;

/// Column headers of the exported table.
pub const HEADERS: [&str; 3] = ["Hora del Stint", "Piloto al Volante", "Comentarios"];

/// Write the schedule as CSV, one row per race hour.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_csv<W: Write>(team: &Team, out: W) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(out);
    writer.write_record(HEADERS)?;
    for (hour, slot) in team.schedule.iter().enumerate() {
        writer.write_record([
            team.race_config.slot_label(hour).as_str(),
            slot.pilot_label(),
            slot.comment.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Render the schedule CSV into a string.
///
/// # Errors
///
/// Returns an error if CSV encoding fails.
pub fn to_csv_string(team: &Team) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(team, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Download-style file name: `horario_<team>_<YYYYmmdd_HHMMSS>.csv`.
///
/// Path separators in the team name are replaced so the result is always a
/// single file name.
#[must_use]
pub fn default_file_name<Tz: TimeZone>(team_name: &str, at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let safe: String = team_name
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("horario_{safe}_{}.csv", at.format("%Y%m%d_%H%M%S"))
}

/// Write the schedule CSV to `path`, creating its directory if needed.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be created or written.
pub fn write_file(team: &Team, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::DirectoryCreate {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    write_csv(team, BufWriter::new(File::create(path)?))
}
