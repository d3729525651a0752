//! Team, pilot availability and stint schedule types.
//!
//! A [`Team`] is the unit stored per race entry: its race configuration, the
//! availability table of its pilots, and one [`StintAssignment`] per race hour.
//! The serde representation matches the stored document format, including the
//! Spanish column names used by the shared store.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Sentinel stored in a schedule slot that has no pilot.
pub const UNASSIGNED: &str = "Sin Asignar";

/// Name given to the team created on first run.
pub const DEFAULT_TEAM_NAME: &str = "Equipo por Defecto";

/// Start hour given to newly created teams.
pub const DEFAULT_START_HOUR: u32 = 14;

/// Race durations a team can be created with, in hours.
pub const ALLOWED_DURATIONS: [u32; 7] = [24, 12, 10, 8, 6, 4, 3];

const PILOT_KEY: &str = "Piloto";
const WANTS_START_KEY: &str = "Quiere Empezar";
const WANTS_FINISH_KEY: &str = "Quiere Terminar";
const STINT_CAP_KEY: &str = "Horas Límite (Opcional)";

const DEFAULT_PILOT_COUNT: usize = 4;

/// Hour keys at or above this index cannot belong to any allowed race.
const MAX_RACE_HOURS: usize = 24;

/// A race duration restricted to [`ALLOWED_DURATIONS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RaceDuration(u32);

impl RaceDuration {
    /// The default duration for bootstrapped teams.
    pub const TWENTY_FOUR: Self = Self(24);

    /// Number of hours in the race.
    #[must_use]
    pub fn hours(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for RaceDuration {
    type Error = Error;

    fn try_from(hours: u32) -> Result<Self> {
        if ALLOWED_DURATIONS.contains(&hours) {
            Ok(Self(hours))
        } else {
            Err(Error::InvalidDuration { hours })
        }
    }
}

impl std::fmt::Display for RaceDuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}h", self.0)
    }
}

/// Race start time and length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceConfig {
    /// Hour of day (0-23) the race starts.
    #[serde(default = "default_start_hour")]
    pub start_hour: u32,
    /// Race length in hours. Fixed once the team exists.
    #[serde(default = "default_duration")]
    pub duration: u32,
}

fn default_start_hour() -> u32 {
    DEFAULT_START_HOUR
}

fn default_duration() -> u32 {
    RaceDuration::TWENTY_FOUR.hours()
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            start_hour: DEFAULT_START_HOUR,
            duration: default_duration(),
        }
    }
}

impl RaceConfig {
    /// Race length as a slot count.
    #[must_use]
    pub fn hours(&self) -> usize {
        self.duration as usize
    }

    /// Wall-clock label of an hour slot, e.g. `"14:00"`.
    #[must_use]
    pub fn hour_label(&self, hour: usize) -> String {
        format!("{:02}:00", self.clock_hour(hour))
    }

    /// Wall-clock span of an hour slot, e.g. `"23:00 - 00:00"`.
    #[must_use]
    pub fn slot_label(&self, hour: usize) -> String {
        format!(
            "{:02}:00 - {:02}:00",
            self.clock_hour(hour),
            self.clock_hour(hour + 1)
        )
    }

    fn clock_hour(&self, hour: usize) -> usize {
        (self.start_hour as usize + hour) % 24
    }
}

/// Availability of one pilot across the race.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct PilotAvailability {
    /// Pilot name, unique within the team.
    pub name: String,
    /// Whether the pilot wants the opening stint.
    pub wants_to_start: bool,
    /// Whether the pilot wants the closing stint.
    pub wants_to_finish: bool,
    /// Availability per hour index. Missing entries read as unavailable.
    pub hourly: Vec<bool>,
    /// Maximum stints for the race; 0 means no cap.
    pub stint_cap: u32,
}

impl PilotAvailability {
    /// A pilot available for every hour of a race of `hours` slots.
    #[must_use]
    pub fn available_for(name: impl Into<String>, hours: usize) -> Self {
        Self {
            name: name.into(),
            wants_to_start: false,
            wants_to_finish: false,
            hourly: vec![true; hours],
            stint_cap: 0,
        }
    }

    /// Raw hourly availability for `hour`, ignoring the start/finish flags.
    #[must_use]
    pub fn hourly_at(&self, hour: usize) -> bool {
        self.hourly.get(hour).copied().unwrap_or(false)
    }

    /// Set the raw hourly availability for `hour`, growing the table if needed.
    pub fn set_hourly(&mut self, hour: usize, available: bool) {
        if self.hourly.len() <= hour {
            self.hourly.resize(hour + 1, false);
        }
        self.hourly[hour] = available;
    }
}

impl TryFrom<Map<String, Value>> for PilotAvailability {
    type Error = Error;

    fn try_from(record: Map<String, Value>) -> Result<Self> {
        let name = match record.get(PILOT_KEY) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => {
                return Err(Error::document(format!(
                    "pilot name must be a string, got {other}"
                )))
            }
        };

        let mut hourly = Vec::new();
        for (key, value) in &record {
            let Ok(hour) = key.parse::<usize>() else {
                continue;
            };
            if hour >= MAX_RACE_HOURS {
                return Err(Error::document(format!(
                    "hour key '{key}' is beyond the longest race ({MAX_RACE_HOURS}h)"
                )));
            }
            if hourly.len() <= hour {
                hourly.resize(hour + 1, false);
            }
            hourly[hour] = flag(Some(value), key)?;
        }

        Ok(Self {
            wants_to_start: flag(record.get(WANTS_START_KEY), WANTS_START_KEY)?,
            wants_to_finish: flag(record.get(WANTS_FINISH_KEY), WANTS_FINISH_KEY)?,
            stint_cap: cap(record.get(STINT_CAP_KEY))?,
            hourly,
            name,
        })
    }
}

impl From<PilotAvailability> for Map<String, Value> {
    fn from(pilot: PilotAvailability) -> Self {
        let mut record = Map::new();
        record.insert(PILOT_KEY.to_string(), Value::String(pilot.name));
        record.insert(WANTS_START_KEY.to_string(), Value::Bool(pilot.wants_to_start));
        record.insert(
            WANTS_FINISH_KEY.to_string(),
            Value::Bool(pilot.wants_to_finish),
        );
        record.insert(STINT_CAP_KEY.to_string(), Value::from(pilot.stint_cap));
        for (hour, available) in pilot.hourly.into_iter().enumerate() {
            record.insert(hour.to_string(), Value::Bool(available));
        }
        record
    }
}

fn flag(value: Option<&Value>, key: &str) -> Result<bool> {
    match value {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(other) => Err(Error::document(format!(
            "'{key}' must be a boolean, got {other}"
        ))),
    }
}

fn cap(value: Option<&Value>) -> Result<u32> {
    match value {
        None | Some(Value::Null) => Ok(0),
        Some(Value::Number(n)) => {
            if let Some(v) = n.as_u64() {
                return Ok(u32::try_from(v).unwrap_or(u32::MAX));
            }
            match n.as_f64() {
                // Spreadsheet editors hand back caps like 3.0.
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                Some(v) if v.is_finite() && v >= 0.0 => Ok(v.trunc().min(f64::from(u32::MAX)) as u32),
                _ => Err(Error::document(format!(
                    "'{STINT_CAP_KEY}' must be a non-negative number, got {n}"
                ))),
            }
        }
        Some(other) => Err(Error::document(format!(
            "'{STINT_CAP_KEY}' must be a number, got {other}"
        ))),
    }
}

/// The pilot driving one hour of the race.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StintAssignment {
    /// Assigned pilot name; `None` when the slot is unassigned.
    #[serde(rename = "Piloto al Volante", with = "assigned_pilot", default)]
    pub pilot: Option<String>,
    /// Free-text note for the slot.
    #[serde(
        rename = "Comentarios",
        default,
        deserialize_with = "null_as_empty"
    )]
    pub comment: String,
}

impl StintAssignment {
    /// An empty slot with no comment.
    #[must_use]
    pub fn unassigned() -> Self {
        Self::default()
    }

    /// Slot pilot as displayed, with the sentinel for empty slots.
    #[must_use]
    pub fn pilot_label(&self) -> &str {
        self.pilot.as_deref().unwrap_or(UNASSIGNED)
    }

    /// Whether a pilot occupies the slot.
    #[must_use]
    pub fn is_assigned(&self) -> bool {
        self.pilot.is_some()
    }
}

/// Convert a displayed pilot choice into a slot value.
///
/// The sentinel maps to `None`; any other name is kept verbatim.
#[must_use]
pub fn parse_pilot_choice(choice: &str) -> Option<String> {
    if choice == UNASSIGNED {
        None
    } else {
        Some(choice.to_string())
    }
}

mod assigned_pilot {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{parse_pilot_choice, UNASSIGNED};

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(pilot: &Option<String>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(pilot.as_deref().unwrap_or(UNASSIGNED))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        let raw = Option::<String>::deserialize(d)?;
        Ok(raw.and_then(|name| parse_pilot_choice(&name)))
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<String, D::Error> {
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}

/// One team's race plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Start hour and duration.
    #[serde(default)]
    pub race_config: RaceConfig,
    /// Pilot availability table, in display order.
    #[serde(default)]
    pub pilots: Vec<PilotAvailability>,
    /// One slot per race hour, index 0 being the race start.
    #[serde(rename = "horario", default)]
    pub schedule: Vec<StintAssignment>,
}

impl Team {
    /// Build the default structure for a new team.
    ///
    /// The team starts at 14:00 with four placeholder pilots available for
    /// every hour; the second wants the start and the third wants the finish.
    /// Every slot is unassigned.
    #[must_use]
    pub fn new(duration: RaceDuration) -> Self {
        let hours = duration.hours() as usize;
        let pilots = (1..=DEFAULT_PILOT_COUNT)
            .map(|n| {
                let mut pilot = PilotAvailability::available_for(format!("Piloto {n}"), hours);
                pilot.wants_to_start = n == 2;
                pilot.wants_to_finish = n == 3;
                pilot
            })
            .collect();

        Self {
            race_config: RaceConfig {
                start_hour: DEFAULT_START_HOUR,
                duration: duration.hours(),
            },
            pilots,
            schedule: vec![StintAssignment::unassigned(); hours],
        }
    }

    /// Race length as a slot count.
    #[must_use]
    pub fn hours(&self) -> usize {
        self.race_config.hours()
    }

    /// Distinct non-empty pilot names in table order.
    #[must_use]
    pub fn pilot_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::with_capacity(self.pilots.len());
        for pilot in &self.pilots {
            if !pilot.name.is_empty() && !names.contains(&pilot.name.as_str()) {
                names.push(&pilot.name);
            }
        }
        names
    }

    /// Displayed pilot per slot, in schedule order.
    #[must_use]
    pub fn assignments(&self) -> Vec<&str> {
        self.schedule.iter().map(StintAssignment::pilot_label).collect()
    }

    /// Fail unless `hour` indexes a slot of this race.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HourOutOfRange`] past the last slot.
    pub fn check_hour(&self, hour: usize) -> Result<()> {
        if hour < self.hours() {
            Ok(())
        } else {
            Err(Error::HourOutOfRange {
                hour,
                duration: self.hours(),
            })
        }
    }

    /// Check the structural invariants of a loaded team.
    ///
    /// # Errors
    ///
    /// Returns a document error if the schedule length disagrees with the
    /// configured duration or the start hour is out of range.
    pub fn validate(&self) -> Result<()> {
        if self.race_config.start_hour > 23 {
            return Err(Error::InvalidStartHour {
                hour: self.race_config.start_hour,
            });
        }
        if self.schedule.len() != self.hours() {
            return Err(Error::document(format!(
                "schedule has {} slots but the race lasts {}h",
                self.schedule.len(),
                self.race_config.duration
            )));
        }
        Ok(())
    }
}

/// Reject pilot tables that repeat a name.
///
/// # Errors
///
/// Returns [`Error::DuplicatePilot`] naming the first repeated name.
pub fn check_unique_names(pilots: &[PilotAvailability]) -> Result<()> {
    for (i, pilot) in pilots.iter().enumerate() {
        if pilots[..i].iter().any(|p| p.name == pilot.name) {
            return Err(Error::DuplicatePilot {
                name: pilot.name.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_race_duration_allowed() {
        for hours in ALLOWED_DURATIONS {
            assert_eq!(RaceDuration::try_from(hours).unwrap().hours(), hours);
        }
    }

    #[test]
    fn test_race_duration_rejected() {
        for hours in [0, 1, 5, 7, 25, 48] {
            let err = RaceDuration::try_from(hours).unwrap_err();
            assert!(matches!(err, Error::InvalidDuration { hours: h } if h == hours));
        }
    }

    #[test]
    fn test_default_team_24h() {
        let team = Team::new(RaceDuration::TWENTY_FOUR);

        assert_eq!(team.race_config.start_hour, 14);
        assert_eq!(team.race_config.duration, 24);
        assert_eq!(team.schedule.len(), 24);
        assert!(team.schedule.iter().all(|s| !s.is_assigned()));
        assert!(team.schedule.iter().all(|s| s.comment.is_empty()));
    }

    #[test]
    fn test_default_team_pilots() {
        let team = Team::new(RaceDuration::try_from(6).unwrap());

        assert_eq!(
            team.pilot_names(),
            vec!["Piloto 1", "Piloto 2", "Piloto 3", "Piloto 4"]
        );
        assert_eq!(team.pilots.iter().filter(|p| p.wants_to_start).count(), 1);
        assert_eq!(team.pilots.iter().filter(|p| p.wants_to_finish).count(), 1);
        assert!(team.pilots[1].wants_to_start);
        assert!(team.pilots[2].wants_to_finish);
        for pilot in &team.pilots {
            assert_eq!(pilot.hourly, vec![true; 6]);
            assert_eq!(pilot.stint_cap, 0);
        }
    }

    #[test]
    fn test_default_team_every_duration_validates() {
        for hours in ALLOWED_DURATIONS {
            let team = Team::new(RaceDuration::try_from(hours).unwrap());
            assert!(team.validate().is_ok());
            assert_eq!(team.schedule.len(), hours as usize);
        }
    }

    #[test]
    fn test_slot_label_wraps_midnight() {
        let config = RaceConfig {
            start_hour: 22,
            duration: 4,
        };
        assert_eq!(config.slot_label(0), "22:00 - 23:00");
        assert_eq!(config.slot_label(1), "23:00 - 00:00");
        assert_eq!(config.slot_label(2), "00:00 - 01:00");
        assert_eq!(config.hour_label(3), "01:00");
    }

    #[test]
    fn test_pilot_wire_format() {
        let pilot = PilotAvailability {
            name: "Alex".to_string(),
            wants_to_start: true,
            wants_to_finish: false,
            hourly: vec![true, false],
            stint_cap: 3,
        };
        let value = serde_json::to_value(&pilot).unwrap();
        assert_eq!(
            value,
            json!({
                "Piloto": "Alex",
                "Quiere Empezar": true,
                "Quiere Terminar": false,
                "Horas Límite (Opcional)": 3,
                "0": true,
                "1": false
            })
        );
    }

    #[test]
    fn test_pilot_lenient_read() {
        let pilot: PilotAvailability = serde_json::from_value(json!({
            "Piloto": null,
            "Quiere Empezar": null,
            "Horas Límite (Opcional)": 2.0,
            "2": true
        }))
        .unwrap();

        assert_eq!(pilot.name, "");
        assert!(!pilot.wants_to_start);
        assert!(!pilot.wants_to_finish);
        assert_eq!(pilot.stint_cap, 2);
        assert_eq!(pilot.hourly, vec![false, false, true]);
        assert!(!pilot.hourly_at(10));
    }

    #[test]
    fn test_pilot_rejects_huge_hour_key() {
        for key in ["18446744073709551615", "4000000000", "24"] {
            let mut record = Map::new();
            record.insert("Piloto".to_string(), json!("A"));
            record.insert(key.to_string(), json!(true));

            let err = PilotAvailability::try_from(record).unwrap_err();
            assert!(err.to_string().contains(key));
        }

        let slot = json!({"Piloto al Volante": "Sin Asignar", "Comentarios": ""});
        let mut body = json!({"T": {
            "race_config": {"start_hour": 14, "duration": 3},
            "pilots": [{"Piloto": "A", "0": true}],
            "horario": [slot.clone(), slot.clone(), slot]
        }});
        assert!(crate::document::StoreDocument::from_json(&body.to_string()).is_ok());

        body["T"]["pilots"][0]["18446744073709551615"] = json!(true);
        assert!(crate::document::StoreDocument::from_json(&body.to_string()).is_err());
    }

    #[test]
    fn test_pilot_last_allowed_hour_key() {
        let pilot: PilotAvailability =
            serde_json::from_value(json!({"Piloto": "A", "23": true})).unwrap();
        assert_eq!(pilot.hourly.len(), 24);
        assert!(pilot.hourly_at(23));
    }

    #[test]
    fn test_pilot_rewritten_in_canonical_form() {
        let pilot: PilotAvailability = serde_json::from_value(json!({
            "Piloto": "A",
            "0": true,
            "2": true,
            "extra": 1
        }))
        .unwrap();

        let written = serde_json::to_value(&pilot).unwrap();
        assert_eq!(written["1"], json!(false));
        assert_eq!(written["Horas Límite (Opcional)"], json!(0));
        assert!(written.get("extra").is_none());

        let again: PilotAvailability = serde_json::from_value(written.clone()).unwrap();
        assert_eq!(serde_json::to_value(&again).unwrap(), written);
    }

    #[test]
    fn test_pilot_rejects_bad_flag() {
        let result: std::result::Result<PilotAvailability, _> =
            serde_json::from_value(json!({"Piloto": "Kim", "Quiere Terminar": "yes"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_set_hourly_grows() {
        let mut pilot = PilotAvailability::available_for("Kim", 2);
        pilot.set_hourly(4, true);
        assert_eq!(pilot.hourly, vec![true, true, false, false, true]);
    }

    #[test]
    fn test_assignment_sentinel() {
        let slot: StintAssignment =
            serde_json::from_value(json!({"Piloto al Volante": "Sin Asignar", "Comentarios": ""}))
                .unwrap();
        assert_eq!(slot.pilot, None);
        assert_eq!(slot.pilot_label(), UNASSIGNED);

        let value = serde_json::to_value(&slot).unwrap();
        assert_eq!(value["Piloto al Volante"], "Sin Asignar");
    }

    #[test]
    fn test_assignment_missing_comment() {
        let slot: StintAssignment =
            serde_json::from_value(json!({"Piloto al Volante": "Sam"})).unwrap();
        assert_eq!(slot.pilot.as_deref(), Some("Sam"));
        assert_eq!(slot.comment, "");

        let slot: StintAssignment =
            serde_json::from_value(json!({"Piloto al Volante": "Sam", "Comentarios": null}))
                .unwrap();
        assert_eq!(slot.comment, "");
    }

    #[test]
    fn test_team_missing_race_config_defaults() {
        let horario = vec![json!({"Piloto al Volante": "Sin Asignar", "Comentarios": ""}); 24];
        let team: Team = serde_json::from_value(json!({
            "pilots": [],
            "horario": horario
        }))
        .unwrap();
        assert_eq!(team.race_config, RaceConfig::default());
        assert!(team.validate().is_ok());
    }

    #[test]
    fn test_validate_schedule_length_mismatch() {
        let mut team = Team::new(RaceDuration::try_from(4).unwrap());
        team.schedule.pop();
        let err = team.validate().unwrap_err();
        assert!(err.to_string().contains("3 slots"));
    }

    #[test]
    fn test_check_hour() {
        let team = Team::new(RaceDuration::try_from(3).unwrap());
        assert!(team.check_hour(2).is_ok());
        assert!(matches!(
            team.check_hour(3),
            Err(Error::HourOutOfRange { hour: 3, duration: 3 })
        ));
    }

    #[test]
    fn test_pilot_names_skip_blank_and_repeats() {
        let mut team = Team::new(RaceDuration::try_from(3).unwrap());
        team.pilots.push(PilotAvailability::available_for("", 3));
        team.pilots.push(PilotAvailability::available_for("Piloto 1", 3));
        assert_eq!(team.pilot_names().len(), 4);
    }

    #[test]
    fn test_check_unique_names() {
        let pilots = vec![
            PilotAvailability::available_for("Ana", 3),
            PilotAvailability::available_for("Ben", 3),
            PilotAvailability::available_for("Ana", 3),
        ];
        let err = check_unique_names(&pilots).unwrap_err();
        assert!(matches!(err, Error::DuplicatePilot { name } if name == "Ana"));
        assert!(check_unique_names(&pilots[..2]).is_ok());
    }
}
