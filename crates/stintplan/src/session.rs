//! Session context and command handlers.
//!
//! A [`Session`] holds the last document snapshot read from the store and the
//! currently selected team. Each handler validates its input, performs one
//! reload-modify-save cycle through the [`Gateway`], and replaces the
//! snapshot with the document it just wrote. Handlers that fail validation
//! leave both the store and the snapshot untouched.

use tracing::{debug, info};

use crate::document::StoreDocument;
use crate::error::{Error, Result};
use crate::gateway::Gateway;
use crate::reconcile::reconcile;
use crate::storage::DocumentStore;
use crate::team::{check_unique_names, PilotAvailability, RaceDuration, StintAssignment, Team};
use crate::view::TeamView;

/// In-memory state of one user session.
#[derive(Debug)]
pub struct Session<S> {
    gateway: Gateway<S>,
    document: StoreDocument,
    selected: Option<String>,
}

impl<S: DocumentStore> Session<S> {
    /// Start a session, loading (or bootstrapping) the store document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be loaded.
    pub fn open(gateway: Gateway<S>) -> Result<Self> {
        let document = gateway.load()?;
        Ok(Self {
            gateway,
            document,
            selected: None,
        })
    }

    /// The current document snapshot.
    #[must_use]
    pub fn document(&self) -> &StoreDocument {
        &self.document
    }

    /// The gateway this session writes through.
    #[must_use]
    pub fn gateway(&self) -> &Gateway<S> {
        &self.gateway
    }

    /// Name of the selected team, if any.
    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Select a team from the snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TeamNotFound`] if the team is not in the snapshot.
    pub fn select(&mut self, name: &str) -> Result<()> {
        self.document.require(name)?;
        self.selected = Some(name.to_string());
        Ok(())
    }

    /// Re-read the store, dropping the selection if its team disappeared.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be loaded.
    pub fn refresh(&mut self) -> Result<()> {
        let document = self.gateway.load()?;
        self.replace_snapshot(document);
        Ok(())
    }

    /// Create a team with default pilots and select it.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty or taken name or a disallowed
    /// duration, or a persistence error.
    pub fn create_team(&mut self, name: &str, hours: u32) -> Result<()> {
        let duration = RaceDuration::try_from(hours)?;
        if name.is_empty() {
            return Err(Error::EmptyTeamName);
        }
        let (document, ()) = self.gateway.update(|doc| {
            doc.create_team(name, duration)?;
            Ok(())
        })?;
        info!("Created team '{}' ({})", name, duration);
        self.replace_snapshot(document);
        self.selected = Some(name.to_string());
        Ok(())
    }

    /// Delete a team unless it is the last one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LastTeam`], [`Error::TeamNotFound`], or a persistence
    /// error.
    pub fn delete_team(&mut self, name: &str) -> Result<()> {
        let (document, _removed) = self.gateway.update(|doc| doc.delete_team(name))?;
        info!("Deleted team '{}'", name);
        if self.selected.as_deref() == Some(name) {
            self.selected = None;
        }
        self.replace_snapshot(document);
        Ok(())
    }

    /// Change the race start hour.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidStartHour`], [`Error::TeamNotFound`], or a
    /// persistence error.
    pub fn set_start_hour(&mut self, team: &str, hour: u32) -> Result<()> {
        if hour > 23 {
            return Err(Error::InvalidStartHour { hour });
        }
        let (document, ()) = self.gateway.update(|doc| {
            doc.require_mut(team)?.race_config.start_hour = hour;
            Ok(())
        })?;
        info!("Team '{}' now starts at {:02}:00", team, hour);
        self.replace_snapshot(document);
        Ok(())
    }

    /// Save a team's pilot availability table.
    ///
    /// The latest stored schedule is reconciled against `pilots` before both
    /// are written, so no slot stays assigned to a pilot who is not available
    /// for it. Returns the hour indices whose assignment was cleared.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicatePilot`], [`Error::TeamNotFound`], or a
    /// persistence error.
    pub fn save_pilots(
        &mut self,
        team: &str,
        mut pilots: Vec<PilotAvailability>,
    ) -> Result<Vec<usize>> {
        check_unique_names(&pilots)?;
        let (document, cleared) = self.gateway.update(|doc| {
            let stored = doc.require_mut(team)?;
            let hours = stored.hours();
            for pilot in &mut pilots {
                pilot.hourly.resize(hours, false);
            }
            let schedule = reconcile(&pilots, &stored.schedule, hours);
            let cleared: Vec<usize> = stored
                .schedule
                .iter()
                .zip(&schedule)
                .enumerate()
                .filter(|(_, (before, after))| before.pilot != after.pilot)
                .map(|(hour, _)| hour)
                .collect();
            stored.pilots = pilots;
            stored.schedule = schedule;
            Ok(cleared)
        })?;
        info!(
            "Saved pilots for '{}', {} assignment(s) cleared",
            team,
            cleared.len()
        );
        self.replace_snapshot(document);
        Ok(cleared)
    }

    /// Edit the snapshot's pilot table with `edit` and save the result.
    ///
    /// The edit starts from the table this session last displayed, matching
    /// a user editing the table on screen.
    ///
    /// # Errors
    ///
    /// Returns the closure's error or any [`Session::save_pilots`] error.
    pub fn edit_pilots(
        &mut self,
        team: &str,
        edit: impl FnOnce(&mut Vec<PilotAvailability>) -> Result<()>,
    ) -> Result<Vec<usize>> {
        let mut pilots = self.document.require(team)?.pilots.clone();
        edit(&mut pilots)?;
        self.save_pilots(team, pilots)
    }

    /// Save a team's schedule as edited on screen.
    ///
    /// `edited` is the full schedule the user submitted. Only slots whose
    /// pilot or comment differ from this session's snapshot are written, and
    /// they are written onto the freshly loaded schedule, so slots the user
    /// did not touch keep whatever another session stored meanwhile.
    /// Assignments are not checked against availability here. Returns how
    /// many slots changed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ScheduleLength`], [`Error::TeamNotFound`], or a
    /// persistence error.
    pub fn save_schedule(&mut self, team: &str, edited: &[StintAssignment]) -> Result<usize> {
        let shown = self.document.require(team)?.schedule.clone();
        if edited.len() != shown.len() {
            return Err(Error::ScheduleLength {
                expected: shown.len(),
                actual: edited.len(),
            });
        }

        let (document, changed) = self.gateway.update(|doc| {
            let latest = &mut doc.require_mut(team)?.schedule;
            let mut changed = 0;
            for (hour, (new, old)) in edited.iter().zip(&shown).enumerate() {
                let Some(slot) = latest.get_mut(hour) else {
                    break;
                };
                let mut touched = false;
                if new.pilot != old.pilot {
                    slot.pilot.clone_from(&new.pilot);
                    touched = true;
                }
                if new.comment != old.comment {
                    slot.comment.clone_from(&new.comment);
                    touched = true;
                }
                if touched {
                    debug!(hour, pilot = slot.pilot_label(), "slot updated");
                    changed += 1;
                }
            }
            Ok(changed)
        })?;
        info!("Saved schedule for '{}', {} slot(s) changed", team, changed);
        self.replace_snapshot(document);
        Ok(changed)
    }

    /// Assign `pilot` (or clear with `None`) at `hour`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HourOutOfRange`] or any [`Session::save_schedule`] error.
    pub fn assign(&mut self, team: &str, hour: usize, pilot: Option<String>) -> Result<()> {
        let mut edited = self.checked_schedule(team, hour)?;
        edited[hour].pilot = pilot;
        self.save_schedule(team, &edited).map(|_| ())
    }

    /// Set the comment at `hour`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HourOutOfRange`] or any [`Session::save_schedule`] error.
    pub fn comment(&mut self, team: &str, hour: usize, text: &str) -> Result<()> {
        let mut edited = self.checked_schedule(team, hour)?;
        edited[hour].comment = text.to_string();
        self.save_schedule(team, &edited).map(|_| ())
    }

    /// Build the display view of a team from the snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TeamNotFound`].
    pub fn view(&self, team: &str) -> Result<TeamView> {
        Ok(TeamView::build(team, self.document.require(team)?))
    }

    /// A team from the snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TeamNotFound`].
    pub fn team(&self, name: &str) -> Result<&Team> {
        self.document.require(name)
    }

    fn checked_schedule(&self, team: &str, hour: usize) -> Result<Vec<StintAssignment>> {
        let stored = self.document.require(team)?;
        stored.check_hour(hour)?;
        Ok(stored.schedule.clone())
    }

    fn replace_snapshot(&mut self, document: StoreDocument) {
        if let Some(name) = &self.selected {
            if !document.contains(name) {
                debug!("Selected team '{}' no longer exists", name);
                self.selected = None;
            }
        }
        self.document = document;
    }
}
