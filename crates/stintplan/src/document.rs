//! The multi-team store document.
//!
//! The whole store is one JSON object mapping team names to [`Team`]s. Team
//! insertion order is kept so listings match the order teams were created in.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};
use crate::team::{RaceDuration, Team, DEFAULT_TEAM_NAME};

/// All teams in the store, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreDocument {
    teams: Vec<(String, Team)>,
}

impl StoreDocument {
    /// The first-run document: one default 24h team.
    #[must_use]
    pub fn bootstrap() -> Self {
        Self {
            teams: vec![(
                DEFAULT_TEAM_NAME.to_string(),
                Team::new(RaceDuration::TWENTY_FOUR),
            )],
        }
    }

    /// Parse a stored document and check every team's invariants.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a team is inconsistent.
    pub fn from_json(json: &str) -> Result<Self> {
        let document: Self = serde_json::from_str(json)?;
        for (name, team) in &document.teams {
            team.validate()
                .map_err(|e| Error::document(format!("team '{name}': {e}")))?;
        }
        Ok(document)
    }

    /// Serialize the document for storage.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Number of teams.
    #[must_use]
    pub fn len(&self) -> usize {
        self.teams.len()
    }

    /// Whether the store has no teams.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    /// Team names in insertion order.
    #[must_use]
    pub fn team_names(&self) -> Vec<&str> {
        self.teams.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Iterate over `(name, team)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Team)> {
        self.teams.iter().map(|(name, team)| (name.as_str(), team))
    }

    /// Whether a team with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.team(name).is_some()
    }

    /// Look up a team.
    #[must_use]
    pub fn team(&self, name: &str) -> Option<&Team> {
        self.teams.iter().find(|(n, _)| n == name).map(|(_, t)| t)
    }

    /// Look up a team for editing.
    pub fn team_mut(&mut self, name: &str) -> Option<&mut Team> {
        self.teams
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, t)| t)
    }

    /// Look up a team, failing if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TeamNotFound`].
    pub fn require(&self, name: &str) -> Result<&Team> {
        self.team(name).ok_or_else(|| Error::team_not_found(name))
    }

    /// Look up a team for editing, failing if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TeamNotFound`].
    pub fn require_mut(&mut self, name: &str) -> Result<&mut Team> {
        self.team_mut(name).ok_or_else(|| Error::team_not_found(name))
    }

    /// Add a default team under a new name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyTeamName`] or [`Error::DuplicateTeam`]; the
    /// document is unchanged on error.
    pub fn create_team(&mut self, name: &str, duration: RaceDuration) -> Result<&Team> {
        if name.is_empty() {
            return Err(Error::EmptyTeamName);
        }
        if self.contains(name) {
            return Err(Error::DuplicateTeam {
                name: name.to_string(),
            });
        }
        self.teams.push((name.to_string(), Team::new(duration)));
        Ok(&self.teams[self.teams.len() - 1].1)
    }

    /// Remove a team, refusing to remove the last one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TeamNotFound`] or [`Error::LastTeam`]; the document
    /// is unchanged on error.
    pub fn delete_team(&mut self, name: &str) -> Result<Team> {
        let index = self
            .teams
            .iter()
            .position(|(n, _)| n == name)
            .ok_or_else(|| Error::team_not_found(name))?;
        if self.teams.len() <= 1 {
            return Err(Error::LastTeam {
                name: name.to_string(),
            });
        }
        Ok(self.teams.remove(index).1)
    }
}

impl Serialize for StoreDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.teams.len()))?;
        for (name, team) in &self.teams {
            map.serialize_entry(name, team)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for StoreDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct DocumentVisitor;

        impl<'de> Visitor<'de> for DocumentVisitor {
            type Value = StoreDocument;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of team names to teams")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut teams: Vec<(String, Team)> =
                    Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, team)) = access.next_entry::<String, Team>()? {
                    match teams.iter_mut().find(|(n, _)| *n == name) {
                        Some(entry) => entry.1 = team,
                        None => teams.push((name, team)),
                    }
                }
                Ok(StoreDocument { teams })
            }
        }

        deserializer.deserialize_map(DocumentVisitor)
    }
}
