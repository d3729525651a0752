//! Error types for stintplan.
//!
//! This module defines all error types used throughout the stintplan crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for stintplan operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Validation Errors ===
    /// A team cannot be created without a name.
    #[error("team name cannot be empty")]
    EmptyTeamName,

    /// A team with this name already exists.
    #[error("team '{name}' already exists")]
    DuplicateTeam {
        /// The rejected team name.
        name: String,
    },

    /// The only remaining team cannot be deleted.
    #[error("cannot delete '{name}': it is the last team")]
    LastTeam {
        /// The team that was going to be deleted.
        name: String,
    },

    /// No team with this name exists.
    #[error("team '{name}' not found")]
    TeamNotFound {
        /// The requested team name.
        name: String,
    },

    /// The race duration is not one of the allowed values.
    #[error("invalid race duration {hours}h (allowed: 24, 12, 10, 8, 6, 4, 3)")]
    InvalidDuration {
        /// The rejected duration in hours.
        hours: u32,
    },

    /// The race start hour is outside 0..=23.
    #[error("invalid start hour {hour} (expected 0-23)")]
    InvalidStartHour {
        /// The rejected hour.
        hour: u32,
    },

    /// An hour-slot index is past the end of the race.
    #[error("hour {hour} is out of range for a {duration}h race")]
    HourOutOfRange {
        /// The requested hour index.
        hour: usize,
        /// The race duration in hours.
        duration: usize,
    },

    /// Two pilots in the same team share a name.
    #[error("duplicate pilot name '{name}'")]
    DuplicatePilot {
        /// The repeated pilot name.
        name: String,
    },

    /// An edited schedule does not cover every race hour.
    #[error("schedule has {actual} slots, expected {expected}")]
    ScheduleLength {
        /// Slots in the race.
        expected: usize,
        /// Slots supplied.
        actual: usize,
    },

    /// No pilot with this name exists in the team.
    #[error("pilot '{name}' not found")]
    PilotNotFound {
        /// The requested pilot name.
        name: String,
    },

    // === Document Errors ===
    /// The stored document does not have the expected shape.
    #[error("malformed document: {message}")]
    Document {
        /// Description of the problem.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV export failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// A specialized Result type for stintplan operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new document error.
    #[must_use]
    pub fn document(message: impl Into<String>) -> Self {
        Self::Document {
            message: message.into(),
        }
    }

    /// Create a team-not-found error.
    #[must_use]
    pub fn team_not_found(name: impl Into<String>) -> Self {
        Self::TeamNotFound { name: name.into() }
    }

    /// Create a pilot-not-found error.
    #[must_use]
    pub fn pilot_not_found(name: impl Into<String>) -> Self {
        Self::PilotNotFound { name: name.into() }
    }

    /// Check if this error is a user-facing validation failure.
    ///
    /// Validation failures abort the command without touching the store.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmptyTeamName
                | Self::DuplicateTeam { .. }
                | Self::LastTeam { .. }
                | Self::TeamNotFound { .. }
                | Self::InvalidDuration { .. }
                | Self::InvalidStartHour { .. }
                | Self::HourOutOfRange { .. }
                | Self::DuplicatePilot { .. }
                | Self::ScheduleLength { .. }
                | Self::PilotNotFound { .. }
        )
    }

    /// Check if this error came from the persistence layer.
    #[must_use]
    pub fn is_storage_error(&self) -> bool {
        matches!(
            self,
            Self::DatabaseOpen { .. } | Self::DatabaseQuery(_) | Self::DatabaseMigration { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::EmptyTeamName;
        assert_eq!(err.to_string(), "team name cannot be empty");

        let err = Error::document("missing horario");
        assert_eq!(err.to_string(), "malformed document: missing horario");
    }

    #[test]
    fn test_duplicate_team_display() {
        let err = Error::DuplicateTeam {
            name: "Apex".to_string(),
        };
        assert_eq!(err.to_string(), "team 'Apex' already exists");
    }

    #[test]
    fn test_last_team_display() {
        let err = Error::LastTeam {
            name: "Solo".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Solo"));
        assert!(msg.contains("last team"));
    }

    #[test]
    fn test_invalid_duration_display() {
        let err = Error::InvalidDuration { hours: 5 };
        assert!(err.to_string().contains("5h"));
    }

    #[test]
    fn test_hour_out_of_range_display() {
        let err = Error::HourOutOfRange {
            hour: 30,
            duration: 24,
        };
        let msg = err.to_string();
        assert!(msg.contains("30"));
        assert!(msg.contains("24h"));
    }

    #[test]
    fn test_is_validation() {
        assert!(Error::EmptyTeamName.is_validation());
        assert!(Error::team_not_found("x").is_validation());
        assert!(Error::pilot_not_found("x").is_validation());
        assert!(Error::InvalidStartHour { hour: 24 }.is_validation());
        assert!(!Error::document("x").is_validation());
    }

    #[test]
    fn test_is_storage_error() {
        let err = Error::DatabaseMigration {
            message: "version mismatch".to_string(),
        };
        assert!(err.is_storage_error());
        assert!(!Error::EmptyTeamName.is_storage_error());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_rusqlite_error() {
        let result = rusqlite::Connection::open_with_flags(
            "/nonexistent/path/db.sqlite",
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        );
        if let Err(sqlite_err) = result {
            let err: Error = sqlite_err.into();
            assert!(matches!(err, Error::DatabaseQuery(_)));
        }
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "document_id must not be empty".to_string(),
        };
        assert!(err.to_string().contains("document_id"));
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden"));
    }
}
