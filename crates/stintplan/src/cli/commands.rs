//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Team management commands.
#[derive(Debug, Subcommand)]
pub enum TeamCommand {
    /// List all teams in store order
    List {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Create a team with default pilots
    Create {
        /// Name of the new team
        name: String,

        /// Race duration in hours (24, 12, 10, 8, 6, 4 or 3)
        #[arg(short, long, default_value = "24")]
        duration: u32,
    },

    /// Delete a team (the last team cannot be deleted)
    Delete {
        /// Name of the team to delete
        name: String,
    },

    /// Show a team's availability table, schedule and summary
    Show(ViewArgs),
}

/// Race configuration commands.
#[derive(Debug, Subcommand)]
pub enum RaceCommand {
    /// Set the hour of day the race starts
    StartHour {
        /// Team name
        team: String,

        /// Start hour (0-23)
        hour: u32,
    },
}

/// Pilot availability commands.
///
/// Every change is saved as a whole availability table, which clears any
/// schedule slot the new availability no longer allows.
#[derive(Debug, Subcommand)]
pub enum PilotCommand {
    /// Show the availability table
    List(ViewArgs),

    /// Add a pilot, available for every hour unless told otherwise
    Add {
        /// Team name
        team: String,

        /// Pilot name
        name: String,

        /// Pilot wants the opening stint
        #[arg(long)]
        start: bool,

        /// Pilot wants the closing stint
        #[arg(long)]
        finish: bool,

        /// Maximum stints (0 for no cap)
        #[arg(long, default_value = "0")]
        cap: u32,

        /// Start with every hour unavailable
        #[arg(long)]
        unavailable: bool,
    },

    /// Remove a pilot
    Remove {
        /// Team name
        team: String,

        /// Pilot name
        name: String,
    },

    /// Change a pilot's start/finish preference or stint cap
    Set {
        /// Team name
        team: String,

        /// Pilot name
        name: String,

        /// Whether the pilot wants the opening stint
        #[arg(long)]
        start: Option<bool>,

        /// Whether the pilot wants the closing stint
        #[arg(long)]
        finish: Option<bool>,

        /// Maximum stints (0 for no cap)
        #[arg(long)]
        cap: Option<u32>,
    },

    /// Mark hours as available or unavailable for a pilot
    Hours(HoursArgs),

    /// Replace the whole table from a JSON file of pilot records
    Import {
        /// Team name
        team: String,

        /// JSON array in the stored pilot record format
        file: PathBuf,
    },
}

/// Arguments for editing a pilot's hourly availability.
#[derive(Debug, Args)]
pub struct HoursArgs {
    /// Team name
    pub team: String,

    /// Pilot name
    pub name: String,

    /// Hour indices to mark available
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    pub available: Vec<usize>,

    /// Hour indices to mark unavailable
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    pub unavailable: Vec<usize>,
}

/// Schedule slot commands.
#[derive(Debug, Subcommand)]
pub enum StintCommand {
    /// Assign a pilot to an hour slot
    Assign {
        /// Team name
        team: String,

        /// Hour index from race start (0-based)
        hour: usize,

        /// Pilot name ("Sin Asignar" clears the slot)
        pilot: String,
    },

    /// Clear the pilot of an hour slot
    Clear {
        /// Team name
        team: String,

        /// Hour index from race start (0-based)
        hour: usize,
    },

    /// Set the comment of an hour slot
    Comment {
        /// Team name
        team: String,

        /// Hour index from race start (0-based)
        hour: usize,

        /// Comment text (empty to clear)
        text: String,
    },
}

/// Arguments shared by commands that display a team.
#[derive(Debug, Args)]
pub struct ViewArgs {
    /// Team name
    pub team: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Export command arguments.
#[derive(Debug, Args)]
pub struct ExportCommand {
    /// Team name
    pub team: String,

    /// Output file (defaults to a timestamped file in the export directory)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Write the CSV to stdout instead of a file
    #[arg(long, conflicts_with = "output")]
    pub stdout: bool,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_command_debug() {
        let cmd = TeamCommand::Create {
            name: "Apex".to_string(),
            duration: 6,
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Create"));
        assert!(debug_str.contains("Apex"));
    }

    #[test]
    fn test_view_args_debug() {
        let args = ViewArgs {
            team: "Apex".to_string(),
            json: true,
        };
        let debug_str = format!("{args:?}");
        assert!(debug_str.contains("json"));
    }

    #[test]
    fn test_stint_command_debug() {
        let cmd = StintCommand::Clear {
            team: "Apex".to_string(),
            hour: 3,
        };
        assert!(format!("{cmd:?}").contains("Clear"));
    }
}
