//! Command-line interface for stintplan.
//!
//! This module provides the CLI structure, command definitions and the
//! plain-text rendering of views for the `stintplan` binary.

mod commands;
pub mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ConfigCommand, ExportCommand, HoursArgs, PilotCommand, RaceCommand, StatusCommand,
    StintCommand, TeamCommand, ViewArgs,
};

/// stintplan - Plan driver stints for endurance sim races
///
/// Keeps each team's pilot availability and hour-by-hour driver schedule in
/// a shared store. Saving availability clears any stint the new availability
/// no longer allows.
#[derive(Debug, Parser)]
#[command(name = "stintplan")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create, delete and inspect teams
    #[command(subcommand)]
    Team(TeamCommand),

    /// Change race settings
    #[command(subcommand)]
    Race(RaceCommand),

    /// Edit pilot availability
    #[command(subcommand)]
    Pilot(PilotCommand),

    /// Assign pilots and comments to hour slots
    #[command(subcommand)]
    Stint(StintCommand),

    /// Show the stint schedule
    Schedule(ViewArgs),

    /// Show stint counts and cap alerts
    Summary(ViewArgs),

    /// Export the schedule as CSV
    Export(ExportCommand),

    /// Show database location and contents
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "stintplan");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_flags() {
        use crate::logging::Verbosity;

        assert_eq!(parse(&["stintplan", "-q", "team", "list"]).verbosity(), Verbosity::Quiet);
        assert_eq!(parse(&["stintplan", "team", "list"]).verbosity(), Verbosity::Normal);
        assert_eq!(parse(&["stintplan", "-v", "team", "list"]).verbosity(), Verbosity::Verbose);
        assert_eq!(parse(&["stintplan", "-vv", "team", "list"]).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_parse_team_create_default_duration() {
        let cli = parse(&["stintplan", "team", "create", "Apex"]);
        assert!(matches!(
            cli.command,
            Command::Team(TeamCommand::Create { ref name, duration: 24 }) if name == "Apex"
        ));
    }

    #[test]
    fn test_parse_team_create_duration() {
        let cli = parse(&["stintplan", "team", "create", "Apex", "-d", "6"]);
        assert!(matches!(
            cli.command,
            Command::Team(TeamCommand::Create { duration: 6, .. })
        ));
    }

    #[test]
    fn test_parse_stint_assign() {
        let cli = parse(&["stintplan", "stint", "assign", "Apex", "3", "Alex"]);
        assert!(matches!(
            cli.command,
            Command::Stint(StintCommand::Assign { hour: 3, ref pilot, .. }) if pilot == "Alex"
        ));
    }

    #[test]
    fn test_parse_pilot_hours_list() {
        let cli = parse(&[
            "stintplan", "pilot", "hours", "Apex", "Alex", "--unavailable", "1,2", "5",
        ]);
        let Command::Pilot(PilotCommand::Hours(args)) = cli.command else {
            panic!("expected pilot hours");
        };
        assert_eq!(args.unavailable, vec![1, 2, 5]);
        assert!(args.available.is_empty());
    }

    #[test]
    fn test_parse_pilot_set_flags() {
        let cli = parse(&[
            "stintplan", "pilot", "set", "Apex", "Alex", "--start", "true", "--cap", "3",
        ]);
        assert!(matches!(
            cli.command,
            Command::Pilot(PilotCommand::Set {
                start: Some(true),
                finish: None,
                cap: Some(3),
                ..
            })
        ));
    }

    #[test]
    fn test_parse_export_conflict() {
        let result =
            Cli::try_parse_from(["stintplan", "export", "Apex", "--stdout", "-o", "x.csv"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_status_json() {
        let cli = parse(&["stintplan", "status", "--json"]);
        assert!(matches!(cli.command, Command::Status(StatusCommand { json: true })));
    }

    #[test]
    fn test_parse_with_config() {
        let cli = parse(&["stintplan", "-c", "/custom/config.toml", "summary", "Apex"]);
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
        assert!(matches!(cli.command, Command::Summary(_)));
    }
}
