//! `stintplan` - CLI for planning endurance race stints
//!
//! This binary provides the command-line interface for editing team rosters,
//! pilot availability and stint schedules stored in the shared database.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use tracing::{info, warn};

use stintplan::cli::{
    render, Cli, Command, ConfigCommand, ExportCommand, HoursArgs, PilotCommand, RaceCommand,
    StatusCommand, StintCommand, TeamCommand, ViewArgs,
};
use stintplan::export::{default_file_name, to_csv_string, write_file};
use stintplan::team::parse_pilot_choice;
use stintplan::{init_logging, Config, Error, Gateway, PilotAvailability, Session, Storage};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    if let Command::Config(config_cmd) = cli.command {
        return handle_config(&config, config_cmd);
    }

    let storage = Storage::open(config.database_path())?;
    let mut session = Session::open(Gateway::new(storage, &config.storage.document_id))?;

    // Execute the command
    match cli.command {
        Command::Team(team_cmd) => handle_team(&mut session, team_cmd),
        Command::Race(race_cmd) => handle_race(&mut session, race_cmd),
        Command::Pilot(pilot_cmd) => handle_pilot(&mut session, pilot_cmd),
        Command::Stint(stint_cmd) => handle_stint(&mut session, stint_cmd),
        Command::Schedule(args) => handle_schedule(&session, &args),
        Command::Summary(args) => handle_summary(&session, &args),
        Command::Export(export_cmd) => handle_export(&config, &session, export_cmd),
        Command::Status(status_cmd) => handle_status(&session, &status_cmd),
        Command::Config(_) => Ok(()),
    }
}

fn handle_team(
    session: &mut Session<Storage>,
    cmd: TeamCommand,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        TeamCommand::List { json } => {
            let document = session.document();
            if json {
                let teams: Vec<_> = document
                    .iter()
                    .map(|(name, team)| {
                        serde_json::json!({
                            "name": name,
                            "start_hour": team.race_config.start_hour,
                            "duration": team.race_config.duration,
                            "pilots": team.pilots.len(),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&teams)?);
            } else {
                for (name, team) in document.iter() {
                    println!(
                        "{name}  ({}h from {:02}:00, {} pilots)",
                        team.race_config.duration,
                        team.race_config.start_hour,
                        team.pilots.len()
                    );
                }
            }
        }
        TeamCommand::Create { name, duration } => {
            session.create_team(&name, duration)?;
            println!("Created team '{name}' ({duration}h)");
        }
        TeamCommand::Delete { name } => {
            session.delete_team(&name)?;
            println!("Deleted team '{name}'");
        }
        TeamCommand::Show(args) => {
            session.select(&args.team)?;
            let view = session.view(&args.team)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                println!("{}", render::header(&view));
                println!();
                println!("Legend");
                println!("{}", render::legend(&view));
                println!();
                println!("Availability");
                print!("{}", render::availability_table(&view));
                println!();
                println!("Schedule");
                print!("{}", render::schedule_table(&view));
                println!();
                println!("Summary");
                print!("{}", render::summary(&view.summary));
            }
        }
    }
    Ok(())
}

fn handle_race(
    session: &mut Session<Storage>,
    cmd: RaceCommand,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        RaceCommand::StartHour { team, hour } => {
            session.set_start_hour(&team, hour)?;
            println!("Team '{team}' now starts at {hour:02}:00");
        }
    }
    Ok(())
}

fn handle_pilot(
    session: &mut Session<Storage>,
    cmd: PilotCommand,
) -> Result<(), Box<dyn std::error::Error>> {
    let (team, cleared) = match cmd {
        PilotCommand::List(args) => {
            let view = session.view(&args.team)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&view.pilots)?);
            } else {
                print!("{}", render::availability_table(&view));
            }
            return Ok(());
        }
        PilotCommand::Add {
            team,
            name,
            start,
            finish,
            cap,
            unavailable,
        } => {
            let hours = session.team(&team)?.hours();
            let mut pilot = PilotAvailability::available_for(name, hours);
            pilot.wants_to_start = start;
            pilot.wants_to_finish = finish;
            pilot.stint_cap = cap;
            if unavailable {
                pilot.hourly = vec![false; hours];
            }
            let cleared = session.edit_pilots(&team, |pilots| {
                pilots.push(pilot);
                Ok(())
            })?;
            (team, cleared)
        }
        PilotCommand::Remove { team, name } => {
            let cleared = session.edit_pilots(&team, |pilots| {
                let before = pilots.len();
                pilots.retain(|p| p.name != name);
                if pilots.len() == before {
                    return Err(Error::pilot_not_found(&name));
                }
                Ok(())
            })?;
            (team, cleared)
        }
        PilotCommand::Set {
            team,
            name,
            start,
            finish,
            cap,
        } => {
            let cleared = session.edit_pilots(&team, |pilots| {
                let pilot = pilots
                    .iter_mut()
                    .find(|p| p.name == name)
                    .ok_or_else(|| Error::pilot_not_found(&name))?;
                if let Some(start) = start {
                    pilot.wants_to_start = start;
                }
                if let Some(finish) = finish {
                    pilot.wants_to_finish = finish;
                }
                if let Some(cap) = cap {
                    pilot.stint_cap = cap;
                }
                Ok(())
            })?;
            (team, cleared)
        }
        PilotCommand::Hours(args) => {
            let cleared = set_hours(session, &args)?;
            (args.team, cleared)
        }
        PilotCommand::Import { team, file } => {
            let json = fs::read_to_string(&file)?;
            let pilots: Vec<PilotAvailability> = serde_json::from_str(&json)?;
            info!("Importing {} pilots from {}", pilots.len(), file.display());
            let cleared = session.save_pilots(&team, pilots)?;
            (team, cleared)
        }
    };

    println!("Saved pilots for '{team}'");
    if !cleared.is_empty() {
        let config = &session.team(&team)?.race_config;
        println!("Cleared {} stint(s) no longer covered:", cleared.len());
        for hour in cleared {
            println!("  {}", config.slot_label(hour));
        }
    }
    Ok(())
}

fn set_hours(
    session: &mut Session<Storage>,
    args: &HoursArgs,
) -> Result<Vec<usize>, Box<dyn std::error::Error>> {
    let team = session.team(&args.team)?;
    for hour in args.available.iter().chain(&args.unavailable) {
        team.check_hour(*hour)?;
    }
    let cleared = session.edit_pilots(&args.team, |pilots| {
        let pilot = pilots
            .iter_mut()
            .find(|p| p.name == args.name)
            .ok_or_else(|| Error::pilot_not_found(&args.name))?;
        for hour in &args.available {
            pilot.set_hourly(*hour, true);
        }
        for hour in &args.unavailable {
            pilot.set_hourly(*hour, false);
        }
        Ok(())
    })?;
    Ok(cleared)
}

fn handle_stint(
    session: &mut Session<Storage>,
    cmd: StintCommand,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        StintCommand::Assign { team, hour, pilot } => {
            let choice = parse_pilot_choice(&pilot);
            if choice.is_some() {
                let view = session.view(&team)?;
                if let Some(slot) = view.slots.get(hour) {
                    if !slot.choices.contains(&pilot) {
                        warn!("{} is not available for {}", pilot, slot.label);
                    }
                }
            }
            session.assign(&team, hour, choice)?;
            println!("Hour {hour}: {pilot}");
        }
        StintCommand::Clear { team, hour } => {
            session.assign(&team, hour, None)?;
            println!("Hour {hour}: cleared");
        }
        StintCommand::Comment { team, hour, text } => {
            session.comment(&team, hour, &text)?;
            println!("Hour {hour}: comment saved");
        }
    }
    Ok(())
}

fn handle_schedule(
    session: &Session<Storage>,
    args: &ViewArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let view = session.view(&args.team)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&view.slots)?);
    } else {
        println!("{}", render::header(&view));
        print!("{}", render::schedule_table(&view));
    }
    Ok(())
}

fn handle_summary(
    session: &Session<Storage>,
    args: &ViewArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let view = session.view(&args.team)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&view.summary)?);
    } else {
        print!("{}", render::summary(&view.summary));
    }
    Ok(())
}

fn handle_export(
    config: &Config,
    session: &Session<Storage>,
    cmd: ExportCommand,
) -> Result<(), Box<dyn std::error::Error>> {
    let team = session.team(&cmd.team)?;
    if cmd.stdout {
        print!("{}", to_csv_string(team)?);
        return Ok(());
    }

    let path: PathBuf = cmd.output.unwrap_or_else(|| {
        config
            .export_dir()
            .join(default_file_name(&cmd.team, &chrono::Local::now()))
    });
    write_file(team, &path)?;
    info!("Exported '{}' to {}", cmd.team, path.display());
    println!("{}", path.display());
    Ok(())
}

fn handle_status(
    session: &Session<Storage>,
    cmd: &StatusCommand,
) -> Result<(), Box<dyn std::error::Error>> {
    let gateway = session.gateway();
    let storage = gateway.store();
    let stats = storage.stats()?;
    let updated_at = storage.updated_at(gateway.document_id())?;
    let teams = session.document().len();

    if cmd.json {
        let status = serde_json::json!({
            "database_path": storage.path(),
            "document_id": gateway.document_id(),
            "documents": stats.total_documents,
            "teams": teams,
            "updated_at": updated_at,
            "db_size_bytes": stats.db_size_bytes,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("stintplan status");
        println!("----------------");
        println!("Database:      {}", storage.path().display());
        println!("Document:      {}", gateway.document_id());
        println!("Teams:         {teams}");
        match updated_at {
            Some(at) => println!("Last write:    {}", at.to_rfc3339()),
            None => println!("Last write:    never"),
        }
        println!("Size:          {} bytes", stats.db_size_bytes);
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!("  Document id:        {}", config.storage.document_id);
                println!();
                println!("[Export]");
                println!("  Output directory:   {}", config.export_dir().display());
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
