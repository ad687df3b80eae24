//! Roster CLI
//!
//! Drives the roster engine against a team file (JSON) and a player
//! directory (CSV).

#[cfg(feature = "cli")]
use anyhow::{Context, Result};
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use roster_core::{
    InMemoryPlayerDirectory, InMemoryTeamStore, LineupRow, PlayerPosition, RosterRules, RosterService, RosterSlot,
    RosterView, ScoringSystem, SlotAllocator, Team, TeamSettings, TeamStore,
};
#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "roster")]
#[command(about = "Manage fantasy football roster slots", long_about = None)]
struct Cli {
    /// Roster rules YAML (defaults to $ROSTER_RULES_PATH, then the standard rules)
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Create a team file with the standard roster layout
    Init {
        #[arg(long)]
        team: PathBuf,

        #[arg(long)]
        name: String,

        #[arg(long)]
        league_name: Option<String>,

        /// ppr, half_ppr or standard
        #[arg(long, default_value = "ppr")]
        scoring: ScoringSystem,

        #[arg(long, default_value_t = 12)]
        league_size: u32,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Validate team settings and roster layout
    Validate {
        #[arg(long)]
        team: PathBuf,
    },

    /// List slots; with --position only open slots that position may fill
    Slots {
        #[arg(long)]
        team: PathBuf,

        #[arg(long)]
        position: Option<PlayerPosition>,
    },

    /// Show the ordered lineup
    Lineup {
        #[arg(long)]
        team: PathBuf,

        /// Player directory CSV, for names
        #[arg(long)]
        players: Option<PathBuf>,
    },

    /// Place a player into a slot (QB, RB2, FLEX, BN3, IR1, ...)
    Add {
        #[arg(long)]
        team: PathBuf,

        #[arg(long)]
        players: PathBuf,

        #[arg(long)]
        player: String,

        #[arg(long)]
        slot: RosterSlot,
    },

    /// Move a rostered player to another slot
    Move {
        #[arg(long)]
        team: PathBuf,

        #[arg(long)]
        players: PathBuf,

        #[arg(long)]
        player: String,

        #[arg(long)]
        slot: RosterSlot,
    },

    /// Take a player off the roster
    Remove {
        #[arg(long)]
        team: PathBuf,

        #[arg(long)]
        player: String,
    },
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let rules = roster_cli::load_rules(cli.rules.as_deref())?;

    match cli.command {
        Commands::Init { team, name, league_name, scoring, league_size, force } => {
            let mut settings = TeamSettings::new(name);
            settings.league_name = league_name;
            settings.scoring_system = scoring;
            settings.league_size = league_size;
            settings.validate(&rules).context("Invalid team settings")?;

            let new_team = Team::new(settings);
            roster_cli::create_team_file(&team, &new_team, force)?;
            println!("Created team {} ({}) at {}", new_team.settings.name, new_team.id, team.display());
        }

        Commands::Validate { team } => {
            let loaded = roster_cli::load_team(&team)?;
            loaded.settings.validate(&rules).context("Invalid team settings")?;
            println!(
                "OK: {} - {} slots, {} rostered, version {}",
                loaded.settings.name,
                loaded.config().total_slots(),
                loaded.assignment.len(),
                loaded.version
            );
        }

        Commands::Slots { team, position } => {
            let loaded = roster_cli::load_team(&team)?;
            print_slots(&loaded, &rules, position, cli.json)?;
        }

        Commands::Lineup { team, players } => {
            let loaded = roster_cli::load_team(&team)?;
            let directory = match players {
                Some(path) => load_directory(&path)?,
                None => InMemoryPlayerDirectory::new(),
            };
            let team_id = loaded.id;
            let service = service_for(loaded, directory, &rules);
            let view = service.roster_view(team_id)?;
            print_view(&view, cli.json)?;
        }

        Commands::Add { team, players, player, slot } => {
            let directory = load_directory(&players)?;
            mutate(&team, directory, &rules, cli.json, |service, team_id, version| {
                service.add_player(team_id, &player, slot, Some(version))
            })?;
        }

        Commands::Move { team, players, player, slot } => {
            let directory = load_directory(&players)?;
            mutate(&team, directory, &rules, cli.json, |service, team_id, version| {
                service.move_player(team_id, &player, slot, Some(version))
            })?;
        }

        Commands::Remove { team, player } => {
            mutate(&team, InMemoryPlayerDirectory::new(), &rules, cli.json, |service, team_id, version| {
                service.remove_player(team_id, &player, Some(version))
            })?;
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
type Service = RosterService<InMemoryTeamStore, InMemoryPlayerDirectory>;

#[cfg(feature = "cli")]
fn service_for(team: Team, directory: InMemoryPlayerDirectory, rules: &RosterRules) -> Service {
    let store = InMemoryTeamStore::new(rules.clone());
    store.insert_team(team);
    RosterService::new(store, directory)
}

#[cfg(feature = "cli")]
fn load_directory(path: &Path) -> Result<InMemoryPlayerDirectory> {
    let (directory, stats) = roster_cli::load_players_csv(path)?;
    if stats.failed > 0 {
        eprintln!("Warning: skipped {} of {} player rows in {}", stats.failed, stats.total_rows, path.display());
    }
    Ok(directory)
}

/// Load the team, apply one change through the service, and write the
/// result back only if the file was not changed in the meantime.
#[cfg(feature = "cli")]
fn mutate<F>(path: &Path, directory: InMemoryPlayerDirectory, rules: &RosterRules, json: bool, change: F) -> Result<()>
where
    F: FnOnce(&Service, uuid::Uuid, u64) -> std::result::Result<RosterView, roster_core::ServiceError>,
{
    let team = roster_cli::load_team(path)?;
    let (team_id, read_version) = (team.id, team.version);
    let service = service_for(team, directory, rules);

    let view = change(&service, team_id, read_version)?;
    let updated = service.store().fetch_team(team_id)?;
    roster_cli::save_team(path, &updated, Some(read_version))?;

    print_view(&view, json)
}

#[cfg(feature = "cli")]
fn print_slots(team: &Team, rules: &RosterRules, position: Option<PlayerPosition>, json: bool) -> Result<()> {
    let config = team.config();
    let slots = match position {
        Some(position) => {
            let resolver = roster_core::EligibilityResolver::new(rules);
            SlotAllocator::available_slots_for(config, &team.assignment, &resolver, position)
        }
        None => SlotAllocator::all_slots(config),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&slots)?);
        return Ok(());
    }

    for slot in &slots {
        match team.assignment.get(slot) {
            Some(player_id) => println!("{:<14} {}", slot.to_string(), player_id),
            None => println!("{:<14} -", slot.to_string()),
        }
    }
    println!("\n{} slots, {} open", slots.len(), slots.iter().filter(|s| !team.assignment.is_occupied(s)).count());
    Ok(())
}

#[cfg(feature = "cli")]
fn print_view(view: &RosterView, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(view)?);
        return Ok(());
    }

    let name_of = |row: &LineupRow| -> String {
        let Some(player_id) = row.player_id.as_deref() else {
            return "-".to_string();
        };
        view.players
            .iter()
            .find(|p| p.player_id == player_id)
            .and_then(|p| p.info.as_ref())
            .map(|info| format!("{} ({}, {})", info.name, info.position, player_id))
            .unwrap_or_else(|| player_id.to_string())
    };

    println!("{} (version {})", view.team_name, view.version);
    for (title, rows) in [("Starters", &view.starters), ("Bench", &view.bench), ("IR", &view.ir)] {
        if rows.is_empty() {
            continue;
        }
        println!("\n{}:", title);
        for row in rows {
            println!("  {:<12} {}", row.label, name_of(row));
        }
    }
    println!("\nOpen slots: {}", view.available_slots.len());
    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("roster CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
