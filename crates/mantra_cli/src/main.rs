//! Mantra CLI
//!
//! Roster upkeep and formation checks from the terminal.

#[cfg(feature = "cli")]
use anyhow::{Context, Result};
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use mantra_core::{MantraConfig, Player, Settings};
#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "mantra", version)]
#[command(about = "Check which Mantra formations can field your players", long_about = None)]
struct Cli {
    /// Config file (defaults to $MANTRA_CONFIG_PATH)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Formation table YAML, overrides the config
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// List the formations and the roles each slot accepts
    Formations,

    /// Show or edit a roster file
    Roster {
        /// Roster JSON (CSV is read-only)
        #[arg(long)]
        file: PathBuf,

        #[command(subcommand)]
        action: RosterAction,
    },

    /// Convert a spreadsheet export into a roster JSON
    Import {
        /// Input CSV file path
        #[arg(long)]
        csv: PathBuf,

        /// Output roster JSON path
        #[arg(long)]
        out: PathBuf,

        /// Field separator (sniffed when omitted)
        #[arg(long)]
        delimiter: Option<char>,
    },

    /// Check a selection of roster players against every formation
    Check {
        /// Roster file (.json or .csv)
        #[arg(long)]
        roster: PathBuf,

        /// Comma-separated player names, 1 to 11
        #[arg(long)]
        players: String,

        /// Print the report as JSON
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Print the JSON schema of check requests
    Schema,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum RosterAction {
    /// Print every player, alphabetically
    List,

    /// Add a player
    Add {
        name: String,

        /// Role codes, e.g. "Dc;B"
        roles: String,
    },

    /// Remove a player by name
    Remove { name: String },
}

#[cfg(feature = "cli")]
fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(feature = "cli")]
fn resolve_settings(config: Option<&Path>, catalog: Option<&Path>) -> Result<Settings> {
    let mut config = MantraConfig::load_or_env(config).context("Failed to load config")?;
    if let Some(catalog) = catalog {
        // relative to the working directory, not to the config file
        let cwd = std::env::current_dir().context("Failed to read working directory")?;
        config.catalog = Some(cwd.join(catalog));
    }
    config.resolve().context("Failed to resolve settings")
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Formations => {
            let settings = resolve_settings(cli.config.as_deref(), cli.catalog.as_deref())?;
            print!("{}", mantra_cli::render_catalog(&settings.catalog));
        }

        Commands::Roster { file, action } => run_roster(&file, action)?,

        Commands::Import {
            csv,
            out,
            delimiter,
        } => {
            let delimiter = delimiter
                .map(|c| u8::try_from(c).context("Delimiter must be a single ASCII character"))
                .transpose()?;
            let (roster, stats) = mantra_cli::parse_roster_csv(&csv, delimiter)?;
            if roster.is_empty() {
                anyhow::bail!("No valid players found in {}", csv.display());
            }
            mantra_cli::save_roster(&roster, &out)?;

            println!("Imported {} players into {}", stats.imported, out.display());
            if stats.failed > 0 {
                println!("   Skipped {} invalid rows", stats.failed);
            }
            if stats.duplicates > 0 {
                println!("   Skipped {} duplicate names", stats.duplicates);
            }
        }

        Commands::Check {
            roster,
            players,
            json,
        } => {
            let settings = resolve_settings(cli.config.as_deref(), cli.catalog.as_deref())?;
            let roster = mantra_cli::load_roster(&roster)?;
            let names = mantra_cli::split_names(&players);
            let report = mantra_core::check_roster(&roster, &names, &settings)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", mantra_cli::render_report(&report));
            }
        }

        Commands::Schema => {
            println!("{}", mantra_core::check_request_schema()?);
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn run_roster(file: &Path, action: RosterAction) -> Result<()> {
    match action {
        RosterAction::List => {
            let roster = mantra_cli::load_roster(file)?;
            print!("{}", mantra_cli::render_roster(&roster));
        }

        RosterAction::Add { name, roles } => {
            let mut roster = mantra_cli::load_roster_or_default(file)?;
            let player = Player::parse(&name, &roles)?;
            let label = player.to_string();
            roster.add(player)?;
            mantra_cli::save_roster(&roster, file)?;
            println!("Added {label}");
        }

        RosterAction::Remove { name } => {
            let mut roster = mantra_cli::load_roster(file)?;
            let removed = roster.remove(&name)?;
            mantra_cli::save_roster(&roster, file)?;
            println!("Removed {removed}");
        }
    }
    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("mantra CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
