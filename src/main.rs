mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs::OpenOptions;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use aerolocate::config::AppConfig;
use aerolocate::log_format::TargetFirstFormat;
use aerolocate::radius::Radius;

#[derive(Parser)]
#[command(name = "aerolocate")]
#[command(about = "Find airports near you and their live departures", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to a TOML config file (default: $AEROLOCATE_CONFIG or ./aerolocate.toml)
    #[arg(long, global = true, env = "AEROLOCATE_CONFIG")]
    config: Option<PathBuf>,

    /// aviationstack access key; overrides AVIATIONSTACK_API_KEY and the config file
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Where `browse` writes its logs while the terminal is in use
    #[arg(long, global = true, default_value = "aerolocate.log")]
    log_file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show where the IP lookup places you
    Locate {
        /// Look up this IP address instead of your own
        #[arg(long)]
        ip: Option<String>,

        /// Use a fixed demo location instead of the IP lookup service
        #[arg(long)]
        offline: bool,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// List airports near your location or matching a city
    Airports {
        /// Look up this IP address instead of your own
        #[arg(long, conflicts_with = "city")]
        ip: Option<String>,

        /// Search airports by city instead of geolocating
        #[arg(long)]
        city: Option<String>,

        /// Filter radius in km (50, 70, 100, 120, 250, 500 or 1000)
        #[arg(long)]
        radius: Option<Radius>,

        /// Select this airport (IATA code) and show its departures
        #[arg(long)]
        select: Option<String>,

        /// Use a fixed demo location instead of the IP lookup service
        #[arg(long, conflicts_with = "city")]
        offline: bool,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show live departures from an airport
    Departures {
        /// IATA code of the departure airport, e.g. LHR
        iata: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Browse nearby airports interactively
    Browse {
        /// Look up this IP address instead of your own
        #[arg(long, conflicts_with = "city")]
        ip: Option<String>,

        /// Start with a city search instead of geolocating
        #[arg(long)]
        city: Option<String>,

        /// Initial filter radius in km
        #[arg(long)]
        radius: Option<Radius>,

        /// Use a fixed demo location instead of the IP lookup service
        #[arg(long, conflicts_with = "city")]
        offline: bool,
    },
}

/// Logs go to stderr, or to a file while the terminal UI owns the screen
fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("aerolocate=info"));
    let registry = tracing_subscriber::registry().with(filter);

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {:?}", path))?;
            registry
                .with(
                    fmt::layer()
                        .with_ansi(false)
                        .event_format(TargetFirstFormat)
                        .with_writer(Mutex::new(file)),
                )
                .try_init()
                .context("Failed to initialise logging")?;
        }
        None => {
            let ansi = std::io::stderr().is_terminal();
            registry
                .with(
                    fmt::layer()
                        .with_ansi(ansi)
                        .event_format(TargetFirstFormat)
                        .with_writer(std::io::stderr),
                )
                .try_init()
                .context("Failed to initialise logging")?;
        }
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::load(cli.config.as_deref())?.with_api_key(cli.api_key);

    match cli.command {
        Commands::Locate { ip, offline, json } => {
            commands::handle_locate(&config, ip, offline, json).await
        }
        Commands::Airports {
            ip,
            city,
            radius,
            select,
            offline,
            json,
        } => {
            let args = commands::AirportsArgs {
                ip,
                city,
                radius,
                select,
                offline,
                json,
            };
            commands::handle_airports(&config, args).await
        }
        Commands::Departures { iata, json } => {
            commands::handle_departures(&config, &iata, json).await
        }
        Commands::Browse {
            ip,
            city,
            radius,
            offline,
        } => commands::handle_browse(&config, ip, city, radius, offline).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_file = matches!(cli.command, Commands::Browse { .. }).then(|| cli.log_file.clone());
    if let Err(e) = init_tracing(log_file.as_deref()) {
        eprintln!("{:#}", e);
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
