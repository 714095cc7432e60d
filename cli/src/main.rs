//! Congestion tax CLI
//!
//! Computes the daily congestion tax for one vehicle from a list of
//! crossing timestamps.
//!
//! ```sh
//! # Default config (~/.config/congestion-tax/config.toml)
//! congestion-tax --vehicle car 2013-02-07T06:15 2013-02-07T08:15
//!
//! # Full breakdown as JSON
//! congestion-tax --vehicle car --json "2013-02-07 06:15" "2013-02-07 06:50"
//!
//! # Validate config without computing anything
//! congestion-tax --config /etc/congestion-tax/config.toml --check
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDateTime;
use clap::Parser;
use tracing::{error, info};

use congestion_tax::config::AppConfig;
use congestion_tax::telemetry::init_tracing;
use congestion_tax::{TaxError, Vehicle, VehicleCategory};

const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"];

/// Daily congestion tax for a vehicle's toll crossings.
#[derive(Parser, Debug)]
#[command(name = "congestion-tax", version, about)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "CONGESTION_TAX_CONFIG")]
    config: Option<PathBuf>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit.
    #[arg(long)]
    check: bool,

    /// Vehicle category (car, motorcycle, tractor, emergency, diplomat,
    /// foreign, military, bus).
    #[arg(short, long, required_unless_present = "check")]
    vehicle: Option<String>,

    /// Registration plate, only used in logs and output.
    #[arg(short, long, default_value = "UNKNOWN")]
    plate: String,

    /// Print the full breakdown as JSON.
    #[arg(long)]
    json: bool,

    /// Crossing timestamps, `YYYY-MM-DDTHH:MM` or `YYYY-MM-DD HH:MM`.
    timestamps: Vec<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(congestion_tax::default_config_path);

    let (mut config, load_error) = match AppConfig::load(&config_path) {
        Ok(cfg) => (cfg, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    init_tracing(&config.logging);

    match load_error {
        None => info!("Configuration loaded from {}", config_path.display()),
        Some(e) => {
            error!("Failed to load config from {}: {}", config_path.display(), e);
            error!("Using default configuration.");
        }
    }

    match run(&cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Congestion tax calculation failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let calculator = config.build_calculator()?;

    if cli.check {
        println!("Configuration is valid");
        println!("   Daily cap   : {}", calculator.rules().daily_cap);
        println!(
            "   Window      : {} min",
            calculator.rules().window.num_minutes()
        );
        println!("   Fee bands   :");
        for band in calculator.schedule().bands() {
            println!("     {band}");
        }
        let mut exempt: Vec<String> = calculator
            .exemptions()
            .exempt_vehicles()
            .map(|c| c.to_string())
            .collect();
        exempt.sort();
        println!("   Exempt vehicles: {}", exempt.join(", "));
        let years: Vec<String> = calculator
            .exemptions()
            .years()
            .map(|y| y.to_string())
            .collect();
        println!("   Holiday years: {}", years.join(", "));
        println!("   Log level   : {}", config.logging.level);
        return Ok(());
    }

    let category: VehicleCategory = cli
        .vehicle
        .as_deref()
        .ok_or_else(|| TaxError::invalid_input("--vehicle is required"))?
        .parse()?;
    let vehicle = Vehicle::new(cli.plate.clone(), category);

    let crossings = cli
        .timestamps
        .iter()
        .map(|t| parse_timestamp(t))
        .collect::<Result<Vec<_>, _>>()?;

    let breakdown = calculator.daily_tax_breakdown(&vehicle, &crossings)?;
    info!(plate = %vehicle.registration, total = breakdown.total, "Tax computed");

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&breakdown)?);
    } else {
        println!("{}", breakdown.total);
    }

    Ok(())
}

fn parse_timestamp(value: &str) -> Result<NaiveDateTime, TaxError> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value.trim(), fmt).ok())
        .ok_or_else(|| TaxError::invalid_input(format!("invalid timestamp {value:?}")))
}
