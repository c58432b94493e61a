//! Command-line entry point for one density lookup.
//!
//! Thin glue around [`wamdens::DensityDb`]: parse the invocation, run one
//! query, write the density to stdout. Diagnostics go to the log channel on
//! stderr, never to stdout; a caller that sees no output must treat the
//! invocation as failed.

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDateTime;
use clap::Parser;

use wamdens::{Config, DensityDb, QueryPoint, Result, WamdensError};

/// Atmospheric density lookup over time-gridded WAM snapshots.
#[derive(Parser)]
#[command(name = "wamdens")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Resolve atmospheric mass-density at one 4-D point", long_about = None)]
struct Cli {
    /// Offset from the scenario start, in minutes
    epoch_minutes: f64,

    /// Altitude in km
    height_km: f64,

    /// Geodetic latitude in degrees, -90 to 90
    latitude_deg: f64,

    /// Longitude in degrees, 0 to 360 (exclusive)
    longitude_deg: f64,

    /// Scenario start time, ISO-8601 (e.g. 2023-05-12T16:00:00.000)
    start_time: String,

    /// Scenario stop time, ISO-8601; accepted for callers that validate
    /// scenario bounds, unused by the lookup itself
    stop_time: String,

    /// Directory holding one snapshot file per time window
    #[arg(long, value_name = "DIR", env = "WAMDENS_DATA_DIR", conflicts_with = "archive_file")]
    data_dir: Option<PathBuf>,

    /// Single multi-day archive file with an in-file block index
    #[arg(long, value_name = "FILE", env = "WAMDENS_ARCHIVE_FILE")]
    archive_file: Option<PathBuf>,

    /// JSON configuration file (granularity, search cap, extrapolation)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::init();

    match run(Cli::parse()) {
        Ok(density) => {
            println!("{density:e}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<f64> {
    let start_time = parse_scenario_time("start_time", &cli.start_time)?;
    let stop_time = parse_scenario_time("stop_time", &cli.stop_time)?;
    log::debug!("scenario runs {} .. {}", start_time, stop_time);

    let config = match &cli.config {
        Some(path) => Config::from_json(&std::fs::read_to_string(path)?)
            .map_err(|e| WamdensError::Config(format!("{}: {}", path.display(), e)))?,
        None => Config::default(),
    };

    let mut builder = DensityDb::builder().config(config);
    if let Some(dir) = cli.data_dir {
        builder = builder.data_dir(dir);
    }
    if let Some(path) = cli.archive_file {
        builder = builder.archive_file(path);
    }
    let db = builder.build()?;

    let query = QueryPoint::new(
        cli.epoch_minutes,
        cli.height_km,
        cli.latitude_deg,
        cli.longitude_deg,
    );
    db.density_at(start_time, &query)
}

/// Parse an ISO-8601 scenario time, with or without fractional seconds.
fn parse_scenario_time(name: &str, value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").map_err(|e| {
        WamdensError::InvalidInput(format!("{} {:?} is not ISO-8601: {}", name, value, e))
    })
}
