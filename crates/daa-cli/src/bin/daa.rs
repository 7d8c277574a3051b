//! Detect-and-avoid alerting from the command line.
//!
//! Usage:
//!   cargo run -p daa-cli --bin daa -- demo --scenario head-on
//!   cargo run -p daa-cli --bin daa -- check --encounter encounter.json
//!   cargo run -p daa-cli --bin daa -- tcas --altitude-ft 8000

use anyhow::Result;
use clap::{Parser, Subcommand};
use daa_cli::scenarios::{DEFAULT_CENTER_LAT, DEFAULT_CENTER_LON};
use daa_cli::{evaluate, load_parameters, Encounter, Preset, ScenarioKind, TcasReport};
use serde::Serialize;
use std::fmt::Display;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about = "Detect-and-avoid alerting core")]
struct Args {
    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate an encounter file
    Check {
        /// Encounter JSON (ownship, traffic, optional most_urgent)
        #[arg(long)]
        encounter: PathBuf,

        /// Parameter file applied on top of the preset
        #[arg(long)]
        params: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = Preset::WcSc228)]
        preset: Preset,
    },
    /// Evaluate a built-in encounter
    Demo {
        #[arg(long, value_enum)]
        scenario: ScenarioKind,

        #[arg(long, value_enum, default_value_t = Preset::WcSc228)]
        preset: Preset,

        /// Encounter center latitude
        #[arg(long, default_value_t = DEFAULT_CENTER_LAT, allow_negative_numbers = true)]
        lat: f64,

        /// Encounter center longitude
        #[arg(long, default_value_t = DEFAULT_CENTER_LON, allow_negative_numbers = true)]
        lon: f64,
    },
    /// Write the parameter map of a preset
    Params {
        #[arg(long, value_enum, default_value_t = Preset::WcSc228)]
        preset: Preset,

        /// Output file; stdout when omitted
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print TCAS II thresholds for an altitude
    Tcas {
        #[arg(long)]
        altitude_ft: f64,

        /// Traffic advisory table instead of resolution advisory
        #[arg(long)]
        ta: bool,
    },
}

fn emit<T: Serialize + Display>(value: &T, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{value}");
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("daa=info".parse()?)
                .add_directive("daa_core=info".parse()?),
        )
        .init();

    let args = Args::parse();

    match args.command {
        Command::Check {
            encounter,
            params,
            preset,
        } => {
            let params = load_parameters(preset, params.as_deref())?;
            let encounter = Encounter::load(&encounter)?;
            tracing::debug!(traffic = encounter.traffic.len(), "encounter loaded");
            emit(&evaluate(&encounter, params)?, args.json)?;
        }
        Command::Demo {
            scenario,
            preset,
            lat,
            lon,
        } => {
            let scenario = scenario.build(lat, lon);
            tracing::info!(scenario = %scenario.name, ?preset, "running demo");
            emit(&evaluate(&scenario.encounter, preset.parameters())?, args.json)?;
        }
        Command::Params { preset, out } => {
            let data = preset.parameters().parameters();
            match out {
                Some(path) => {
                    data.save(&path)?;
                    tracing::info!(path = %path.display(), keys = data.len(), "parameters written");
                }
                None => println!("{}", data.to_json_string()?),
            }
        }
        Command::Tcas { altitude_ft, ta } => {
            emit(&TcasReport::new(altitude_ft, ta), args.json)?;
        }
    }

    Ok(())
}
