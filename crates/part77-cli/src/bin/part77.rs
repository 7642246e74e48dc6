use anyhow::{Context, Result};
use clap::Parser;
use part77_cli::{answer_query, load_runways, Config, Query, Units};
use part77_core::SurfaceSet;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Find the FAR Part 77 imaginary surface over a position and the highest
/// permitted building elevation there.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, allow_negative_numbers = true)]
struct Args {
    /// Runway table (.csv)
    csvfile: PathBuf,

    /// Latitude in decimal degrees
    lat: f64,

    /// Longitude in decimal degrees
    lon: f64,

    /// Elevation of the proposed structure's top, in feet
    elevation: f64,

    /// Established airport elevation, in feet
    eae: f64,

    /// Print the build limit in meters
    #[arg(long)]
    meters: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// JSON file overriding the default surface rules
    #[arg(long)]
    rules: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout carries only the result
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("part77=info".parse()?))
        .init();

    let args = Args::parse();

    let mut config = Config::from_env();
    if args.meters {
        config.units = Units::Meters;
    }
    if let Some(rules) = args.rules {
        config.rules_file = Some(rules);
    }

    let rules = config.load_rules()?;
    let runways = load_runways(&args.csvfile, (args.lat, args.lon))
        .with_context(|| format!("Failed to load runways from {}", args.csvfile.display()))?;
    let surfaces = SurfaceSet::build(&runways, rules).context("Failed to build imaginary surfaces")?;

    let query = Query {
        lat: args.lat,
        lon: args.lon,
        elevation_ft: args.elevation,
        eae_ft: args.eae,
    };
    println!("{}", answer_query(&surfaces, query, config.units, args.json)?);

    Ok(())
}
