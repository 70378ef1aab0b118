//! Write a seeded synthetic catalog as JSON.
//!
//! Usage:
//!   cargo run -p saferoute-cli --bin generate_catalog -- --seed 42 --count 400 --out filler.json

use anyhow::{Context, Result};
use clap::Parser;
use saferoute_core::{dataset, FillerBounds, FillerGenerator};
use std::path::PathBuf;

/// Generate filler safety markers
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// RNG seed; the same seed always yields the same points
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of points
    #[arg(long, default_value_t = 400)]
    count: usize,

    #[arg(long, default_value_t = 8.0)]
    min_lat: f64,
    #[arg(long, default_value_t = 33.0)]
    max_lat: f64,
    #[arg(long, default_value_t = 68.0)]
    min_lon: f64,
    #[arg(long, default_value_t = 93.0)]
    max_lon: f64,

    /// Prepend the bundled curated markers
    #[arg(long)]
    with_curated: bool,

    /// Output file (default: stdout)
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    if args.min_lat > args.max_lat || args.min_lon > args.max_lon {
        anyhow::bail!("bounds are inverted");
    }

    let generator = FillerGenerator::new(args.seed, args.count).with_bounds(FillerBounds {
        min_lat: args.min_lat,
        max_lat: args.max_lat,
        min_lon: args.min_lon,
        max_lon: args.max_lon,
    });

    let mut records = if args.with_curated {
        dataset::curated_records()?
    } else {
        Vec::new()
    };
    records.extend(generator.generate_records());
    let json = serde_json::to_string_pretty(&records)?;

    match &args.out {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Wrote {} records to {}", records.len(), path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}
