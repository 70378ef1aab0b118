//! Score route geometries from a file against a point-of-interest catalog.
//!
//! The routes file is a JSON array of `{ geometry: [[lon, lat], ...],
//! distance_km, duration_min }` objects, in the order the routing provider
//! returned them.
//!
//! Usage:
//!   cargo run -p saferoute-cli --bin score_routes -- --routes demos/delhi_routes.json

use anyhow::{Context, Result};
use clap::Parser;
use saferoute_cli::format_routes;
use saferoute_core::models::{Route, Viewport};
use saferoute_core::{dataset, Catalog, EngineRules, SafetyEngine};
use std::path::{Path, PathBuf};

/// Rank candidate routes by safety score
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Catalog JSON (defaults to the bundled curated dataset)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Routes JSON
    #[arg(long)]
    routes: PathBuf,

    /// Engine rules JSON overriding the defaults
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Map zoom level; filler points need 7 or more
    #[arg(long, default_value_t = 22)]
    zoom: u32,

    /// Comma separated active categories (default: all)
    #[arg(long)]
    categories: Option<String>,

    /// Print the comparison as JSON instead of a table
    #[arg(long)]
    json: bool,
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let (catalog, rejected) = match &args.catalog {
        Some(path) => Catalog::from_json_str(&read(path)?)?,
        None => dataset::load_bundled(None)?,
    };
    for err in &rejected {
        eprintln!("skipped catalog entry: {}", err);
    }

    let rules: EngineRules = match &args.rules {
        Some(path) => serde_json::from_str(&read(path)?).context("Failed to parse rules")?,
        None => EngineRules::default(),
    };
    let routes: Vec<Route> =
        serde_json::from_str(&read(&args.routes)?).context("Failed to parse routes")?;
    let viewport = Viewport::parse(args.zoom, args.categories.as_deref())?;

    let engine = SafetyEngine::new(rules);
    let comparison = engine.evaluate(&catalog, &viewport, routes)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&comparison)?);
    } else {
        println!(
            "Scored {} route(s) against {} catalog points",
            comparison.routes.len(),
            catalog.len()
        );
        println!();
        print!("{}", format_routes(&comparison.routes));
    }
    Ok(())
}
