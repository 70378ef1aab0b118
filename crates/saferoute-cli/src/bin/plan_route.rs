//! Ask a running SafeRoute server for ranked routes between two places.
//!
//! Usage:
//!   cargo run -p saferoute-cli --bin plan_route -- --from "Connaught Place" --to "India Gate"

use clap::Parser;
use saferoute_cli::{format_routes, SafeRouteClient};

/// Plan and rank routes through a SafeRoute server
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// SafeRoute Server URL
    #[arg(long, default_value = "http://localhost:3000")]
    url: String,

    /// Origin: place name or "lat, lon"
    #[arg(long)]
    from: String,

    /// Destination: place name or "lat, lon"
    #[arg(long)]
    to: String,

    /// Map zoom level used for the density filter
    #[arg(long)]
    zoom: Option<u8>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    println!("Planning via {}...", args.url);
    let client = SafeRouteClient::new(&args.url)?;
    let plan = client.plan(&args.from, &args.to, args.zoom).await?;

    println!(
        "From: {} ({:.4}, {:.4})",
        plan.origin.matched.as_deref().unwrap_or(&plan.origin.query),
        plan.origin.coordinate.lat,
        plan.origin.coordinate.lon
    );
    println!(
        "To:   {} ({:.4}, {:.4})",
        plan.destination
            .matched
            .as_deref()
            .unwrap_or(&plan.destination.query),
        plan.destination.coordinate.lat,
        plan.destination.coordinate.lon
    );
    println!();
    print!("{}", format_routes(&plan.routes));
    Ok(())
}
