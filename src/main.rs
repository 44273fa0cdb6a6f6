use anyhow::{bail, Result};
use clap::Parser;
use std::sync::Arc;
use suburban_events::{config, render, Aggregator, FetchConfig, Fetcher};
use tracing::{info, warn};

/// Aggregate nearby local events into a day-grouped HTML digest on stdout.
#[derive(Parser, Debug)]
#[command(name = "suburban-events", version, about)]
struct Args {
    /// ZIP code at the center of the coverage area
    #[arg(long, default_value = "80111")]
    zip: String,

    /// Geofence radius in miles
    #[arg(long, default_value_t = 10.0)]
    radius: f64,

    /// Look-ahead window in days, counted from today
    #[arg(long, default_value_t = 14)]
    days: i64,

    /// Comma-separated interest tags; empty keeps every category
    #[arg(long, value_delimiter = ',', default_value = "")]
    interests: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let interests: Vec<String> = args
        .interests
        .into_iter()
        .map(|i| i.trim().to_string())
        .filter(|i| !i.is_empty())
        .collect();

    let Some(center) = config::zip_centroid(&args.zip) else {
        bail!("no centroid known for ZIP {}", args.zip);
    };

    info!(
        "Aggregating events near {} ({} mi, {} days)",
        args.zip, args.radius, args.days
    );

    let fetcher = Arc::new(Fetcher::new(FetchConfig::default()));
    let aggregator = Aggregator::new(config::default_sources(), fetcher);
    let outcome = aggregator
        .aggregate(center, args.radius, args.days, &interests)
        .await?;

    for status in &outcome.sources {
        match &status.error {
            Some(error) => warn!("{}: failed ({})", status.name, error),
            None => info!("{}: {} events", status.name, status.events),
        }
    }
    info!("{} events after filtering", outcome.events.len());

    println!("{}", render(&outcome.events, &args.zip));
    Ok(())
}
