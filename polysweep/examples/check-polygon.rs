use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use malachite::Rational;
use ordered_float::NotNan;
use polysweep::{find_crossing, Point, Polygon};
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

/// Checks whether a polygon is simple.
#[derive(Parser)]
struct Args {
    /// A JSON file containing an array of points, like `[{"x": 0, "y": 0}, ...]`.
    input: PathBuf,

    /// Also run the check in exact rational arithmetic.
    #[arg(long)]
    exact: bool,

    /// Log every sweep-line event.
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let level = if args.verbose {
        Level::TRACE
    } else {
        Level::INFO
    };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .init();

    let input = std::fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let poly: Polygon<NotNan<f64>> =
        serde_json::from_str(&input).context("failed to parse the polygon")?;
    tracing::info!(vertices = poly.len(), "loaded polygon");

    let crossing = find_crossing(&poly);
    match crossing {
        Some((a, b)) => println!("not simple (edges {} and {})", a.0, b.0),
        None => println!("simple"),
    }

    if args.exact {
        let exact = Polygon::<Rational>::new(poly.vertices().iter().map(Point::to_exact))?;
        let exact_crossing = find_crossing(&exact);
        tracing::info!(?exact_crossing, "finished exact sweep");
        anyhow::ensure!(
            exact_crossing == crossing,
            "exact arithmetic disagrees: {exact_crossing:?} vs {crossing:?}"
        );
    }

    Ok(())
}
