//! Nearby charger search against a dataset file.
//!
//! Run with: cargo run --example nearby -- /path/to/ev_chargers.json 37.7749 -122.4194 25

use std::env;

use wayfinder::{find_nearby, ChargerDataset, GeoPoint, WayfinderError};

fn main() -> Result<(), WayfinderError> {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.len() < 3 {
        eprintln!("Usage: cargo run --example nearby -- <dataset> <lat> <lon> [radius_km]");
        std::process::exit(1);
    }

    let parse = |s: &str| {
        s.parse::<f64>().unwrap_or_else(|_| {
            eprintln!("Not a number: {}", s);
            std::process::exit(1);
        })
    };

    let dataset = ChargerDataset::load(&args[0])?;
    let query = GeoPoint::new(parse(&args[1]), parse(&args[2]));
    let radius_km = args.get(3).map(|s| parse(s)).unwrap_or(50.0);

    let stats = dataset.stats();
    println!(
        "Loaded {} sites ({} with coordinates)",
        stats.total_sites, stats.located_sites
    );

    let results = find_nearby(&dataset, query, radius_km);
    println!("{} chargers within {} km:", results.len(), radius_km);
    println!("{:-<60}", "");

    for charger in &results {
        println!(
            "{:>8.2} km  {:<35} {}",
            charger.distance_km, charger.name, charger.status
        );
    }

    Ok(())
}
