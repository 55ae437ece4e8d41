use anyhow::Result;
use std::path::Path;
use wayfinder::geojson::chargers_to_feature_collection;
use wayfinder::{find_nearby, GeoPoint};

use super::load_dataset;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    GeoJson,
}

pub fn run(
    chargers: &Path,
    lat: f64,
    lon: f64,
    radius_km: f64,
    format: OutputFormat,
) -> Result<()> {
    let dataset = load_dataset(chargers)?;
    let results = find_nearby(&dataset, GeoPoint::new(lat, lon), radius_km);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&results)?),
        OutputFormat::GeoJson => println!("{}", chargers_to_feature_collection(&results)),
        OutputFormat::Text => {
            if results.is_empty() {
                println!("No chargers within {} km of ({}, {})", radius_km, lat, lon);
                return Ok(());
            }

            println!("{:>10}  {:<40} {:<12}", "Distance", "Name", "Status");
            println!("{:-<64}", "");
            for charger in &results {
                println!(
                    "{:>7.2} km  {:<40} {:<12}",
                    charger.distance_km, charger.name, charger.status
                );
            }
            println!("{:-<64}", "");
            println!("Total: {} chargers within {} km", results.len(), radius_km);
        }
    }

    Ok(())
}
