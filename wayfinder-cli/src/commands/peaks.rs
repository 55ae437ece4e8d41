use anyhow::{Context, Result};
use wayfinder::geojson::peaks_to_feature_collection;
use wayfinder::shape;
use wayfinder::upstream::{PeakQuery, Upstream};
use wayfinder::GeoPoint;

use super::chargers::OutputFormat;

pub async fn run(lat: f64, lon: f64, radius_m: u32, format: OutputFormat) -> Result<()> {
    let upstream = super::upstream()?;
    let query = PeakQuery::new(GeoPoint::new(lat, lon), radius_m);
    let peaks = upstream
        .peaks(&query)
        .await
        .context("Failed to search peaks")?;
    let peaks = shape::peaks(peaks);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&peaks)?),
        OutputFormat::GeoJson => println!("{}", peaks_to_feature_collection(&peaks)),
        OutputFormat::Text => {
            if peaks.is_empty() {
                println!("No peaks within {} m", radius_m);
            }
            for peak in &peaks {
                println!("{:<40} {:.5}, {:.5}", peak.name, peak.lat, peak.lon);
            }
        }
    }

    Ok(())
}
