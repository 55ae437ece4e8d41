use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use wayfinder::{find_nearby, ChargerDataset, GeoPoint};

use super::load_dataset;

/// Charger columns appended to every input row.
const ENRICHED_COLUMNS: [&str; 3] = ["nearest_charger", "nearest_distance_km", "chargers_in_radius"];

/// Nearest charger and radius count for one point.
#[derive(Debug, Clone, PartialEq)]
struct Enrichment {
    nearest_name: Option<String>,
    nearest_distance_km: Option<f64>,
    in_radius: usize,
}

impl Enrichment {
    fn compute(dataset: &ChargerDataset, point: GeoPoint, radius_km: f64) -> Self {
        let nearby = find_nearby(dataset, point, radius_km);
        let nearest = wayfinder::nearest(dataset, point);
        Self {
            nearest_name: nearest.as_ref().map(|r| r.name.clone()),
            nearest_distance_km: nearest.map(|r| r.distance_km),
            in_radius: nearby.len(),
        }
    }
}

pub fn run(
    chargers: &Path,
    input: PathBuf,
    output: Option<PathBuf>,
    lat_col: String,
    lon_col: String,
    radius_km: f64,
) -> Result<()> {
    let dataset = load_dataset(chargers)?;

    // Detect file format
    let extension = input
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "csv" => process_csv(&dataset, &input, output, &lat_col, &lon_col, radius_km),
        "geojson" | "json" => process_geojson(&dataset, &input, output, radius_km),
        _ => bail!(
            "Unsupported file format: {}. Use .csv or .geojson",
            extension
        ),
    }
}

fn progress_bar(len: u64) -> Result<ProgressBar> {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
            )?
            .progress_chars("#>-"),
    );
    Ok(pb)
}

fn default_output(input: &Path, extension: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    input.with_file_name(format!("{}_chargers.{}", stem, extension))
}

fn process_csv(
    dataset: &ChargerDataset,
    input: &Path,
    output: Option<PathBuf>,
    lat_col: &str,
    lon_col: &str,
    radius_km: f64,
) -> Result<()> {
    let file = File::open(input).context("Failed to open input file")?;
    let mut reader = csv::Reader::from_reader(BufReader::new(file));

    // Find column indices
    let headers = reader.headers()?.clone();
    let lat_idx = headers
        .iter()
        .position(|h| h == lat_col)
        .with_context(|| format!("Column '{}' not found in CSV", lat_col))?;
    let lon_idx = headers
        .iter()
        .position(|h| h == lon_col)
        .with_context(|| format!("Column '{}' not found in CSV", lon_col))?;

    let records: Vec<_> = reader.records().collect::<Result<_, _>>()?;
    let pb = progress_bar(records.len() as u64)?;

    let output_path = output.unwrap_or_else(|| default_output(input, "csv"));
    let output_file = File::create(&output_path).context("Failed to create output file")?;
    let mut writer = csv::Writer::from_writer(BufWriter::new(output_file));

    let mut new_headers: Vec<&str> = headers.iter().collect();
    new_headers.extend(ENRICHED_COLUMNS);
    writer.write_record(&new_headers)?;

    for (row, record) in records.iter().enumerate() {
        let lat: f64 = record
            .get(lat_idx)
            .context("Missing latitude")?
            .trim()
            .parse()
            .with_context(|| format!("Invalid latitude on row {}", row + 1))?;
        let lon: f64 = record
            .get(lon_idx)
            .context("Missing longitude")?
            .trim()
            .parse()
            .with_context(|| format!("Invalid longitude on row {}", row + 1))?;

        let enrichment = Enrichment::compute(dataset, GeoPoint::new(lat, lon), radius_km);
        let distance = enrichment
            .nearest_distance_km
            .map(|d| format!("{:.2}", d))
            .unwrap_or_default();
        let count = enrichment.in_radius.to_string();

        let mut new_record: Vec<&str> = record.iter().collect();
        new_record.push(enrichment.nearest_name.as_deref().unwrap_or(""));
        new_record.push(&distance);
        new_record.push(&count);
        writer.write_record(&new_record)?;

        pb.inc(1);
    }

    pb.finish_with_message("done");
    writer.flush()?;

    println!("Output written to: {}", output_path.display());
    Ok(())
}

fn process_geojson(
    dataset: &ChargerDataset,
    input: &Path,
    output: Option<PathBuf>,
    radius_km: f64,
) -> Result<()> {
    let file = File::open(input).context("Failed to open input file")?;
    let reader = BufReader::new(file);

    let geojson: geojson::GeoJson =
        serde_json::from_reader(reader).context("Failed to parse GeoJSON")?;

    let result = match geojson {
        geojson::GeoJson::Feature(mut feature) => {
            enrich_feature(dataset, &mut feature, radius_km);
            geojson::GeoJson::Feature(feature)
        }
        geojson::GeoJson::FeatureCollection(mut fc) => {
            let pb = progress_bar(fc.features.len() as u64)?;
            for feature in &mut fc.features {
                enrich_feature(dataset, feature, radius_km);
                pb.inc(1);
            }
            pb.finish_with_message("done");
            geojson::GeoJson::FeatureCollection(fc)
        }
        geojson::GeoJson::Geometry(_) => {
            bail!("Bare geometries carry no properties. Wrap points in a Feature or FeatureCollection")
        }
    };

    let output_path = output.unwrap_or_else(|| default_output(input, "geojson"));
    let output_file = File::create(&output_path).context("Failed to create output file")?;
    let mut writer = BufWriter::new(output_file);
    serde_json::to_writer_pretty(&mut writer, &result)?;
    writer.flush()?;

    println!("Output written to: {}", output_path.display());
    Ok(())
}

/// Attach charger properties to a Point feature. Other geometries are left untouched.
fn enrich_feature(dataset: &ChargerDataset, feature: &mut geojson::Feature, radius_km: f64) {
    let Some(point) = feature.geometry.as_ref().and_then(point_of) else {
        return;
    };

    let enrichment = Enrichment::compute(dataset, point, radius_km);
    feature.set_property(ENRICHED_COLUMNS[0], enrichment.nearest_name);
    feature.set_property(ENRICHED_COLUMNS[1], enrichment.nearest_distance_km);
    feature.set_property(ENRICHED_COLUMNS[2], enrichment.in_radius);
}

fn point_of(geometry: &geojson::Geometry) -> Option<GeoPoint> {
    match &geometry.value {
        geojson::Value::Point(pos) if pos.len() >= 2 => Some(GeoPoint::new(pos[1], pos[0])),
        _ => None,
    }
}
