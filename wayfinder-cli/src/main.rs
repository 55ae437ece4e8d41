use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

use commands::chargers::OutputFormat;

/// Route planning CLI: EV chargers, geocoding, routing and peaks
#[derive(Parser)]
#[command(name = "wayfinder")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Charger dataset (.json, .json.gz or .zip)
    #[arg(
        long,
        env = "WAYFINDER_CHARGERS",
        default_value = "ev_chargers.json",
        global = true
    )]
    chargers: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find EV chargers around a coordinate
    Chargers {
        /// Latitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Longitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// Search radius in kilometers
        #[arg(short, long, default_value = "50")]
        radius_km: f64,

        /// Output result as JSON
        #[arg(short, long, conflicts_with = "geojson")]
        json: bool,

        /// Output result as a GeoJSON FeatureCollection
        #[arg(long)]
        geojson: bool,
    },

    /// Add nearest charger columns to every coordinate in a file
    Batch {
        /// Input file (CSV or GeoJSON)
        input: PathBuf,

        /// Output file (same format as input if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Column name for latitude (CSV only)
        #[arg(long, default_value = "lat")]
        lat_col: String,

        /// Column name for longitude (CSV only)
        #[arg(long, default_value = "lon")]
        lon_col: String,

        /// Radius in kilometers for the chargers_in_radius column
        #[arg(short, long, default_value = "50")]
        radius_km: f64,
    },

    /// Display statistics about the charger dataset
    Info,

    /// Resolve a free-text location to coordinates
    Geocode {
        /// Place name or address
        location: String,

        /// Output result as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Driving route between waypoints
    Route {
        /// Waypoint as lon,lat (repeat for each stop, at least two)
        #[arg(
            long = "coord",
            required = true,
            allow_hyphen_values = true,
            value_parser = commands::route::parse_coord
        )]
        coords: Vec<[f64; 2]>,

        /// Feature to avoid (e.g. highways, tollways, ferries)
        #[arg(long)]
        avoid: Vec<String>,

        /// Output result as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Up to three named peaks around a coordinate
    Peaks {
        /// Latitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Longitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// Search radius in meters
        #[arg(short, long, default_value = "25000")]
        radius_m: u32,

        /// Output result as JSON
        #[arg(short, long, conflicts_with = "geojson")]
        json: bool,

        /// Output result as a GeoJSON FeatureCollection
        #[arg(long)]
        geojson: bool,
    },
}

fn output_format(json: bool, geojson: bool) -> OutputFormat {
    match (json, geojson) {
        (true, _) => OutputFormat::Json,
        (_, true) => OutputFormat::GeoJson,
        _ => OutputFormat::Text,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Chargers {
            lat,
            lon,
            radius_km,
            json,
            geojson,
        } => commands::chargers::run(
            &cli.chargers,
            lat,
            lon,
            radius_km,
            output_format(json, geojson),
        ),
        Commands::Batch {
            input,
            output,
            lat_col,
            lon_col,
            radius_km,
        } => commands::batch::run(&cli.chargers, input, output, lat_col, lon_col, radius_km),
        Commands::Info => commands::info::run(&cli.chargers),
        Commands::Geocode { location, json } => commands::geocode::run(&location, json).await,
        Commands::Route {
            coords,
            avoid,
            json,
        } => commands::route::run(coords, avoid, json).await,
        Commands::Peaks {
            lat,
            lon,
            radius_m,
            json,
            geojson,
        } => commands::peaks::run(lat, lon, radius_m, output_format(json, geojson)).await,
    }
}
