pub mod batch;
pub mod chargers;
pub mod geocode;
pub mod info;
pub mod peaks;
pub mod route;

use anyhow::{Context, Result};
use std::path::Path;
use wayfinder::upstream::{HttpUpstream, UpstreamConfig};
use wayfinder::ChargerDataset;

/// Load the charger dataset, naming the path on failure.
pub fn load_dataset(path: &Path) -> Result<ChargerDataset> {
    ChargerDataset::load(path).with_context(|| {
        format!(
            "Failed to load charger dataset from {}. Use --chargers or set WAYFINDER_CHARGERS",
            path.display()
        )
    })
}

/// Build the upstream client from environment variables.
pub fn upstream() -> Result<HttpUpstream> {
    HttpUpstream::new(UpstreamConfig::from_env()).context("Failed to create HTTP client")
}
