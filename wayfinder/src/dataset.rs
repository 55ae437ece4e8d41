//! Static EV charger dataset.
//!
//! The dataset is a JSON array of charging sites, read once at startup and
//! kept read-only for the lifetime of the process:
//!
//! ```json
//! [
//!   {"name": "Supercharger", "status": "available", "gps": {"latitude": 37.0, "longitude": -122.0}},
//!   {"gps": {"latitude": 37.1}}
//! ]
//! ```
//!
//! Every field is optional. Sites without a complete `gps` pair stay in the
//! dataset (they count towards [`DatasetStats::total_sites`]) but are never
//! returned by proximity search.
//!
//! The file may be stored compressed; see [`Compression`].

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use serde::{Deserialize, Serialize};
use zip::ZipArchive;

use crate::error::{Result, WayfinderError};
use crate::geo::GeoPoint;

/// Name used for sites that carry no `name` field.
pub const UNNAMED_CHARGER: &str = "Unnamed Charger";

/// Status used for sites that carry no `status` field.
pub const UNKNOWN_STATUS: &str = "unknown";

/// Compression format of a dataset file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    /// Plain JSON.
    #[default]
    None,
    /// Gzip-compressed JSON (`.json.gz`).
    Gzip,
    /// ZIP archive containing a `.json` entry.
    Zip,
}

impl Compression {
    /// Detect compression format from a file path.
    ///
    /// # Examples
    ///
    /// ```
    /// use wayfinder::dataset::Compression;
    ///
    /// assert_eq!(Compression::from_path("ev_chargers.json.gz"), Compression::Gzip);
    /// assert_eq!(Compression::from_path("ev_chargers.zip"), Compression::Zip);
    /// assert_eq!(Compression::from_path("ev_chargers.json"), Compression::None);
    /// ```
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let lower = path.as_ref().to_string_lossy().to_lowercase();
        if lower.ends_with(".gz") {
            Compression::Gzip
        } else if lower.ends_with(".zip") {
            Compression::Zip
        } else {
            Compression::None
        }
    }
}

/// A single charging site.
#[derive(Debug, Clone, PartialEq)]
pub struct ChargerSite {
    /// Display name, [`UNNAMED_CHARGER`] if the record had none.
    pub name: String,
    /// Recorded position, `None` if either coordinate was missing.
    pub position: Option<GeoPoint>,
    /// Availability label, [`UNKNOWN_STATUS`] if the record had none.
    pub status: String,
}

impl ChargerSite {
    /// Create a site with a known position.
    pub fn new(name: impl Into<String>, position: GeoPoint, status: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: Some(position),
            status: status.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawGps {
    latitude: Option<f64>,
    longitude: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawSite {
    name: Option<String>,
    status: Option<String>,
    gps: Option<RawGps>,
}

impl From<RawSite> for ChargerSite {
    fn from(raw: RawSite) -> Self {
        let position = raw.gps.and_then(|gps| match (gps.latitude, gps.longitude) {
            (Some(lat), Some(lon)) => Some(GeoPoint::new(lat, lon)),
            _ => None,
        });

        Self {
            name: raw.name.unwrap_or_else(|| UNNAMED_CHARGER.to_string()),
            position,
            status: raw.status.unwrap_or_else(|| UNKNOWN_STATUS.to_string()),
        }
    }
}

/// Summary of what a dataset contains.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DatasetStats {
    /// Number of records loaded.
    pub total_sites: usize,
    /// Number of records with both coordinates.
    pub located_sites: usize,
    /// Record count per status label.
    pub by_status: BTreeMap<String, usize>,
}

/// Read-only collection of charging sites.
///
/// # Example
///
/// ```ignore
/// use wayfinder::ChargerDataset;
///
/// let dataset = ChargerDataset::load("ev_chargers.json")?;
/// println!("{} sites loaded", dataset.len());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ChargerDataset {
    sites: Vec<ChargerSite>,
}

impl ChargerDataset {
    /// Build a dataset from already-parsed sites.
    pub fn from_sites(sites: Vec<ChargerSite>) -> Self {
        Self { sites }
    }

    /// Parse a dataset from uncompressed JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`WayfinderError::InvalidDataset`] if the bytes are not a JSON
    /// array of site objects.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        let raw: Vec<RawSite> =
            serde_json::from_slice(bytes).map_err(|e| WayfinderError::InvalidDataset {
                reason: e.to_string(),
            })?;

        Ok(Self {
            sites: raw.into_iter().map(ChargerSite::from).collect(),
        })
    }

    /// Load a dataset from disk, decompressing according to the file extension.
    ///
    /// # Errors
    ///
    /// - [`WayfinderError::DatasetNotFound`] if `path` does not exist
    /// - [`WayfinderError::Io`] if the file cannot be read
    /// - [`WayfinderError::InvalidDataset`] if decompression or parsing fails
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(WayfinderError::DatasetNotFound {
                path: path.to_path_buf(),
            });
        }

        let compression = Compression::from_path(path);
        let file = File::open(path)?;

        let bytes = match compression {
            Compression::None => {
                let mut data = Vec::new();
                BufReader::new(file).read_to_end(&mut data)?;
                data
            }
            Compression::Gzip => {
                let mut decoder = GzDecoder::new(BufReader::new(file));
                let mut data = Vec::new();
                decoder
                    .read_to_end(&mut data)
                    .map_err(|e| WayfinderError::InvalidDataset {
                        reason: format!("Failed to decompress gzip: {}", e),
                    })?;
                data
            }
            Compression::Zip => Self::extract_json_from_zip(file)?,
        };

        let dataset = Self::from_json_slice(&bytes)?;
        tracing::debug!(
            path = %path.display(),
            compression = ?compression,
            sites = dataset.len(),
            "Charger dataset loaded"
        );
        Ok(dataset)
    }

    /// Read the first `.json` entry of a ZIP archive.
    fn extract_json_from_zip(file: File) -> Result<Vec<u8>> {
        let mut archive =
            ZipArchive::new(BufReader::new(file)).map_err(|e| WayfinderError::InvalidDataset {
                reason: format!("Failed to read ZIP archive: {}", e),
            })?;

        for i in 0..archive.len() {
            let mut entry = archive
                .by_index(i)
                .map_err(|e| WayfinderError::InvalidDataset {
                    reason: format!("Failed to read ZIP entry: {}", e),
                })?;

            if entry.name().to_lowercase().ends_with(".json") {
                let mut data = Vec::new();
                entry
                    .read_to_end(&mut data)
                    .map_err(|e| WayfinderError::InvalidDataset {
                        reason: format!("Failed to decompress ZIP entry {}: {}", entry.name(), e),
                    })?;
                return Ok(data);
            }
        }

        Err(WayfinderError::InvalidDataset {
            reason: "No .json file found in ZIP archive".to_string(),
        })
    }

    /// Iterate over all sites, including those without coordinates.
    pub fn iter(&self) -> impl Iterator<Item = &ChargerSite> {
        self.sites.iter()
    }

    /// Number of sites in the dataset.
    pub fn len(&self) -> usize {
        self.sites.len()
    }

    /// Whether the dataset has no sites at all.
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Count sites overall, sites with coordinates, and sites per status.
    pub fn stats(&self) -> DatasetStats {
        let mut stats = DatasetStats {
            total_sites: self.sites.len(),
            ..Default::default()
        };
        for site in &self.sites {
            if site.position.is_some() {
                stats.located_sites += 1;
            }
            *stats.by_status.entry(site.status.clone()).or_insert(0) += 1;
        }
        stats
    }
}

impl<'a> IntoIterator for &'a ChargerDataset {
    type Item = &'a ChargerSite;
    type IntoIter = std::slice::Iter<'a, ChargerSite>;

    fn into_iter(self) -> Self::IntoIter {
        self.sites.iter()
    }
}
