//! Mountain peak search via the Overpass API.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WayfinderError};
use crate::geo::GeoPoint;

const SERVICE: &str = "Overpass";

/// Name used for peaks without a `name` tag.
pub const UNNAMED_PEAK: &str = "Unnamed Peak";

/// Default search radius in meters.
pub const DEFAULT_PEAK_RADIUS_M: u32 = 25_000;

/// A peak search around a point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakQuery {
    /// Search center.
    pub center: GeoPoint,
    /// Search radius in meters.
    pub radius_m: u32,
}

impl PeakQuery {
    /// Create a query around `center`.
    pub fn new(center: GeoPoint, radius_m: u32) -> Self {
        Self { center, radius_m }
    }

    /// Overpass QL selecting `natural=peak` nodes within the radius.
    ///
    /// # Example
    ///
    /// ```
    /// use wayfinder::upstream::PeakQuery;
    /// use wayfinder::GeoPoint;
    ///
    /// let query = PeakQuery::new(GeoPoint::new(46.5, 8.0), 10_000);
    /// assert_eq!(
    ///     query.to_overpass_ql(),
    ///     "[out:json];\nnode[\"natural\"=\"peak\"](around:10000,46.5,8);\nout;"
    /// );
    /// ```
    pub fn to_overpass_ql(&self) -> String {
        format!(
            "[out:json];\nnode[\"natural\"=\"peak\"](around:{},{},{});\nout;",
            self.radius_m, self.center.lat, self.center.lon
        )
    }
}

/// A named summit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Peak {
    /// Peak name, [`UNNAMED_PEAK`] if untagged.
    pub name: String,
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lon: f64,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
    lat: Option<f64>,
    lon: Option<f64>,
    #[serde(default)]
    tags: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

/// Parse an Overpass `[out:json]` response into peaks, keeping element order.
///
/// Elements without coordinates are skipped.
///
/// # Errors
///
/// Returns [`WayfinderError::InvalidResponse`] if the body is not Overpass JSON.
pub fn parse_peaks(body: &[u8]) -> Result<Vec<Peak>> {
    let response: OverpassResponse =
        serde_json::from_slice(body).map_err(|e| WayfinderError::InvalidResponse {
            service: SERVICE,
            reason: e.to_string(),
        })?;

    Ok(response
        .elements
        .into_iter()
        .filter_map(|mut element| {
            let (lat, lon) = (element.lat?, element.lon?);
            let name = element
                .tags
                .remove("name")
                .unwrap_or_else(|| UNNAMED_PEAK.to_string());
            Some(Peak { name, lat, lon })
        })
        .collect())
}
