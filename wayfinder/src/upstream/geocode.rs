//! Geocoding via a Nominatim-compatible search endpoint.

use serde::{Deserialize, Serialize};

use crate::error::{Result, WayfinderError};

const SERVICE: &str = "Geocoding";

/// Best match for a free-text location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct GeocodeResult {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Full display name reported by the geocoder.
    pub location_name: Option<String>,
    /// Extra classification details.
    pub meta: GeocodeMeta,
}

/// Classification details for a geocoded place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct GeocodeMeta {
    /// OSM place type, e.g. `city` or `administrative`.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Geocoder relevance score.
    pub importance: Option<f64>,
}

/// One entry of a Nominatim `format=json` response.
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    importance: Option<f64>,
}

/// Normalize free text before it is sent: trimmed and lowercased.
///
/// # Errors
///
/// Returns [`WayfinderError::InvalidRequest`] if nothing is left after trimming.
pub fn normalize_query(location_text: &str) -> Result<String> {
    let normalized = location_text.trim().to_lowercase();
    if normalized.is_empty() {
        return Err(WayfinderError::InvalidRequest {
            reason: "location_text must not be empty".to_string(),
        });
    }
    Ok(normalized)
}

/// Parse a Nominatim search response, keeping the first match.
///
/// # Errors
///
/// - [`WayfinderError::NotFound`] if the response is an empty array
/// - [`WayfinderError::InvalidResponse`] if the body is not a place list or
///   the coordinates are not numeric
pub fn parse_geocode_response(body: &[u8]) -> Result<GeocodeResult> {
    let places: Vec<NominatimPlace> =
        serde_json::from_slice(body).map_err(|e| WayfinderError::InvalidResponse {
            service: SERVICE,
            reason: e.to_string(),
        })?;

    let place = places
        .into_iter()
        .next()
        .ok_or_else(|| WayfinderError::NotFound {
            what: "Location".to_string(),
        })?;

    let parse_coord = |value: &str, axis: &str| {
        value
            .trim()
            .parse::<f64>()
            .map_err(|_| WayfinderError::InvalidResponse {
                service: SERVICE,
                reason: format!("{} is not a number: {:?}", axis, value),
            })
    };

    Ok(GeocodeResult {
        latitude: parse_coord(&place.lat, "lat")?,
        longitude: parse_coord(&place.lon, "lon")?,
        location_name: place.display_name,
        meta: GeocodeMeta {
            kind: place.kind,
            importance: place.importance,
        },
    })
}
