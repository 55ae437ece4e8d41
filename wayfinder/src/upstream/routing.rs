//! Driving directions via the OpenRouteService GeoJSON endpoint.
//!
//! A response is a GeoJSON `FeatureCollection`; the first feature carries the
//! route in its properties:
//!
//! ```json
//! {"type": "FeatureCollection", "features": [{
//!   "type": "Feature",
//!   "geometry": {"type": "LineString", "coordinates": [[8.68, 49.41], [8.69, 49.42]]},
//!   "properties": {
//!     "summary": {"distance": 1234.5, "duration": 300.2},
//!     "segments": [{"steps": [{"instruction": "Head north"}, {"instruction": "Arrive"}]}]
//!   }
//! }]}
//! ```

use chrono::{DateTime, Duration, Utc};
use geojson::{FeatureCollection, GeoJson};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{Result, WayfinderError};
use crate::geo::round_to;
use crate::shape;

const SERVICE: &str = "ORS";

/// Format of [`RouteSummary::estimated_arrival`].
pub const ARRIVAL_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

/// A routing request: waypoints in `[longitude, latitude]` order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RouteRequest {
    /// Waypoints as `[lon, lat]` pairs, at least two.
    #[cfg_attr(feature = "openapi", schema(value_type = Vec<Vec<f64>>))]
    pub coordinates: Vec<[f64; 2]>,
    /// Road features to avoid, e.g. `ferries` or `tollways`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avoid_features: Option<Vec<String>>,
}

impl RouteRequest {
    /// Create a request through the given waypoints.
    pub fn new(coordinates: Vec<[f64; 2]>) -> Self {
        Self {
            coordinates,
            avoid_features: None,
        }
    }

    /// Avoid the given road features.
    pub fn avoid(mut self, features: Vec<String>) -> Self {
        self.avoid_features = Some(features);
        self
    }

    /// Check the request can be routed.
    ///
    /// # Errors
    ///
    /// Returns [`WayfinderError::InvalidRequest`] with fewer than two waypoints.
    pub fn validate(&self) -> Result<()> {
        if self.coordinates.len() < 2 {
            return Err(WayfinderError::InvalidRequest {
                reason: format!(
                    "a route needs at least 2 coordinates, got {}",
                    self.coordinates.len()
                ),
            });
        }
        Ok(())
    }

    /// JSON body sent to the routing service.
    pub fn payload(&self) -> Value {
        let mut payload = json!({
            "coordinates": self.coordinates,
            "instructions": true,
        });
        if let Some(avoid) = self.avoid_features.as_ref().filter(|a| !a.is_empty()) {
            payload["options"] = json!({ "avoid_features": avoid });
        }
        payload
    }
}

/// A parsed route, in the units the routing service reports.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Total distance in meters.
    pub distance_m: f64,
    /// Total duration in seconds.
    pub duration_s: f64,
    /// Turn instructions across all segments, in order.
    pub steps: Vec<String>,
    /// First requested waypoint.
    pub start: [f64; 2],
    /// Last requested waypoint.
    pub end: [f64; 2],
}

/// Compact route description returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RouteSummary {
    /// Total distance in kilometers (2 decimals).
    pub distance_km: f64,
    /// Total duration in minutes (2 decimals).
    pub duration_min: f64,
    /// Arrival time if leaving now, e.g. `2024-05-01 17:42 UTC`.
    pub estimated_arrival: String,
    /// Turn instructions; long routes keep only the first and last few.
    pub steps: Vec<String>,
    /// First requested waypoint `[lon, lat]`.
    #[cfg_attr(feature = "openapi", schema(value_type = Vec<f64>))]
    pub start: [f64; 2],
    /// Last requested waypoint `[lon, lat]`.
    #[cfg_attr(feature = "openapi", schema(value_type = Vec<f64>))]
    pub end: [f64; 2],
}

impl Route {
    /// Convert to kilometers/minutes, compute the ETA from `now`, and
    /// truncate the step list.
    ///
    /// # Errors
    ///
    /// Returns [`WayfinderError::InvalidResponse`] if the duration is negative,
    /// not finite, or puts the arrival time outside the representable range.
    pub fn summarize(self, now: DateTime<Utc>) -> Result<RouteSummary> {
        let eta = arrival_time(now, self.duration_s)?;

        Ok(RouteSummary {
            distance_km: round_to(self.distance_m / 1000.0, 2),
            duration_min: round_to(self.duration_s / 60.0, 2),
            estimated_arrival: eta.format(ARRIVAL_FORMAT).to_string(),
            steps: shape::route_steps(self.steps),
            start: self.start,
            end: self.end,
        })
    }

    /// [`Route::summarize`] with the ETA counted from the current time.
    pub fn summarize_now(self) -> Result<RouteSummary> {
        self.summarize(Utc::now())
    }
}

fn arrival_time(now: DateTime<Utc>, duration_s: f64) -> Result<DateTime<Utc>> {
    let millis = (duration_s * 1000.0).round();
    if !millis.is_finite() || millis < 0.0 || millis >= i64::MAX as f64 {
        return Err(invalid(format!("route duration {duration_s} s is out of range")));
    }

    Duration::try_milliseconds(millis as i64)
        .and_then(|d| now.checked_add_signed(d))
        .ok_or_else(|| invalid(format!("route duration {duration_s} s is out of range")))
}

#[derive(Debug, Default, Deserialize)]
struct OrsSummary {
    #[serde(default)]
    distance: f64,
    #[serde(default)]
    duration: f64,
}

#[derive(Debug, Deserialize)]
struct OrsStep {
    instruction: String,
}

#[derive(Debug, Deserialize)]
struct OrsSegment {
    #[serde(default)]
    steps: Vec<OrsStep>,
}

#[derive(Debug, Deserialize)]
struct OrsProperties {
    // ORS drops zero-valued fields, so a missing summary means a zero-length route
    #[serde(default)]
    summary: OrsSummary,
    #[serde(default)]
    segments: Vec<OrsSegment>,
}

fn invalid(reason: impl Into<String>) -> WayfinderError {
    WayfinderError::InvalidResponse {
        service: SERVICE,
        reason: reason.into(),
    }
}

/// Parse a GeoJSON directions response for `request`.
///
/// # Errors
///
/// - [`WayfinderError::NotFound`] if the collection has no features
/// - [`WayfinderError::InvalidResponse`] if the body is not a feature
///   collection or the first feature has unexpected properties
pub fn parse_route_response(body: &str, request: &RouteRequest) -> Result<Route> {
    let geojson: GeoJson = body.parse().map_err(|e: geojson::Error| invalid(e.to_string()))?;
    let collection =
        FeatureCollection::try_from(geojson).map_err(|e| invalid(e.to_string()))?;

    let feature = collection
        .features
        .into_iter()
        .next()
        .ok_or_else(|| WayfinderError::NotFound {
            what: "Route".to_string(),
        })?;

    let properties = feature
        .properties
        .ok_or_else(|| invalid("route feature has no properties"))?;
    let properties: OrsProperties =
        serde_json::from_value(Value::Object(properties)).map_err(|e| invalid(e.to_string()))?;

    let steps = properties
        .segments
        .into_iter()
        // Every leg contributes its steps, not only the first one
        .flat_map(|segment| segment.steps)
        .map(|step| step.instruction)
        .collect();

    let (start, end) = match (request.coordinates.first(), request.coordinates.last()) {
        (Some(start), Some(end)) => (*start, *end),
        _ => {
            return Err(WayfinderError::InvalidRequest {
                reason: "a route needs at least 2 coordinates, got 0".to_string(),
            })
        }
    };

    Ok(Route {
        distance_m: properties.summary.distance,
        duration_s: properties.summary.duration,
        steps,
        start,
        end,
    })
}
