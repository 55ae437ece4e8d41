//! HTTP request handlers for the route planning service.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use wayfinder::shape;
use wayfinder::upstream::{
    overpass::DEFAULT_PEAK_RADIUS_M, GeocodeResult, Peak, PeakQuery, RouteRequest, RouteSummary,
};
use wayfinder::{find_nearby, DatasetStats, GeoPoint, ProximityResult, WayfinderError};

use crate::AppState;

/// Default EV charger search radius in kilometers.
pub const DEFAULT_CHARGER_RADIUS_KM: f64 = 50.0;

/// Request body for geocoding.
#[derive(Debug, Deserialize, ToSchema)]
pub struct GeocodeRequest {
    /// Free-text place description.
    #[schema(example = "San Francisco, CA")]
    pub location_text: String,
}

/// Request body for routing.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RouteBody {
    /// Waypoints as `[lon, lat]` pairs, at least two.
    #[schema(value_type = Vec<Vec<f64>>, example = json!([[-122.4194, 37.7749], [-118.2437, 34.0522]]))]
    pub coordinates: Vec<[f64; 2]>,
    /// Road features to avoid, e.g. `ferries` or `tollways`.
    #[serde(default)]
    #[schema(example = json!(["ferries", "tollways"]))]
    pub avoid_prefs: Option<Vec<String>>,
}

impl From<RouteBody> for RouteRequest {
    fn from(body: RouteBody) -> Self {
        RouteRequest {
            coordinates: body.coordinates,
            avoid_features: body.avoid_prefs,
        }
    }
}

fn default_radius_m() -> u32 {
    DEFAULT_PEAK_RADIUS_M
}

/// Request body for peak search.
#[derive(Debug, Deserialize, ToSchema)]
pub struct MountainSearchRequest {
    /// Latitude in decimal degrees.
    #[schema(example = 37.7749)]
    pub lat: f64,
    /// Longitude in decimal degrees.
    #[schema(example = -122.4194)]
    pub lon: f64,
    /// Search radius in meters.
    #[serde(default = "default_radius_m")]
    #[schema(example = 25000)]
    pub radius_m: u32,
}

fn default_radius_km() -> f64 {
    DEFAULT_CHARGER_RADIUS_KM
}

/// Request body for EV charger search.
#[derive(Debug, Deserialize, ToSchema)]
pub struct EvChargerRequest {
    /// Latitude in decimal degrees.
    #[schema(example = 37.7749)]
    pub lat: f64,
    /// Longitude in decimal degrees.
    #[schema(example = -122.4194)]
    pub lon: f64,
    /// Search radius in kilometers. Zero or negative matches nothing.
    #[serde(default = "default_radius_km")]
    #[schema(example = 50.0)]
    pub radius_km: f64,
}

/// Error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message.
    pub error: String,
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
}

/// Resolve a free-text location to coordinates.
///
/// # Returns
///
/// - `200 OK` with the best match
/// - `400 Bad Request` if `location_text` is blank
/// - `404 Not Found` if the geocoder has no match
/// - `502 Bad Gateway` if the geocoder fails
#[utoipa::path(
    post,
    path = "/geocode_location",
    operation_id = "geocode_location",
    tag = "planning",
    request_body = GeocodeRequest,
    responses(
        (status = 200, description = "Best match", body = GeocodeResult),
        (status = 400, description = "Blank location text", body = ErrorResponse),
        (status = 404, description = "Location not found", body = ErrorResponse),
        (status = 502, description = "Geocoder failure", body = ErrorResponse)
    )
)]
pub async fn geocode_location(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GeocodeRequest>,
) -> impl IntoResponse {
    tracing::debug!(location_text = %request.location_text, "Geocode request");

    match state.upstream.geocode(&request.location_text).await {
        Ok(result) => {
            tracing::info!(
                latitude = result.latitude,
                longitude = result.longitude,
                "Location found"
            );
            (StatusCode::OK, Json(result)).into_response()
        }
        Err(e) => error_response("geocode_location", e),
    }
}

/// Compute a driving route through the given waypoints.
///
/// Long routes keep the first 5 and last 5 instructions.
///
/// # Returns
///
/// - `200 OK` with distance, duration, ETA and steps
/// - `400 Bad Request` with fewer than two coordinates
/// - `404 Not Found` if no route exists
/// - `502 Bad Gateway` if the routing service fails
/// - `503 Service Unavailable` if no routing API key is configured
#[utoipa::path(
    post,
    path = "/get_route",
    operation_id = "get_route",
    tag = "planning",
    request_body = RouteBody,
    responses(
        (status = 200, description = "Route summary", body = RouteSummary),
        (status = 400, description = "Too few coordinates", body = ErrorResponse),
        (status = 404, description = "No route found", body = ErrorResponse),
        (status = 502, description = "Routing service failure", body = ErrorResponse),
        (status = 503, description = "Routing not configured", body = ErrorResponse)
    )
)]
pub async fn get_route(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RouteBody>,
) -> impl IntoResponse {
    let request = RouteRequest::from(body);
    tracing::debug!(waypoints = request.coordinates.len(), "Route request");

    if let Err(e) = request.validate() {
        return error_response("get_route", e);
    }

    let summary = state
        .upstream
        .route(&request)
        .await
        .and_then(|route| route.summarize_now());

    match summary {
        Ok(summary) => {
            tracing::info!(
                distance_km = summary.distance_km,
                duration_min = summary.duration_min,
                steps = summary.steps.len(),
                "Route found"
            );
            (StatusCode::OK, Json(summary)).into_response()
        }
        Err(e) => error_response("get_route", e),
    }
}

/// Find up to 3 mountain peaks around a point.
///
/// Peaks are returned in the order the Overpass API lists them.
///
/// # Returns
///
/// - `200 OK` with at most 3 peaks (possibly none)
/// - `502 Bad Gateway` if the Overpass API fails
#[utoipa::path(
    post,
    path = "/search_mountains",
    operation_id = "search_mountains",
    tag = "planning",
    request_body = MountainSearchRequest,
    responses(
        (status = 200, description = "Up to 3 peaks", body = Vec<Peak>),
        (status = 502, description = "Overpass failure", body = ErrorResponse)
    )
)]
pub async fn search_mountains(
    State(state): State<Arc<AppState>>,
    Json(request): Json<MountainSearchRequest>,
) -> impl IntoResponse {
    let query = PeakQuery::new(GeoPoint::new(request.lat, request.lon), request.radius_m);
    tracing::debug!(
        lat = request.lat,
        lon = request.lon,
        radius_m = request.radius_m,
        "Peak search"
    );

    match state.upstream.peaks(&query).await {
        Ok(peaks) => {
            let found = peaks.len();
            let peaks = shape::peaks(peaks);
            tracing::info!(found = found, returned = peaks.len(), "Peaks found");
            (StatusCode::OK, Json(peaks)).into_response()
        }
        Err(e) => error_response("search_mountains", e),
    }
}

/// List EV chargers within a radius, closest first.
///
/// Served from the dataset loaded at startup; no upstream call is made.
/// Invalid coordinates or a non-positive radius yield an empty list.
#[utoipa::path(
    post,
    path = "/get_ev_chargers",
    operation_id = "get_ev_chargers",
    tag = "chargers",
    request_body = EvChargerRequest,
    responses(
        (status = 200, description = "Chargers ordered by distance", body = Vec<ProximityResult>)
    )
)]
pub async fn get_ev_chargers(
    State(state): State<Arc<AppState>>,
    Json(request): Json<EvChargerRequest>,
) -> Json<Vec<ProximityResult>> {
    let results = find_nearby(
        &state.dataset,
        GeoPoint::new(request.lat, request.lon),
        request.radius_km,
    );

    tracing::info!(
        lat = request.lat,
        lon = request.lon,
        radius_km = request.radius_km,
        found = results.len(),
        "Charger search"
    );

    Json(results)
}

/// Create an error response for a failed operation.
fn error_response(operation: &str, e: WayfinderError) -> axum::response::Response {
    let status = match &e {
        WayfinderError::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
        WayfinderError::NotFound { .. } => StatusCode::NOT_FOUND,
        WayfinderError::MissingApiKey { .. } => StatusCode::SERVICE_UNAVAILABLE,
        WayfinderError::Http(_)
        | WayfinderError::UpstreamStatus { .. }
        | WayfinderError::InvalidResponse { .. } => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    tracing::warn!(operation = operation, status = status.as_u16(), error = %e, "Request failed");

    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
        .into_response()
}

/// Health check endpoint.
///
/// Returns service status and version.
#[utoipa::path(
    get,
    path = "/health",
    operation_id = "health_check",
    tag = "system",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Get charger dataset statistics.
#[utoipa::path(
    get,
    path = "/stats",
    operation_id = "get_stats",
    tag = "system",
    responses((status = 200, description = "Dataset statistics", body = DatasetStats))
)]
pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<DatasetStats> {
    Json(state.dataset.stats())
}
