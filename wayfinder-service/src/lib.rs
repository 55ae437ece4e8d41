//! Wayfinder Service Library
//!
//! HTTP handlers, router and OpenAPI document for the route planning service.
//! This library is used by both the wayfinder-service binary and integration tests.

pub mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use wayfinder::upstream::Upstream;
use wayfinder::ChargerDataset;

/// Application state shared across handlers.
pub struct AppState {
    /// Charger dataset loaded at startup, never modified afterwards.
    pub dataset: ChargerDataset,
    /// Geocoding, routing and peak search backend.
    pub upstream: Box<dyn Upstream>,
}

/// OpenAPI documentation for the Wayfinder service.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Wayfinder Route Planning Service",
        version = "0.1.0",
        description = "Simple API exposing route planning operations: geocoding, driving directions, peak search and EV charger lookup.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT"),
        contact(name = "Pedro Sanz Martinez", url = "https://github.com/pedrosanzmtz/wayfinder")
    ),
    paths(
        handlers::geocode_location,
        handlers::get_route,
        handlers::search_mountains,
        handlers::get_ev_chargers,
        handlers::health_check,
        handlers::get_stats,
    ),
    components(
        schemas(
            handlers::GeocodeRequest,
            handlers::RouteBody,
            handlers::MountainSearchRequest,
            handlers::EvChargerRequest,
            handlers::ErrorResponse,
            handlers::HealthResponse,
            wayfinder::upstream::GeocodeResult,
            wayfinder::upstream::GeocodeMeta,
            wayfinder::upstream::RouteSummary,
            wayfinder::upstream::Peak,
            wayfinder::ProximityResult,
            wayfinder::DatasetStats,
        )
    ),
    tags(
        (name = "planning", description = "Geocoding, routing and peak search"),
        (name = "chargers", description = "EV charger lookup"),
        (name = "system", description = "System and health endpoints")
    )
)]
pub struct ApiDoc;

/// Build the application router with documentation and middleware.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/geocode_location", post(handlers::geocode_location))
        .route("/get_route", post(handlers::get_route))
        .route("/search_mountains", post(handlers::search_mountains))
        .route("/get_ev_chargers", post(handlers::get_ev_chargers))
        .route("/health", get(handlers::health_check))
        .route("/stats", get(handlers::get_stats))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

// Re-export commonly used types for convenience
pub use handlers::{
    ErrorResponse, EvChargerRequest, GeocodeRequest, HealthResponse, MountainSearchRequest,
    RouteBody,
};
