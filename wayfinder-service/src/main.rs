//! Wayfinder Service - HTTP microservice for route planning.
//!
//! Forwards geocoding, routing and peak search requests to public services
//! and answers EV charger lookups from a local dataset.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `WAYFINDER_PORT` | HTTP server port | 8080 |
//! | `WAYFINDER_CHARGERS` | Charger dataset (`.json`, `.json.gz`, `.zip`) | `ev_chargers.json` |
//! | `ORS_API_KEY` | OpenRouteService API key | None |
//! | `WAYFINDER_GEOCODE_URL` | Geocoding endpoint | Nominatim |
//! | `WAYFINDER_ROUTING_URL` | Routing endpoint | OpenRouteService |
//! | `WAYFINDER_OVERPASS_URL` | Overpass endpoint | overpass-api.de |
//! | `WAYFINDER_USER_AGENT` | User-Agent for geocoding | `wayfinder/<version>` |
//! | `WAYFINDER_HTTP_TIMEOUT` | Outbound request timeout (seconds) | 30 |
//! | `RUST_LOG` | Log level (e.g., "info", "debug") | "info" |
//!
//! ## Endpoints
//!
//! - `POST /geocode_location` - Resolve free text to coordinates
//! - `POST /get_route` - Driving route summary
//! - `POST /search_mountains` - Up to 3 peaks around a point
//! - `POST /get_ev_chargers` - EV chargers within a radius
//! - `GET /health` - Health check
//! - `GET /stats` - Charger dataset statistics
//! - `GET /docs` - OpenAPI documentation (Swagger UI)

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wayfinder::upstream::{HttpUpstream, UpstreamConfig};
use wayfinder::ChargerDataset;
use wayfinder_service::{app, AppState};

/// Dataset path used when `WAYFINDER_CHARGERS` is not set.
const DEFAULT_CHARGERS_PATH: &str = "ev_chargers.json";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wayfinder_service=info,wayfinder=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let port: u16 = std::env::var("WAYFINDER_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);

    let chargers_path =
        std::env::var("WAYFINDER_CHARGERS").unwrap_or_else(|_| DEFAULT_CHARGERS_PATH.to_string());

    // A missing or malformed dataset is a configuration error: refuse to start
    let dataset = ChargerDataset::load(&chargers_path).map_err(|e| {
        tracing::error!(path = %chargers_path, error = %e, "Failed to load charger dataset");
        e
    })?;
    let stats = dataset.stats();

    let config = UpstreamConfig::from_env();
    if config.ors_api_key.is_none() {
        tracing::warn!("ORS_API_KEY not set, /get_route will answer 503");
    }

    tracing::info!(
        chargers = %chargers_path,
        total_sites = stats.total_sites,
        located_sites = stats.located_sites,
        geocode_url = %config.geocode_url,
        routing_url = %config.routing_url,
        overpass_url = %config.overpass_url,
        timeout_secs = config.timeout_secs,
        port = port,
        "Starting Wayfinder service"
    );

    let upstream = HttpUpstream::new(config)?;
    let state = Arc::new(AppState {
        dataset,
        upstream: Box::new(upstream),
    });

    let app = app(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
