//! Adapters for the external services behind the façade.
//!
//! This module is only available when the `upstream` feature is enabled.
//!
//! Three services are supported, each reached with a single outbound request:
//!
//! - **Geocoding**: a Nominatim-compatible `search` endpoint
//! - **Routing**: the OpenRouteService GeoJSON directions endpoint
//! - **Peaks**: an Overpass API interpreter
//!
//! The [`Upstream`] trait is the seam between request handling and the
//! network; [`HttpUpstream`] is the production implementation.
//!
//! ```ignore
//! use wayfinder::upstream::{HttpUpstream, Upstream, UpstreamConfig};
//!
//! let upstream = HttpUpstream::new(UpstreamConfig::from_env())?;
//! let place = upstream.geocode("San Francisco, CA").await?;
//! println!("{}, {}", place.latitude, place.longitude);
//! ```

mod client;
pub mod geocode;
pub mod overpass;
pub mod routing;

use async_trait::async_trait;

use crate::error::Result;

pub use client::HttpUpstream;
pub use geocode::{GeocodeMeta, GeocodeResult};
pub use overpass::{Peak, PeakQuery};
pub use routing::{Route, RouteRequest, RouteSummary};

/// Default Nominatim search endpoint.
pub const DEFAULT_GEOCODE_URL: &str = "https://nominatim.openstreetmap.org/search";

/// Default OpenRouteService directions endpoint (driving, GeoJSON output).
pub const DEFAULT_ROUTING_URL: &str =
    "https://api.openrouteservice.org/v2/directions/driving-car/geojson";

/// Default Overpass interpreter endpoint.
pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";

/// Default timeout for outbound requests in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Endpoints and credentials for the upstream services.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Geocoding search endpoint.
    pub geocode_url: String,
    /// Routing directions endpoint.
    pub routing_url: String,
    /// Overpass interpreter endpoint.
    pub overpass_url: String,
    /// OpenRouteService API key, sent verbatim in the `Authorization` header.
    pub ors_api_key: Option<String>,
    /// `User-Agent` sent to the geocoder (Nominatim rejects anonymous clients).
    pub user_agent: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            geocode_url: DEFAULT_GEOCODE_URL.to_string(),
            routing_url: DEFAULT_ROUTING_URL.to_string(),
            overpass_url: DEFAULT_OVERPASS_URL.to_string(),
            ors_api_key: None,
            user_agent: concat!("wayfinder/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl UpstreamConfig {
    /// Create a configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `ORS_API_KEY` | OpenRouteService API key | None |
    /// | `WAYFINDER_GEOCODE_URL` | Geocoding endpoint | Nominatim |
    /// | `WAYFINDER_ROUTING_URL` | Routing endpoint | OpenRouteService |
    /// | `WAYFINDER_OVERPASS_URL` | Overpass endpoint | overpass-api.de |
    /// | `WAYFINDER_USER_AGENT` | User-Agent for geocoding | `wayfinder/<version>` |
    /// | `WAYFINDER_HTTP_TIMEOUT` | Request timeout in seconds | 30 |
    ///
    /// Unset or empty variables fall back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        Self {
            geocode_url: var("WAYFINDER_GEOCODE_URL").unwrap_or(defaults.geocode_url),
            routing_url: var("WAYFINDER_ROUTING_URL").unwrap_or(defaults.routing_url),
            overpass_url: var("WAYFINDER_OVERPASS_URL").unwrap_or(defaults.overpass_url),
            ors_api_key: var("ORS_API_KEY"),
            user_agent: var("WAYFINDER_USER_AGENT").unwrap_or(defaults.user_agent),
            timeout_secs: var("WAYFINDER_HTTP_TIMEOUT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.timeout_secs),
        }
    }

    /// Set the OpenRouteService API key.
    pub fn ors_api_key(mut self, key: impl Into<String>) -> Self {
        self.ors_api_key = Some(key.into());
        self
    }

    /// Set the geocoding endpoint.
    pub fn geocode_url(mut self, url: impl Into<String>) -> Self {
        self.geocode_url = url.into();
        self
    }

    /// Set the routing endpoint.
    pub fn routing_url(mut self, url: impl Into<String>) -> Self {
        self.routing_url = url.into();
        self
    }

    /// Set the Overpass endpoint.
    pub fn overpass_url(mut self, url: impl Into<String>) -> Self {
        self.overpass_url = url.into();
        self
    }

    /// Set the request timeout in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Operations backed by external services.
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Resolve free text to the best-matching place.
    async fn geocode(&self, location_text: &str) -> Result<GeocodeResult>;

    /// Compute a driving route through the requested coordinates.
    async fn route(&self, request: &RouteRequest) -> Result<Route>;

    /// Find peaks around a point, in the order the service returns them.
    async fn peaks(&self, query: &PeakQuery) -> Result<Vec<Peak>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 6] = [
        "ORS_API_KEY",
        "WAYFINDER_GEOCODE_URL",
        "WAYFINDER_ROUTING_URL",
        "WAYFINDER_OVERPASS_URL",
        "WAYFINDER_USER_AGENT",
        "WAYFINDER_HTTP_TIMEOUT",
    ];

    // Single test so the environment is not mutated concurrently.
    #[test]
    fn test_from_env() {
        let originals: Vec<_> = VARS.iter().map(|v| std::env::var(v).ok()).collect();

        for v in VARS {
            std::env::remove_var(v);
        }
        let config = UpstreamConfig::from_env();
        assert_eq!(config.geocode_url, DEFAULT_GEOCODE_URL);
        assert_eq!(config.routing_url, DEFAULT_ROUTING_URL);
        assert_eq!(config.overpass_url, DEFAULT_OVERPASS_URL);
        assert!(config.ors_api_key.is_none());
        assert!(config.user_agent.starts_with("wayfinder/"));
        assert_eq!(config.timeout_secs, 30);

        std::env::set_var("ORS_API_KEY", "secret");
        std::env::set_var("WAYFINDER_OVERPASS_URL", "http://localhost:9000/api/interpreter");
        std::env::set_var("WAYFINDER_HTTP_TIMEOUT", "5");
        std::env::set_var("WAYFINDER_USER_AGENT", "  ");
        let config = UpstreamConfig::from_env();
        assert_eq!(config.ors_api_key.as_deref(), Some("secret"));
        assert_eq!(config.overpass_url, "http://localhost:9000/api/interpreter");
        assert_eq!(config.timeout_secs, 5);
        assert!(config.user_agent.starts_with("wayfinder/"));

        std::env::set_var("WAYFINDER_HTTP_TIMEOUT", "soon");
        assert_eq!(UpstreamConfig::from_env().timeout_secs, 30);

        for (v, original) in VARS.iter().zip(originals) {
            match original {
                Some(val) => std::env::set_var(v, val),
                None => std::env::remove_var(v),
            }
        }
    }

    #[test]
    fn test_builder_setters() {
        let config = UpstreamConfig::default()
            .ors_api_key("key")
            .geocode_url("http://geo")
            .routing_url("http://route")
            .overpass_url("http://overpass")
            .timeout_secs(3);
        assert_eq!(config.ors_api_key.as_deref(), Some("key"));
        assert_eq!(config.geocode_url, "http://geo");
        assert_eq!(config.routing_url, "http://route");
        assert_eq!(config.overpass_url, "http://overpass");
        assert_eq!(config.timeout_secs, 3);
    }
}
