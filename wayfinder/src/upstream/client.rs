use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT},
    Client, Response,
};

use crate::error::{Result, WayfinderError};

use super::geocode::{self, GeocodeResult};
use super::overpass::{self, Peak, PeakQuery};
use super::routing::{self, Route, RouteRequest};
use super::{Upstream, UpstreamConfig};

/// [`Upstream`] implementation that talks HTTP to the configured services.
pub struct HttpUpstream {
    config: UpstreamConfig,
    client: Client,
}

impl HttpUpstream {
    /// Create a client for the configured endpoints.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created (e.g., due to
    /// TLS initialization failure).
    pub fn new(config: UpstreamConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &UpstreamConfig {
        &self.config
    }

    /// Pass successful responses through; turn anything else into
    /// [`WayfinderError::UpstreamStatus`] carrying the response body.
    async fn check_status(service: &'static str, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::warn!(
            service = service,
            status = status.as_u16(),
            body = %body,
            "Upstream request failed"
        );
        Err(WayfinderError::UpstreamStatus {
            service,
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl Upstream for HttpUpstream {
    async fn geocode(&self, location_text: &str) -> Result<GeocodeResult> {
        let query = geocode::normalize_query(location_text)?;
        tracing::debug!(query = %query, url = %self.config.geocode_url, "Geocoding");

        let response = self
            .client
            .get(&self.config.geocode_url)
            .query(&[("q", query.as_str()), ("format", "json"), ("limit", "1")])
            .header(USER_AGENT, &self.config.user_agent)
            .send()
            .await?;
        let response = Self::check_status("Geocoding", response).await?;

        let body = response.bytes().await?;
        geocode::parse_geocode_response(&body)
    }

    async fn route(&self, request: &RouteRequest) -> Result<Route> {
        request.validate()?;
        let api_key = self
            .config
            .ors_api_key
            .as_deref()
            .ok_or(WayfinderError::MissingApiKey { service: "ORS" })?;

        tracing::debug!(
            waypoints = request.coordinates.len(),
            avoid = ?request.avoid_features,
            "Requesting route"
        );

        let response = self
            .client
            .post(&self.config.routing_url)
            .header(AUTHORIZATION, api_key)
            .json(&request.payload())
            .send()
            .await?;
        let response = Self::check_status("ORS", response).await?;

        let body = response.text().await?;
        routing::parse_route_response(&body, request)
    }

    async fn peaks(&self, query: &PeakQuery) -> Result<Vec<Peak>> {
        let ql = query.to_overpass_ql();
        tracing::debug!(
            lat = query.center.lat,
            lon = query.center.lon,
            radius_m = query.radius_m,
            "Searching peaks"
        );

        let response = self
            .client
            .post(&self.config.overpass_url)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(ql)
            .send()
            .await?;
        let response = Self::check_status("Overpass", response).await?;

        let body = response.bytes().await?;
        overpass::parse_peaks(&body)
    }
}
