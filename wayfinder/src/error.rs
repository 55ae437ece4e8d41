//! Error types for the Wayfinder library.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when loading data or talking to upstream services.
#[derive(Error, Debug)]
pub enum WayfinderError {
    /// IO error when reading files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The charger dataset file does not exist.
    #[error("Charger dataset not found: {path}")]
    DatasetNotFound { path: PathBuf },

    /// The charger dataset could not be decoded.
    #[error("Invalid charger dataset: {reason}")]
    InvalidDataset { reason: String },

    /// The request cannot be forwarded as given.
    #[error("Invalid request: {reason}")]
    InvalidRequest { reason: String },

    /// The upstream service answered, but had nothing for the query.
    #[error("{what} not found")]
    NotFound { what: String },

    /// An upstream call needs an API key that is not configured.
    #[error("{service} API key not configured")]
    MissingApiKey { service: &'static str },

    /// Transport-level failure talking to an upstream service.
    #[cfg(feature = "upstream")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The upstream service returned a non-success status.
    #[error("{service} error (HTTP {status}): {body}")]
    UpstreamStatus {
        service: &'static str,
        status: u16,
        body: String,
    },

    /// The upstream response body did not have the expected shape.
    #[error("Unexpected {service} response: {reason}")]
    InvalidResponse {
        service: &'static str,
        reason: String,
    },
}

/// Result type alias using [`WayfinderError`].
pub type Result<T> = std::result::Result<T, WayfinderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = WayfinderError::DatasetNotFound {
            path: PathBuf::from("ev_chargers.json"),
        };
        assert!(err.to_string().contains("ev_chargers.json"));

        let err = WayfinderError::NotFound {
            what: "Location".to_string(),
        };
        assert_eq!(err.to_string(), "Location not found");

        let err = WayfinderError::UpstreamStatus {
            service: "ORS",
            status: 403,
            body: "quota exceeded".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("ORS"));
        assert!(msg.contains("403"));
        assert!(msg.contains("quota exceeded"));

        let err = WayfinderError::MissingApiKey { service: "ORS" };
        assert_eq!(err.to_string(), "ORS API key not configured");
    }
}
