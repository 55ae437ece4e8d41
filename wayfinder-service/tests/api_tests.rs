//! Integration tests for the HTTP API.

use std::fs;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;
use wayfinder::upstream::{GeocodeMeta, GeocodeResult, Peak, PeakQuery, Route, RouteRequest, Upstream};
use wayfinder::{ChargerDataset, Result, WayfinderError};
use wayfinder_service::{app, AppState};

const CHARGERS: &str = r#"[
    {"name": "A", "gps": {"latitude": 37.0, "longitude": -122.0}, "status": "available"},
    {"name": "B", "gps": {"latitude": 37.1, "longitude": -122.1}, "status": "busy"},
    {"name": "Ghost", "gps": {"longitude": -122.0}, "status": "available"},
    {"gps": {"latitude": 37.05, "longitude": -122.05}}
]"#;

/// Canned upstream outcome for a test.
#[derive(Clone, Copy)]
enum Outcome {
    Ok,
    NotFound,
    Failing,
    Unconfigured,
}

/// Upstream that answers from fixtures instead of the network.
struct StubUpstream {
    outcome: Outcome,
    step_count: usize,
    peak_count: usize,
    duration_s: f64,
}

impl StubUpstream {
    fn new(outcome: Outcome) -> Self {
        Self {
            outcome,
            step_count: 12,
            peak_count: 7,
            duration_s: 21_873.4,
        }
    }

    fn fail<T>(&self, what: &str) -> Result<T> {
        Err(match self.outcome {
            Outcome::NotFound => WayfinderError::NotFound {
                what: what.to_string(),
            },
            Outcome::Unconfigured => WayfinderError::MissingApiKey { service: "ORS" },
            _ => WayfinderError::UpstreamStatus {
                service: "Stub",
                status: 500,
                body: "boom".to_string(),
            },
        })
    }
}

#[async_trait]
impl Upstream for StubUpstream {
    async fn geocode(&self, location_text: &str) -> Result<GeocodeResult> {
        if location_text.trim().is_empty() {
            return Err(WayfinderError::InvalidRequest {
                reason: "location_text must not be empty".to_string(),
            });
        }
        match self.outcome {
            Outcome::Ok => Ok(GeocodeResult {
                latitude: 37.7792588,
                longitude: -122.4193286,
                location_name: Some("San Francisco, California, United States".to_string()),
                meta: GeocodeMeta {
                    kind: Some("administrative".to_string()),
                    importance: Some(0.82),
                },
            }),
            _ => self.fail("Location"),
        }
    }

    async fn route(&self, request: &RouteRequest) -> Result<Route> {
        match self.outcome {
            Outcome::Ok => Ok(Route {
                distance_m: 615_234.7,
                duration_s: self.duration_s,
                steps: (0..self.step_count).map(|i| format!("step_{i}")).collect(),
                start: request.coordinates[0],
                end: request.coordinates[request.coordinates.len() - 1],
            }),
            _ => self.fail("Route"),
        }
    }

    async fn peaks(&self, query: &PeakQuery) -> Result<Vec<Peak>> {
        match self.outcome {
            Outcome::Ok => Ok((0..self.peak_count)
                .map(|i| Peak {
                    name: format!("peak_{i}"),
                    lat: query.center.lat + i as f64 * 0.01,
                    lon: query.center.lon,
                })
                .collect()),
            _ => self.fail("Peaks"),
        }
    }
}

fn create_state(upstream: StubUpstream) -> Arc<AppState> {
    let dataset = ChargerDataset::from_json_slice(CHARGERS.as_bytes()).unwrap();
    Arc::new(AppState {
        dataset,
        upstream: Box::new(upstream),
    })
}

/// Create a test server with a stubbed upstream.
fn create_test_server(upstream: StubUpstream) -> TestServer {
    TestServer::new(app(create_state(upstream))).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server(StubUpstream::new(Outcome::Ok));

    let response = server.get("/health").await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["status"], "healthy");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_stats() {
    let server = create_test_server(StubUpstream::new(Outcome::Ok));

    let response = server.get("/stats").await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["total_sites"], 4);
    assert_eq!(json["located_sites"], 3);
    assert_eq!(json["by_status"]["available"], 2);
    assert_eq!(json["by_status"]["unknown"], 1);
}

#[tokio::test]
async fn test_ev_chargers_small_radius() {
    let server = create_test_server(StubUpstream::new(Outcome::Ok));

    let response = server
        .post("/get_ev_chargers")
        .json(&json!({"lat": 37.0, "lon": -122.0, "radius_km": 5.5}))
        .await;

    response.assert_status_ok();
    let json: Value = response.json();
    let names: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    // The unnamed site sits ~7 km away, outside 5.5 km
    assert_eq!(names, vec!["A"]);
}

#[tokio::test]
async fn test_ev_chargers_default_radius() {
    let server = create_test_server(StubUpstream::new(Outcome::Ok));

    let response = server
        .post("/get_ev_chargers")
        .json(&json!({"lat": 37.0, "lon": -122.0}))
        .await;

    response.assert_status_ok();
    let json: Value = response.json();
    let results = json.as_array().unwrap();
    assert_eq!(results.len(), 3);

    assert_eq!(results[0]["name"], "A");
    assert_eq!(results[0]["distance_km"], 0.0);
    assert_eq!(results[0]["status"], "available");
    assert_eq!(results[1]["name"], "Unnamed Charger");
    assert_eq!(results[1]["status"], "unknown");
    assert_eq!(results[2]["name"], "B");
    assert_eq!(results[2]["distance_km"], 14.23);
    assert_eq!(results[2]["lat"], 37.1);
    assert_eq!(results[2]["lon"], -122.1);

    // Sites without both coordinates are never listed
    assert!(results.iter().all(|r| r["name"] != "Ghost"));
}

#[tokio::test]
async fn test_ev_chargers_non_positive_radius() {
    let server = create_test_server(StubUpstream::new(Outcome::Ok));

    for radius in [0.0, -5.0] {
        let response = server
            .post("/get_ev_chargers")
            .json(&json!({"lat": 37.0, "lon": -122.0, "radius_km": radius}))
            .await;

        response.assert_status_ok();
        let json: Value = response.json();
        assert_eq!(json, json!([]));
    }
}

#[tokio::test]
async fn test_ev_chargers_out_of_range_point() {
    let server = create_test_server(StubUpstream::new(Outcome::Ok));

    let response = server
        .post("/get_ev_chargers")
        .json(&json!({"lat": 137.0, "lon": -122.0, "radius_km": 50000.0}))
        .await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json, json!([]));
}

#[tokio::test]
async fn test_ev_chargers_missing_field() {
    let server = create_test_server(StubUpstream::new(Outcome::Ok));

    let response = server
        .post("/get_ev_chargers")
        .json(&json!({"lat": 37.0}))
        .await;

    assert!(response.status_code().is_client_error());
}

#[tokio::test]
async fn test_geocode_location() {
    let server = create_test_server(StubUpstream::new(Outcome::Ok));

    let response = server
        .post("/geocode_location")
        .json(&json!({"location_text": "San Francisco, CA"}))
        .await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["latitude"], 37.7792588);
    assert_eq!(json["longitude"], -122.4193286);
    assert_eq!(
        json["location_name"],
        "San Francisco, California, United States"
    );
    assert_eq!(json["meta"]["type"], "administrative");
    assert_eq!(json["meta"]["importance"], 0.82);
}

#[tokio::test]
async fn test_geocode_not_found() {
    let server = create_test_server(StubUpstream::new(Outcome::NotFound));

    let response = server
        .post("/geocode_location")
        .json(&json!({"location_text": "Atlantis"}))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    let json: Value = response.json();
    assert_eq!(json["error"], "Location not found");
}

#[tokio::test]
async fn test_geocode_blank_text() {
    let server = create_test_server(StubUpstream::new(Outcome::Ok));

    let response = server
        .post("/geocode_location")
        .json(&json!({"location_text": "   "}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_geocode_upstream_failure() {
    let server = create_test_server(StubUpstream::new(Outcome::Failing));

    let response = server
        .post("/geocode_location")
        .json(&json!({"location_text": "San Francisco"}))
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let json: Value = response.json();
    assert!(json["error"].as_str().unwrap().contains("boom"));
}

#[tokio::test]
async fn test_route_head_and_tail_steps() {
    let server = create_test_server(StubUpstream::new(Outcome::Ok));

    let response = server
        .post("/get_route")
        .json(&json!({
            "coordinates": [[-122.4194, 37.7749], [-119.4179, 36.7783], [-118.2437, 34.0522]],
            "avoid_prefs": ["ferries", "tollways"]
        }))
        .await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["distance_km"], 615.23);
    assert_eq!(json["duration_min"], 364.56);
    assert!(json["estimated_arrival"].as_str().unwrap().ends_with(" UTC"));
    assert_eq!(
        json["steps"],
        json!([
            "step_0", "step_1", "step_2", "step_3", "step_4", "step_7", "step_8", "step_9",
            "step_10", "step_11"
        ])
    );
    assert_eq!(json["start"], json!([-122.4194, 37.7749]));
    assert_eq!(json["end"], json!([-118.2437, 34.0522]));
}

#[tokio::test]
async fn test_route_short_step_list_unchanged() {
    let mut upstream = StubUpstream::new(Outcome::Ok);
    upstream.step_count = 10;
    let server = create_test_server(upstream);

    let response = server
        .post("/get_route")
        .json(&json!({"coordinates": [[8.68, 49.41], [8.69, 49.42]]}))
        .await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["steps"].as_array().unwrap().len(), 10);
    assert_eq!(json["steps"][9], "step_9");
}

#[tokio::test]
async fn test_route_needs_two_coordinates() {
    let server = create_test_server(StubUpstream::new(Outcome::Ok));

    let response = server
        .post("/get_route")
        .json(&json!({"coordinates": [[8.68, 49.41]]}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_route_not_found() {
    let server = create_test_server(StubUpstream::new(Outcome::NotFound));

    let response = server
        .post("/get_route")
        .json(&json!({"coordinates": [[8.68, 49.41], [8.69, 49.42]]}))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_route_without_api_key() {
    let server = create_test_server(StubUpstream::new(Outcome::Unconfigured));

    let response = server
        .post("/get_route")
        .json(&json!({"coordinates": [[8.68, 49.41], [8.69, 49.42]]}))
        .await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let json: Value = response.json();
    assert_eq!(json["error"], "ORS API key not configured");
}

#[tokio::test]
async fn test_route_unrepresentable_duration() {
    let mut upstream = StubUpstream::new(Outcome::Ok);
    upstream.duration_s = 1e13;
    let server = create_test_server(upstream);

    let response = server
        .post("/get_route")
        .json(&json!({"coordinates": [[8.68, 49.41], [8.69, 49.42]]}))
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let json: Value = response.json();
    assert!(json["error"].as_str().unwrap().contains("ORS"));
}

#[tokio::test]
async fn test_search_mountains_top_three() {
    let server = create_test_server(StubUpstream::new(Outcome::Ok));

    let response = server
        .post("/search_mountains")
        .json(&json!({"lat": 46.5, "lon": 8.0}))
        .await;

    response.assert_status_ok();
    let json: Value = response.json();
    let names: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["peak_0", "peak_1", "peak_2"]);
}

#[tokio::test]
async fn test_search_mountains_fewer_than_three() {
    let mut upstream = StubUpstream::new(Outcome::Ok);
    upstream.peak_count = 2;
    let server = create_test_server(upstream);

    let response = server
        .post("/search_mountains")
        .json(&json!({"lat": 46.5, "lon": 8.0, "radius_m": 1000}))
        .await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_search_mountains_upstream_failure() {
    let server = create_test_server(StubUpstream::new(Outcome::Failing));

    let response = server
        .post("/search_mountains")
        .json(&json!({"lat": 46.5, "lon": 8.0}))
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_openapi_document() {
    let app = app(create_state(StubUpstream::new(Outcome::Ok)));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api-docs/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let doc: Value = serde_json::from_slice(&bytes).unwrap();

    for (path, operation_id) in [
        ("/geocode_location", "geocode_location"),
        ("/get_route", "get_route"),
        ("/search_mountains", "search_mountains"),
        ("/get_ev_chargers", "get_ev_chargers"),
    ] {
        assert_eq!(doc["paths"][path]["post"]["operationId"], operation_id);
    }
}

#[tokio::test]
async fn test_dataset_loaded_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ev_chargers.json");
    fs::write(&path, CHARGERS).unwrap();

    let state = Arc::new(AppState {
        dataset: ChargerDataset::load(&path).unwrap(),
        upstream: Box::new(StubUpstream::new(Outcome::Ok)),
    });
    let server = TestServer::new(app(state)).unwrap();

    let response = server
        .post("/get_ev_chargers")
        .json(&json!({"lat": 37.1, "lon": -122.1, "radius_km": 1.0}))
        .await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json[0]["name"], "B");
    assert_eq!(json[0]["status"], "busy");
}
