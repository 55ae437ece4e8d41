//! # Wayfinder - Route Planning Helpers
//!
//! Building blocks for a small route-planning API: EV charger proximity
//! search over a static dataset, plus thin adapters for geocoding, driving
//! directions and mountain peak search.
//!
//! ## Features
//!
//! - **Offline charger search**: haversine radius search over an in-memory dataset
//! - **Compressed datasets**: `.json`, `.json.gz` and `.zip` files load the same way
//! - **Bounded responses**: route steps and peak lists are truncated predictably
//! - **Upstream adapters** (`upstream` feature): Nominatim, OpenRouteService, Overpass
//! - **GeoJSON export** (`geojson` feature)
//!
//! ## Quick Start
//!
//! ```ignore
//! use wayfinder::{find_nearby, ChargerDataset, GeoPoint};
//!
//! let dataset = ChargerDataset::load("ev_chargers.json")?;
//! let nearby = find_nearby(&dataset, GeoPoint::new(37.7749, -122.4194), 50.0);
//! for charger in &nearby {
//!     println!("{} ({}) - {} km", charger.name, charger.status, charger.distance_km);
//! }
//! ```
//!
//! ## Dataset Format
//!
//! A JSON array of sites, every field optional:
//!
//! ```json
//! [{"name": "Supercharger", "status": "available", "gps": {"latitude": 37.0, "longitude": -122.0}}]
//! ```

pub mod dataset;
pub mod error;
pub mod geo;
pub mod proximity;
pub mod shape;

#[cfg(feature = "geojson")]
pub mod geojson;

#[cfg(feature = "upstream")]
pub mod upstream;

// Re-export main types at crate root for convenience
pub use dataset::{ChargerDataset, ChargerSite, DatasetStats};
pub use error::{Result, WayfinderError};
pub use geo::{haversine_km, GeoPoint};
pub use proximity::{find_nearby, nearest, ProximityResult};
