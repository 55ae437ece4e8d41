//! GeoJSON export of search results.
//!
//! Enable the `geojson` feature to use this module. Each result becomes a
//! `Point` feature whose properties carry the remaining fields, so the output
//! can be dropped straight onto a map.
//!
//! # Example
//!
//! ```ignore
//! use wayfinder::{find_nearby, ChargerDataset, GeoPoint};
//! use wayfinder::geojson::chargers_to_feature_collection;
//!
//! let dataset = ChargerDataset::load("ev_chargers.json")?;
//! let results = find_nearby(&dataset, GeoPoint::new(37.7749, -122.4194), 25.0);
//! println!("{}", chargers_to_feature_collection(&results));
//! ```

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value as GeoJsonValue};
use serde_json::Value;

use crate::proximity::ProximityResult;

#[cfg(feature = "upstream")]
use crate::upstream::Peak;

/// Build a `Point` feature at `(lat, lon)` with the given properties.
///
/// GeoJSON positions are `[longitude, latitude]`.
pub fn point_feature(lat: f64, lon: f64, properties: JsonObject) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(GeoJsonValue::Point(vec![lon, lat]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Convert charger search results to a feature collection, keeping their order.
pub fn chargers_to_feature_collection(results: &[ProximityResult]) -> FeatureCollection {
    let features = results
        .iter()
        .map(|r| {
            let mut properties = JsonObject::new();
            properties.insert("name".to_string(), Value::from(r.name.clone()));
            properties.insert("distance_km".to_string(), Value::from(r.distance_km));
            properties.insert("status".to_string(), Value::from(r.status.clone()));
            point_feature(r.lat, r.lon, properties)
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// Convert peaks to a feature collection, keeping their order.
#[cfg(feature = "upstream")]
pub fn peaks_to_feature_collection(peaks: &[Peak]) -> FeatureCollection {
    let features = peaks
        .iter()
        .map(|p| {
            let mut properties = JsonObject::new();
            properties.insert("name".to_string(), Value::from(p.name.clone()));
            point_feature(p.lat, p.lon, properties)
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}
