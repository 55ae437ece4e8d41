//! Radius search over the charger dataset.

use serde::Serialize;

use crate::dataset::{ChargerDataset, ChargerSite};
use crate::geo::{haversine_km, round_to, GeoPoint};

/// A charging site annotated with its distance from a query point.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ProximityResult {
    /// Site name.
    pub name: String,
    /// Site latitude.
    pub lat: f64,
    /// Site longitude.
    pub lon: f64,
    /// Great-circle distance from the query point, rounded to 2 decimals.
    pub distance_km: f64,
    /// Site availability label.
    pub status: String,
}

impl ProximityResult {
    fn new(site: &ChargerSite, position: GeoPoint, distance: f64) -> Self {
        Self {
            name: site.name.clone(),
            lat: position.lat,
            lon: position.lon,
            distance_km: round_to(distance, 2),
            status: site.status.clone(),
        }
    }
}

/// Find every located site within `radius_km` of `query`, closest first.
///
/// The radius is inclusive and compared against the unrounded distance.
/// Sites without coordinates are skipped. Equal distances keep dataset order.
///
/// A non-positive or non-finite radius, or a query point outside the valid
/// latitude/longitude ranges, matches nothing.
///
/// # Example
///
/// ```
/// use wayfinder::{find_nearby, ChargerDataset, ChargerSite, GeoPoint};
///
/// let dataset = ChargerDataset::from_sites(vec![
///     ChargerSite::new("A", GeoPoint::new(37.0, -122.0), "available"),
///     ChargerSite::new("B", GeoPoint::new(37.1, -122.1), "busy"),
/// ]);
///
/// let results = find_nearby(&dataset, GeoPoint::new(37.0, -122.0), 5.0);
/// assert_eq!(results.len(), 1);
/// assert_eq!(results[0].name, "A");
/// ```
pub fn find_nearby(
    dataset: &ChargerDataset,
    query: GeoPoint,
    radius_km: f64,
) -> Vec<ProximityResult> {
    if !query.is_valid() || !radius_km.is_finite() || radius_km <= 0.0 {
        tracing::debug!(
            lat = query.lat,
            lon = query.lon,
            radius_km = radius_km,
            "Query matches nothing"
        );
        return Vec::new();
    }

    let mut results: Vec<ProximityResult> = dataset
        .iter()
        .filter_map(|site| {
            let position = site.position?;
            let distance = haversine_km(query, position);
            (distance <= radius_km).then(|| ProximityResult::new(site, position, distance))
        })
        .collect();

    // Stable, so ties keep dataset order
    results.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    results
}

/// Find the single closest located site, regardless of distance.
///
/// Returns `None` if the dataset has no located sites or the query point is invalid.
pub fn nearest(dataset: &ChargerDataset, query: GeoPoint) -> Option<ProximityResult> {
    if !query.is_valid() {
        return None;
    }

    dataset
        .iter()
        .filter_map(|site| {
            let position = site.position?;
            Some((site, position, haversine_km(query, position)))
        })
        // min_by keeps the first of equal elements
        .min_by(|a, b| a.2.total_cmp(&b.2))
        .map(|(site, position, distance)| ProximityResult::new(site, position, distance))
}
