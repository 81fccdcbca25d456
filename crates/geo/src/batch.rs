//! Batch distance calculations with optional parallelism.
//!
//! Used for the "near me" list: one origin, many points.

use crate::{haversine_distance, GeoPoint, PointOfInterest};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Distance from the origin to a single point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceResult {
    /// The point ID
    pub id: String,
    /// Input position of the point
    pub index: usize,
    /// Distance in kilometers
    pub distance_km: f64,
}

/// Calculate distances from `origin` to every point, in input order.
///
/// # Example
/// ```
/// use loofinder_geo::{distances_from, GeoPoint, PointOfInterest};
///
/// let points = vec![
///     PointOfInterest::new("a", GeoPoint::new(42.6977, 23.3219), ()),
///     PointOfInterest::new("b", GeoPoint::new(42.7500, 23.4000), ()),
/// ];
///
/// let results = distances_from(&GeoPoint::new(42.6977, 23.3219), &points);
/// assert_eq!(results.len(), 2);
/// assert_eq!(results[0].distance_km, 0.0);
/// ```
pub fn distances_from<T: Sync>(origin: &GeoPoint, points: &[PointOfInterest<T>]) -> Vec<DistanceResult> {
    let measure = |(index, point): (usize, &PointOfInterest<T>)| DistanceResult {
        id: point.id.clone(),
        index,
        distance_km: haversine_distance(origin, &point.coordinates),
    };

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        points.par_iter().enumerate().map(measure).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        points.iter().enumerate().map(measure).collect()
    }
}

/// Points within `radius_km` of `origin` (inclusive), closest first.
///
/// Equal distances keep their input order.
pub fn within_radius<T: Sync>(
    origin: &GeoPoint,
    points: &[PointOfInterest<T>],
    radius_km: f64,
) -> Vec<DistanceResult> {
    let mut results = distances_from(origin, points);
    results.retain(|r| r.distance_km <= radius_km);
    sort_by_distance(&mut results);
    results
}

/// Sorts closest first; NaN distances go last.
pub fn sort_by_distance(results: &mut [DistanceResult]) {
    results.sort_by(|a, b| compare_distance(a.distance_km, b.distance_km));
}

/// Total order on distances: ascending, NaN last.
pub fn compare_distance(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_points() -> Vec<PointOfInterest<()>> {
        vec![
            // Sofia center
            PointOfInterest::new("center", GeoPoint::new(42.6977, 23.3219), ()),
            // ~7 km north-east
            PointOfInterest::new("mladost", GeoPoint::new(42.7500, 23.4000), ()),
            // Plovdiv
            PointOfInterest::new("plovdiv", GeoPoint::new(42.1354, 24.7453), ()),
            // ~40 m from center
            PointOfInterest::new("market", GeoPoint::new(42.6980, 23.3222), ()),
        ]
    }

    #[test]
    fn test_batch_distances_keep_input_order() {
        let points = create_test_points();
        let origin = GeoPoint::new(42.6977, 23.3219);
        let results = distances_from(&origin, &points);

        assert_eq!(results.len(), 4);
        let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["center", "mladost", "plovdiv", "market"]);
        assert_eq!(results[0].distance_km, 0.0);
        assert!(results[2].distance_km > 100.0);
    }

    #[test]
    fn test_radius_filter_sorted() {
        let points = create_test_points();
        let origin = GeoPoint::new(42.6977, 23.3219);
        let results = within_radius(&origin, &points, 10.0);

        let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["center", "market", "mladost"]);
        assert!(results.iter().all(|r| r.distance_km <= 10.0));
    }

    #[test]
    fn test_compare_distance_is_total_with_nan() {
        assert_eq!(compare_distance(f64::NAN, 1.0), Ordering::Greater);
        assert_eq!(compare_distance(1.0, f64::NAN), Ordering::Less);
        assert_eq!(compare_distance(f64::NAN, f64::NAN), Ordering::Equal);
        assert_eq!(compare_distance(f64::INFINITY, f64::NAN), Ordering::Less);
    }

    #[test]
    fn test_nan_distances_in_large_batch() {
        // Past the small-sort cutoff, an inconsistent comparator panics.
        let points: Vec<PointOfInterest<()>> = (0..40)
            .map(|i| {
                let lat = if i % 13 == 0 { f64::NAN } else { 42.6 + i as f64 * 0.001 };
                PointOfInterest::new(format!("wc-{}", i), GeoPoint::new(lat, 23.3), ())
            })
            .collect();
        let mut results = distances_from(&GeoPoint::new(42.6, 23.3), &points);
        sort_by_distance(&mut results);

        assert_eq!(results.len(), 40);
        assert!(results[..36].iter().all(|r| !r.distance_km.is_nan()));
        assert!(results[36..].iter().all(|r| r.distance_km.is_nan()));
        assert_eq!(within_radius(&GeoPoint::new(42.6, 23.3), &points, 1000.0).len(), 36);
    }

    #[test]
    fn test_nan_sorts_last() {
        let mut results = vec![
            DistanceResult { id: "nan".into(), index: 0, distance_km: f64::NAN },
            DistanceResult { id: "far".into(), index: 1, distance_km: 5.0 },
            DistanceResult { id: "near".into(), index: 2, distance_km: 1.0 },
        ];
        sort_by_distance(&mut results);
        let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["near", "far", "nan"]);
    }
}
