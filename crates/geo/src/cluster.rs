//! Proximity clustering of map points.
//!
//! Grouping is anchor-relative: points are visited in input order, and each
//! point that has not been claimed yet becomes an anchor that pulls in every
//! other unclaimed point strictly closer than the radius. Membership is
//! decided against the anchor only, so a cluster's diameter can reach twice
//! the radius, and the grouping depends on input order.
//!
//! Each call starts from scratch. Nothing carries over between calls.

use crate::{haversine_distance, GeoPoint, PointOfInterest};
use serde::{Deserialize, Serialize};

/// One entry of a clustering pass: either a group of nearby points or a
/// point that had no neighbour within the radius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClusterResult<T> {
    /// Two or more points, anchor first, the rest in input order.
    Cluster {
        /// Members, anchor first
        members: Vec<PointOfInterest<T>>,
        /// Coordinate-wise arithmetic mean of the members
        centroid: GeoPoint,
        /// Number of members
        count: usize,
    },
    /// A point with no unclaimed neighbour within the radius.
    Singleton {
        /// The point itself
        member: PointOfInterest<T>,
        /// Copy of the point's coordinates
        coordinates: GeoPoint,
    },
}

impl<T> ClusterResult<T> {
    /// Returns true for a multi-point cluster.
    #[inline]
    pub fn is_cluster(&self) -> bool {
        matches!(self, ClusterResult::Cluster { .. })
    }

    /// Number of input points this entry covers.
    #[inline]
    pub fn count(&self) -> usize {
        match self {
            ClusterResult::Cluster { count, .. } => *count,
            ClusterResult::Singleton { .. } => 1,
        }
    }

    /// Where the marker goes: the centroid for clusters, the point itself otherwise.
    #[inline]
    pub fn coordinates(&self) -> GeoPoint {
        match self {
            ClusterResult::Cluster { centroid, .. } => *centroid,
            ClusterResult::Singleton { coordinates, .. } => *coordinates,
        }
    }

    /// Iterates over the points covered by this entry.
    pub fn members(&self) -> impl Iterator<Item = &PointOfInterest<T>> {
        let (many, one) = match self {
            ClusterResult::Cluster { members, .. } => (members.as_slice(), None),
            ClusterResult::Singleton { member, .. } => (&[][..], Some(member)),
        };
        many.iter().chain(one)
    }
}

/// Partitions `points` into clusters and singletons.
///
/// Every input point appears in exactly one output entry. Output entries are
/// ordered by the position of their anchor in `points`. A non-positive
/// `radius_km` yields one singleton per point, since no distance is strictly
/// below it.
///
/// The scan is O(n²) in the number of points, which is fine for the tens to
/// low hundreds of markers visible on a map.
///
/// # Example
/// ```
/// use loofinder_geo::{cluster, GeoPoint, PointOfInterest};
///
/// let points = vec![
///     PointOfInterest::new("a", GeoPoint::new(42.6977, 23.3219), "Central"),
///     PointOfInterest::new("b", GeoPoint::new(42.6980, 23.3222), "Market"),
/// ];
/// let results = cluster(&points, 0.5);
/// assert_eq!(results.len(), 1);
/// assert_eq!(results[0].count(), 2);
/// ```
#[must_use]
pub fn cluster<T: Clone>(points: &[PointOfInterest<T>], radius_km: f64) -> Vec<ClusterResult<T>> {
    let mut processed = vec![false; points.len()];
    let mut results = Vec::new();

    for (anchor_idx, anchor) in points.iter().enumerate() {
        if processed[anchor_idx] {
            continue;
        }
        processed[anchor_idx] = true;

        // Everything before the anchor is already processed.
        let nearby: Vec<usize> = (anchor_idx + 1..points.len())
            .filter(|&idx| {
                !processed[idx]
                    && haversine_distance(&anchor.coordinates, &points[idx].coordinates) < radius_km
            })
            .collect();

        if nearby.is_empty() {
            results.push(ClusterResult::Singleton {
                member: anchor.clone(),
                coordinates: anchor.coordinates,
            });
            continue;
        }

        let mut members = Vec::with_capacity(nearby.len() + 1);
        members.push(anchor.clone());
        for idx in nearby {
            processed[idx] = true;
            members.push(points[idx].clone());
        }

        let centroid = centroid(&members);
        let count = members.len();
        results.push(ClusterResult::Cluster {
            members,
            centroid,
            count,
        });
    }

    tracing::debug!(
        points = points.len(),
        radius_km,
        groups = results.len(),
        clusters = results.iter().filter(|r| r.is_cluster()).count(),
        "Clustered points"
    );

    results
}

/// Arithmetic mean of latitudes and longitudes, taken independently.
///
/// Not a spherical centroid; clusters straddling the antimeridian land on
/// the wrong side of the globe.
fn centroid<T>(members: &[PointOfInterest<T>]) -> GeoPoint {
    let n = members.len() as f64;
    let (lat_sum, lng_sum) = members.iter().fold((0.0, 0.0), |(lat, lng), p| {
        (lat + p.coordinates.latitude, lng + p.coordinates.longitude)
    });
    GeoPoint::new(lat_sum / n, lng_sum / n)
}
