//! Geospatial primitives behind the Loofinder map.
//!
//! This crate provides:
//! - Haversine great-circle distance
//! - Anchor-relative proximity clustering of map points
//! - A memoizing cache for repeated clustering of the same viewport
//! - Location parsing for places-provider and PostGIS payloads
//! - Batch distance ranking with optional parallelism
//! - WASM bindings for browser usage
//!
//! # Example
//!
//! ```
//! use loofinder_geo::{cluster, GeoPoint, PointOfInterest};
//!
//! let points = vec![
//!     PointOfInterest::new("a", GeoPoint::new(42.6977, 23.3219), ()),
//!     PointOfInterest::new("b", GeoPoint::new(42.6980, 23.3222), ()),
//!     PointOfInterest::new("c", GeoPoint::new(42.7500, 23.4000), ()),
//! ];
//!
//! let results = cluster(&points, 0.5);
//! assert_eq!(results.len(), 2);
//! assert!(results[0].is_cluster());
//! assert_eq!(results[0].count(), 2);
//! ```

mod haversine;
mod location;
mod error;
pub mod batch;
pub mod cluster;
pub mod memo;

#[cfg(feature = "wasm")]
mod wasm;

pub use haversine::{haversine_distance, haversine_distance_meters, EARTH_RADIUS_KM, EARTH_RADIUS_M};
pub use location::{parse_location, parse_wkt_point};
pub use batch::{compare_distance, distances_from, sort_by_distance, within_radius, DistanceResult};
pub use cluster::{cluster, ClusterResult};
pub use memo::ClusterCache;
pub use error::{GeoError, GeoErrorCode, Result};

/// A geographic coordinate with latitude and longitude.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180)
    pub longitude: f64,
}

impl GeoPoint {
    /// Creates a new point. Ranges are not enforced.
    #[inline]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Returns true if both components are finite and within range.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    #[inline]
    pub(crate) fn to_radians(self) -> (f64, f64) {
        (self.latitude.to_radians(), self.longitude.to_radians())
    }
}

impl From<(f64, f64)> for GeoPoint {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}

/// A point of interest handed to the clusterer.
///
/// `payload` is carried through untouched; nothing in this crate inspects it.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PointOfInterest<T> {
    /// Identifier, stable across calls
    pub id: String,
    /// Where the point is
    pub coordinates: GeoPoint,
    /// Caller data (name, rating, ...)
    pub payload: T,
}

impl<T> PointOfInterest<T> {
    /// Creates a new point of interest.
    pub fn new(id: impl Into<String>, coordinates: GeoPoint, payload: T) -> Self {
        Self {
            id: id.into(),
            coordinates,
            payload,
        }
    }
}
