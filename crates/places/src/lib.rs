//! Restroom records for the Loofinder map.
//!
//! This crate provides:
//! - The [`Restroom`] payload carried by every map point
//! - Normalization of places-provider and store records into clusterable points
//! - Client-side filtering and ranking of the in-memory list

mod error;
mod filter;
mod normalize;
mod restroom;

pub use error::{PlacesError, PlacesErrorCode, Result};
pub use filter::{nearest, rank, Ranked, RestroomFilter, SortOrder};
pub use normalize::{normalize_json, normalize_places, Normalized, Rejected};
pub use restroom::{Amenity, Restroom};

/// A restroom positioned on the map.
pub type RestroomPoint = loofinder_geo::PointOfInterest<Restroom>;

/// Used when the location provider has nothing: Sofia city center.
pub const FALLBACK_LOCATION: loofinder_geo::GeoPoint = loofinder_geo::GeoPoint::new(42.6977, 23.3219);
