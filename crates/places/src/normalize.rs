//! Normalization of raw records into map points.
//!
//! Places-provider results and rows from the restroom store arrive as loose
//! JSON. Records without an id, with a malformed location, or repeating an
//! id already seen are dropped here so the clusterer only ever sees
//! well-formed points.

use crate::{PlacesError, Restroom, RestroomPoint, Result};
use loofinder_geo::{parse_location, PointOfInterest};
use serde_json::{Map, Value};
use std::collections::{BTreeSet, HashSet};

const ID_KEYS: &[&str] = &["id", "place_id", "uuid"];
const NAME_KEYS: &[&str] = &["name", "title"];
const ADDRESS_KEYS: &[&str] = &["address", "formatted_address", "vicinity", "street"];
const RATING_KEYS: &[&str] = &["rating", "average_rating"];
const REVIEW_COUNT_KEYS: &[&str] = &["review_count", "user_ratings_total", "reviews_count"];

/// Boolean flags some providers use instead of an amenity list.
const AMENITY_FLAGS: &[(&str, crate::Amenity)] = &[
    ("accessible", crate::Amenity::WheelchairAccessible),
    ("wheelchair_accessible", crate::Amenity::WheelchairAccessible),
    ("changing_table", crate::Amenity::BabyChanging),
    ("unisex", crate::Amenity::GenderNeutral),
    ("free", crate::Amenity::Free),
    ("open_24h", crate::Amenity::Open24h),
];

const MAX_SCORE: f64 = 5.0;

/// A record that did not make it through normalization.
#[derive(Debug)]
pub struct Rejected {
    /// Position in the input batch
    pub index: usize,
    /// Why it was dropped
    pub reason: PlacesError,
}

/// Outcome of normalizing a batch.
#[derive(Debug, Default)]
pub struct Normalized {
    /// Accepted points, in input order
    pub points: Vec<RestroomPoint>,
    /// Dropped records
    pub rejected: Vec<Rejected>,
}

/// Normalize a batch of raw records.
///
/// # Example
/// ```
/// use loofinder_places::normalize_places;
/// use serde_json::json;
///
/// let raw = vec![
///     json!({"id": "wc-1", "name": "NDK", "lat": 42.6847, "lng": 23.3188, "rating": 4.2}),
///     json!({"id": "wc-2", "name": "Broken", "lat": "north", "lng": 23.3}),
/// ];
/// let normalized = normalize_places(&raw);
/// assert_eq!(normalized.points.len(), 1);
/// assert_eq!(normalized.rejected.len(), 1);
/// ```
pub fn normalize_places(records: &[Value]) -> Normalized {
    let mut seen = HashSet::new();
    let mut normalized = Normalized::default();

    for (index, record) in records.iter().enumerate() {
        match normalize_record(record).and_then(|point| {
            if seen.insert(point.id.clone()) {
                Ok(point)
            } else {
                Err(PlacesError::DuplicateId(point.id))
            }
        }) {
            Ok(point) => normalized.points.push(point),
            Err(reason) => {
                tracing::warn!(index, %reason, "Dropping restroom record");
                normalized.rejected.push(Rejected { index, reason });
            }
        }
    }

    tracing::debug!(
        accepted = normalized.points.len(),
        rejected = normalized.rejected.len(),
        "Normalized restroom records"
    );

    normalized
}

/// Parse a JSON array (or an object wrapping it under `results`/`data`) and normalize it.
///
/// # Errors
/// Returns an error if `json` is not valid JSON or holds no record array.
pub fn normalize_json(json: &str) -> Result<Normalized> {
    let value: Value = serde_json::from_str(json)?;
    let records = match &value {
        Value::Array(records) => records.as_slice(),
        Value::Object(map) => match ["results", "data"].iter().find_map(|k| map.get(*k)) {
            Some(Value::Array(records)) => records.as_slice(),
            _ => return Err(PlacesError::NotAnArray),
        },
        _ => return Err(PlacesError::NotAnArray),
    };
    Ok(normalize_places(records))
}

fn normalize_record(record: &Value) -> Result<RestroomPoint> {
    let map = record.as_object().ok_or(PlacesError::NotAnObject)?;

    let id = ID_KEYS
        .iter()
        .filter_map(|key| map.get(*key))
        .find_map(id_string)
        .ok_or(PlacesError::MissingId)?;

    let coordinates = parse_location(record).ok_or_else(|| PlacesError::InvalidLocation(id.clone()))?;

    let restroom = Restroom {
        name: string_field(map, NAME_KEYS).unwrap_or_else(|| "Public restroom".to_string()),
        address: string_field(map, ADDRESS_KEYS),
        rating: score_field(map, RATING_KEYS),
        cleanliness: score_field(map, &["cleanliness"]),
        category: string_field(map, &["category"]).or_else(|| first_type(map)),
        amenities: amenities(map),
        review_count: REVIEW_COUNT_KEYS
            .iter()
            .filter_map(|key| map.get(*key))
            .find_map(Value::as_u64)
            .map_or(0, |n| u32::try_from(n).unwrap_or(u32::MAX)),
    };

    Ok(PointOfInterest::new(id, coordinates, restroom))
}

fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn string_field(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| map.get(*key))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(String::from)
}

/// Scores outside 0..=5 are treated as unknown.
fn score_field(map: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter()
        .filter_map(|key| map.get(*key))
        .filter_map(Value::as_f64)
        .find(|score| (0.0..=MAX_SCORE).contains(score))
}

fn first_type(map: &Map<String, Value>) -> Option<String> {
    map.get("types")?.as_array()?.first()?.as_str().map(String::from)
}

fn amenities(map: &Map<String, Value>) -> BTreeSet<crate::Amenity> {
    let listed = map
        .get("amenities")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .filter_map(|name| name.parse::<crate::Amenity>().ok());

    let flagged = AMENITY_FLAGS
        .iter()
        .filter(|(key, _)| map.get(*key).and_then(Value::as_bool).unwrap_or(false))
        .map(|(_, amenity)| *amenity);

    listed.chain(flagged).collect()
}
