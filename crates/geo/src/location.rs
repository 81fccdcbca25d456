//! Location parsing at the normalization boundary.
//!
//! Places-provider and store records carry their position in several
//! shapes. Everything is funnelled into a [`GeoPoint`] here, and anything
//! that is missing, non-numeric, non-finite or out of range is rejected
//! before it can reach the clusterer.
//!
//! Accepted shapes:
//! - `{"lat": 42.69, "lng": 23.32}` (also `latitude`/`longitude`, `lon`)
//! - `{"geometry": {"location": {...}}}` as returned by places search APIs
//! - GeoJSON: `{"type": "Point", "coordinates": [lng, lat]}`
//! - WKT / EWKT: `POINT(lng lat)`, `SRID=4326;POINT(lng lat)`

use crate::{GeoError, GeoPoint, Result};
use serde_json::Value;

const LATITUDE_KEYS: &[&str] = &["lat", "latitude"];
const LONGITUDE_KEYS: &[&str] = &["lng", "lon", "longitude"];
const NESTED_KEYS: &[&str] = &["location", "geometry", "coordinates"];

/// Parse a location from a JSON value.
///
/// # Returns
/// * `Some(GeoPoint)` for a well-formed, in-range position
/// * `None` otherwise
///
/// # Example
/// ```
/// use loofinder_geo::parse_location;
/// use serde_json::json;
///
/// let place = json!({"geometry": {"location": {"lat": 42.6977, "lng": 23.3219}}});
/// let point = parse_location(&place).unwrap();
/// assert!((point.latitude - 42.6977).abs() < 1e-9);
///
/// let stored = json!("POINT(23.3219 42.6977)");
/// assert_eq!(parse_location(&stored), Some(point));
///
/// assert!(parse_location(&json!({"lat": "north", "lng": 23.0})).is_none());
/// ```
pub fn parse_location(value: &Value) -> Option<GeoPoint> {
    let point = match value {
        Value::Object(map) => {
            if let Some(Value::Array(coords)) = map.get("coordinates") {
                geojson_coordinates(coords)
            } else if let (Some(lat), Some(lng)) = (lookup(map, LATITUDE_KEYS), lookup(map, LONGITUDE_KEYS)) {
                Some(GeoPoint::new(as_number(lat)?, as_number(lng)?))
            } else {
                NESTED_KEYS
                    .iter()
                    .filter_map(|key| map.get(*key))
                    .find_map(parse_location)
            }
        }
        Value::String(wkt) => parse_wkt_point(wkt).ok(),
        _ => None,
    }?;

    point.is_valid().then_some(point)
}

/// Parse a WKT `POINT(longitude latitude)` string.
///
/// An EWKT `SRID=...;` prefix is skipped.
///
/// # Errors
/// [`GeoError::InvalidWkt`] for anything that is not a two-number POINT,
/// [`GeoError::InvalidCoordinate`] for non-finite or out-of-range numbers.
pub fn parse_wkt_point(wkt: &str) -> Result<GeoPoint> {
    let wkt = wkt.trim();
    let wkt = match wkt.split_once(';') {
        Some((srid, rest)) if srid.trim_start().to_ascii_uppercase().starts_with("SRID=") => rest.trim(),
        _ => wkt,
    };

    let body = wkt
        .get(..5)
        .filter(|tag| tag.eq_ignore_ascii_case("POINT"))
        .map(|_| wkt[5..].trim_start())
        .ok_or_else(|| GeoError::InvalidWkt(format!("Expected POINT, got: {}", wkt)))?;

    let inner = body
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(|| GeoError::InvalidWkt(format!("Unbalanced parentheses: {}", wkt)))?;

    let parts: Vec<&str> = inner.split_whitespace().collect();
    if parts.len() != 2 {
        return Err(GeoError::InvalidWkt(format!(
            "Expected 2 coordinates, got {}",
            parts.len()
        )));
    }

    let lng: f64 = parts[0]
        .parse()
        .map_err(|_| GeoError::InvalidWkt(format!("Invalid longitude: {}", parts[0])))?;
    let lat: f64 = parts[1]
        .parse()
        .map_err(|_| GeoError::InvalidWkt(format!("Invalid latitude: {}", parts[1])))?;

    let point = GeoPoint::new(lat, lng);
    if !point.is_valid() {
        return Err(GeoError::InvalidCoordinate(format!("({}, {}) is out of range", lat, lng)));
    }
    Ok(point)
}

fn lookup<'a>(map: &'a serde_json::Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| map.get(*key))
}

/// GeoJSON order is `[lng, lat]`.
fn geojson_coordinates(coords: &[Value]) -> Option<GeoPoint> {
    match coords {
        [lng, lat, ..] => Some(GeoPoint::new(as_number(lat)?, as_number(lng)?)),
        _ => None,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_lat_lng_object() {
        let point = parse_location(&json!({"lat": 42.6977, "lng": 23.3219})).unwrap();
        assert!((point.latitude - 42.6977).abs() < 1e-9);
        assert!((point.longitude - 23.3219).abs() < 1e-9);
    }

    #[test]
    fn test_parse_long_key_names() {
        let point = parse_location(&json!({"latitude": 42.6977, "longitude": 23.3219})).unwrap();
        assert!((point.longitude - 23.3219).abs() < 1e-9);
    }

    #[test]
    fn test_parse_places_geometry() {
        let value = json!({"geometry": {"location": {"lat": 42.6977, "lng": 23.3219}}});
        assert!(parse_location(&value).is_some());
    }

    #[test]
    fn test_parse_numeric_strings() {
        let point = parse_location(&json!({"lat": "42.6977", "lng": " 23.3219 "})).unwrap();
        assert!((point.latitude - 42.6977).abs() < 1e-9);
    }

    #[test]
    fn test_parse_geojson_point() {
        let value = json!({"type": "Point", "coordinates": [23.3219, 42.6977]});
        let point = parse_location(&value).unwrap();
        assert!((point.latitude - 42.6977).abs() < 1e-9);
        assert!((point.longitude - 23.3219).abs() < 1e-9);
    }

    #[test]
    fn test_parse_wkt_variants() {
        for wkt in ["POINT(23.3219 42.6977)", "POINT (23.3219 42.6977)", "point(23.3219 42.6977)", "SRID=4326;POINT(23.3219 42.6977)"] {
            let point = parse_location(&json!(wkt)).unwrap_or_else(|| panic!("failed on {}", wkt));
            assert!((point.latitude - 42.6977).abs() < 1e-9, "{}", wkt);
        }
    }

    #[test]
    fn test_malformed_locations_are_rejected() {
        let rejected = [
            json!(null),
            json!({}),
            json!({"lat": 42.0}),
            json!({"lat": "north", "lng": 23.0}),
            json!({"lat": null, "lng": 23.0}),
            json!({"lat": 142.0, "lng": 23.0}),
            json!({"coordinates": [23.0]}),
            json!({"coordinates": ["x", 42.0]}),
            json!(42.0),
            json!("POINT(NaN 42)"),
        ];
        for value in rejected {
            assert!(parse_location(&value).is_none(), "accepted {}", value);
        }
    }

    #[test]
    fn test_wkt_errors() {
        assert!(matches!(parse_wkt_point("POLYGON((0 0, 1 1, 1 0, 0 0))"), Err(GeoError::InvalidWkt(_))));
        assert!(matches!(parse_wkt_point("POINT(1 2 3)"), Err(GeoError::InvalidWkt(_))));
        assert!(matches!(parse_wkt_point("POINT(1 2"), Err(GeoError::InvalidWkt(_))));
        assert!(matches!(parse_wkt_point("POINT(200 2)"), Err(GeoError::InvalidCoordinate(_))));
        assert!(matches!(parse_wkt_point("PO"), Err(GeoError::InvalidWkt(_))));
    }

    #[test]
    fn test_negative_coordinates() {
        let point = parse_wkt_point("POINT(-74.0060 40.7128)").unwrap();
        assert!((point.latitude - 40.7128).abs() < 1e-9);
        assert!((point.longitude - (-74.0060)).abs() < 1e-9);
    }
}
