//! WASM bindings for the geo crate.
//!
//! Lets the web map cluster markers and measure distances in the browser.

use crate::{cluster, haversine_distance, GeoPoint, PointOfInterest};
use wasm_bindgen::prelude::*;

/// Distance in kilometers between two coordinates.
#[wasm_bindgen]
pub fn distance(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    haversine_distance(&GeoPoint::new(lat1, lng1), &GeoPoint::new(lat2, lng2))
}

/// Cluster map points.
///
/// # Arguments
/// * `points_json` - JSON array of `{id, coordinates: {latitude, longitude}, payload}`
/// * `radius_km` - Clustering radius in kilometers
///
/// # Returns
/// JSON array of cluster/singleton entries; payloads are passed through as-is
#[wasm_bindgen(js_name = clusterPoints)]
pub fn cluster_points(points_json: &str, radius_km: f64) -> Result<String, JsValue> {
    let points: Vec<PointOfInterest<serde_json::Value>> = serde_json::from_str(points_json)
        .map_err(|e| JsValue::from_str(&format!("JSON parse error: {}", e)))?;

    let results = cluster(&points, radius_km);

    serde_json::to_string(&results)
        .map_err(|e| JsValue::from_str(&format!("JSON serialize error: {}", e)))
}

/// Parse a location payload and return `{latitude, longitude}`, or `null`.
#[wasm_bindgen(js_name = parseLocation)]
pub fn parse_location(location_json: &str) -> Result<String, JsValue> {
    let value: serde_json::Value = serde_json::from_str(location_json)
        .map_err(|e| JsValue::from_str(&format!("JSON parse error: {}", e)))?;

    match crate::parse_location(&value) {
        Some(point) => serde_json::to_string(&point)
            .map_err(|e| JsValue::from_str(&format!("JSON serialize error: {}", e))),
        None => Ok("null".to_string()),
    }
}
