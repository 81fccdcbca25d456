//! Great-circle distance on a spherical Earth.

use crate::GeoPoint;

/// Earth's mean radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Earth's mean radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Calculates the great-circle distance between two points in kilometers.
///
/// Inputs are not range-checked. Out-of-range coordinates still produce a
/// finite number, it just means nothing.
///
/// # Example
/// ```
/// use loofinder_geo::{haversine_distance, GeoPoint};
///
/// let sofia = GeoPoint::new(42.6977, 23.3219);
/// let plovdiv = GeoPoint::new(42.1354, 24.7453);
///
/// let distance = haversine_distance(&sofia, &plovdiv);
/// assert!((distance - 132.0).abs() < 5.0);
/// ```
#[inline]
pub fn haversine_distance(from: &GeoPoint, to: &GeoPoint) -> f64 {
    haversine_distance_with_radius(from, to, EARTH_RADIUS_KM)
}

/// Calculates the great-circle distance between two points in meters.
#[inline]
pub fn haversine_distance_meters(from: &GeoPoint, to: &GeoPoint) -> f64 {
    haversine_distance_with_radius(from, to, EARTH_RADIUS_M)
}

#[inline]
fn haversine_distance_with_radius(from: &GeoPoint, to: &GeoPoint, radius: f64) -> f64 {
    let (lat1, _) = from.to_radians();
    let (lat2, _) = to.to_radians();

    let d_lat = (to.latitude - from.latitude).to_radians();
    let d_lon = (to.longitude - from.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);

    // Rounding can push h a hair past 1.0 for antipodal points.
    let h = h.clamp(0.0, 1.0);

    2.0 * radius * h.sqrt().atan2((1.0 - h).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOFIA: GeoPoint = GeoPoint { latitude: 42.6977, longitude: 23.3219 };
    const SOFIA_NEAR: GeoPoint = GeoPoint { latitude: 42.6980, longitude: 23.3222 };
    const BERLIN: GeoPoint = GeoPoint { latitude: 52.5200, longitude: 13.4050 };
    const PARIS: GeoPoint = GeoPoint { latitude: 48.8566, longitude: 2.3522 };
    const NEW_YORK: GeoPoint = GeoPoint { latitude: 40.7128, longitude: -74.0060 };
    const TOKYO: GeoPoint = GeoPoint { latitude: 35.6762, longitude: 139.6503 };

    #[test]
    fn test_berlin_to_paris() {
        let distance = haversine_distance(&BERLIN, &PARIS);
        assert!((distance - 878.0).abs() < 5.0, "Berlin-Paris: {}", distance);
    }

    #[test]
    fn test_new_york_to_tokyo() {
        let distance = haversine_distance(&NEW_YORK, &TOKYO);
        assert!((distance - 10838.0).abs() < 50.0, "NYC-Tokyo: {}", distance);
    }

    #[test]
    fn test_short_hop_in_sofia() {
        // ~41 m between two points three ten-thousandths of a degree apart
        let meters = haversine_distance_meters(&SOFIA, &SOFIA_NEAR);
        assert!(meters > 30.0 && meters < 50.0, "Sofia hop: {}", meters);
    }

    #[test]
    fn test_same_point_zero_distance() {
        assert_eq!(haversine_distance(&SOFIA, &SOFIA), 0.0);
        assert_eq!(haversine_distance(&TOKYO, &TOKYO), 0.0);
    }

    #[test]
    fn test_symmetry() {
        let d1 = haversine_distance(&BERLIN, &TOKYO);
        let d2 = haversine_distance(&TOKYO, &BERLIN);
        assert!((d1 - d2).abs() < 1e-9);
    }

    #[test]
    fn test_meters_conversion() {
        let km = haversine_distance(&BERLIN, &PARIS);
        let meters = haversine_distance_meters(&BERLIN, &PARIS);
        assert!((meters - km * 1000.0).abs() < 1e-6);
    }

    #[test]
    fn test_antipodal_points_are_finite() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 180.0);
        let distance = haversine_distance(&a, &b);
        assert!((distance - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn test_out_of_range_input_is_not_rejected() {
        let distance = haversine_distance(&GeoPoint::new(95.0, 200.0), &SOFIA);
        assert!(distance.is_finite());
        assert!(distance >= 0.0);
    }
}
