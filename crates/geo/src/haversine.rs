//! Haversine distance calculation.
//!
//! The Haversine formula calculates the great-circle distance between two points
//! on a sphere given their longitudes and latitudes.

use crate::{Coordinate, Result};

/// Earth's mean radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Earth's mean radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Calculates the great-circle distance between two coordinates in kilometers.
///
/// Fails with [`GeoError::InvalidCoordinate`](crate::GeoError::InvalidCoordinate)
/// when any component of either coordinate is NaN or infinite. Ranges are not
/// checked; the caller owns the coordinate domain.
///
/// # Example
/// ```
/// use legends_geo::{distance_km, Coordinate};
///
/// let ankara = Coordinate::new(39.9334, 32.8597);
/// let istanbul = Coordinate::new(41.0082, 28.9784);
///
/// let distance = distance_km(&ankara, &istanbul).unwrap();
/// assert!((distance - 350.0).abs() < 10.0);
/// ```
pub fn distance_km(from: &Coordinate, to: &Coordinate) -> Result<f64> {
    from.ensure_finite()?;
    to.ensure_finite()?;
    Ok(haversine_distance(from, to))
}

/// Calculates the great-circle distance between two coordinates in meters.
pub fn distance_meters(from: &Coordinate, to: &Coordinate) -> Result<f64> {
    from.ensure_finite()?;
    to.ensure_finite()?;
    Ok(haversine_distance_with_radius(from, to, EARTH_RADIUS_M))
}

/// Unchecked kernel behind [`distance_km`].
///
/// Returns NaN for non-finite input; prefer [`distance_km`] unless the
/// coordinates were already validated.
#[inline]
pub fn haversine_distance(from: &Coordinate, to: &Coordinate) -> f64 {
    haversine_distance_with_radius(from, to, EARTH_RADIUS_KM)
}

#[inline]
fn haversine_distance_with_radius(from: &Coordinate, to: &Coordinate, radius: f64) -> f64 {
    let (lat1, lon1) = from.to_radians();
    let (lat2, lon2) = to.to_radians();

    let d_lat = lat2 - lat1;
    let d_lon = lon2 - lon1;

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);

    // Rounding can push `a` a hair past 1.0 for antipodal points.
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    radius * c
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GeoError;
    use proptest::prelude::*;

    const MELBOURNE_CBD: Coordinate = Coordinate { latitude: -37.8136, longitude: 144.9631 };
    const FALLBACK: Coordinate = Coordinate { latitude: -37.81, longitude: 144.96 };
    const ANKARA: Coordinate = Coordinate { latitude: 39.9334, longitude: 32.8597 };
    const STAVANGER: Coordinate = Coordinate { latitude: 58.9700, longitude: 5.7331 };

    #[test]
    fn test_melbourne_to_fallback() {
        let distance = distance_km(&MELBOURNE_CBD, &FALLBACK).unwrap();
        assert!(distance > 0.0);
        assert!((distance - 0.47).abs() < 0.05, "Melbourne-fallback: {}", distance);
    }

    #[test]
    fn test_ankara_to_stavanger() {
        let distance = distance_km(&ANKARA, &STAVANGER).unwrap();
        // Expected: ~2,847 km
        assert!((distance - 2847.0).abs() < 10.0, "Ankara-Stavanger: {}", distance);
    }

    #[test]
    fn test_same_point_zero_distance() {
        assert_eq!(distance_km(&ANKARA, &ANKARA).unwrap(), 0.0);
    }

    #[test]
    fn test_antipodes_bounded() {
        let north = Coordinate::new(90.0, 0.0);
        let south = Coordinate::new(-90.0, 0.0);
        let distance = distance_km(&north, &south).unwrap();
        assert!((distance - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn test_meters_conversion() {
        let km = distance_km(&ANKARA, &STAVANGER).unwrap();
        let meters = distance_meters(&ANKARA, &STAVANGER).unwrap();
        assert!((meters - km * 1000.0).abs() < 1.0);
    }

    #[test]
    fn test_nan_is_rejected() {
        let bad = Coordinate::new(f64::NAN, 144.96);
        assert!(matches!(
            distance_km(&bad, &FALLBACK),
            Err(GeoError::InvalidCoordinate(_))
        ));
        assert!(matches!(
            distance_km(&FALLBACK, &Coordinate::new(0.0, f64::NEG_INFINITY)),
            Err(GeoError::InvalidCoordinate(_))
        ));
    }

    fn coordinate() -> impl Strategy<Value = Coordinate> {
        (-90.0f64..=90.0, -180.0f64..=180.0).prop_map(|(lat, lng)| Coordinate::new(lat, lng))
    }

    proptest! {
        #[test]
        fn prop_identity_is_zero(p in coordinate()) {
            prop_assert_eq!(distance_km(&p, &p).unwrap(), 0.0);
        }

        #[test]
        fn prop_symmetric(a in coordinate(), b in coordinate()) {
            let ab = distance_km(&a, &b).unwrap();
            let ba = distance_km(&b, &a).unwrap();
            prop_assert!((ab - ba).abs() < 1e-9);
        }

        #[test]
        fn prop_bounded_by_half_circumference(a in coordinate(), b in coordinate()) {
            let d = distance_km(&a, &b).unwrap();
            prop_assert!(d >= 0.0);
            prop_assert!(d <= std::f64::consts::PI * EARTH_RADIUS_KM + 1e-9);
        }
    }
}
