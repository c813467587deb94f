//! Geo-point normalization.
//!
//! Legend documents store their location in several shapes depending on which
//! client wrote them:
//! - plain object: `{"latitude": lat, "longitude": lng}`
//! - serialized SDK GeoPoint: `{"_lat": lat, "_long": lng}`
//! - Firestore REST typed value: `{"geoPointValue": {"latitude": lat, "longitude": lng}}`
//! - GeoJSON: `{"type": "Point", "coordinates": [lng, lat]}`
//!
//! Everything is folded into a [`Coordinate`] here so that nothing downstream
//! branches on the source shape.

use crate::Coordinate;
use serde_json::Value;

/// Parse a geo-point from a JSON value.
///
/// # Returns
/// * `Some(Coordinate)` for a recognised shape with finite, in-range values
/// * `None` for null, strings (place names), or anything malformed
///
/// # Example
/// ```
/// use legends_geo::parse_geo_point;
/// use serde_json::json;
///
/// let plain = json!({"latitude": -37.81, "longitude": 144.96});
/// let sdk = json!({"_lat": -37.81, "_long": 144.96});
///
/// assert_eq!(parse_geo_point(&plain), parse_geo_point(&sdk));
/// assert!(parse_geo_point(&json!("Flinders Street")).is_none());
/// ```
pub fn parse_geo_point(value: &Value) -> Option<Coordinate> {
    let object = value.as_object()?;

    if let Some(inner) = object.get("geoPointValue") {
        return parse_geo_point(inner);
    }

    let coord = if let Some(coords) = object.get("coordinates").and_then(Value::as_array) {
        // GeoJSON order is [lng, lat]
        if coords.len() < 2 {
            return None;
        }
        Coordinate::new(coords[1].as_f64()?, coords[0].as_f64()?)
    } else {
        let lat = object.get("latitude").or_else(|| object.get("_lat"))?;
        let lng = object.get("longitude").or_else(|| object.get("_long"))?;
        Coordinate::new(lat.as_f64()?, lng.as_f64()?)
    };

    coord.is_valid().then_some(coord)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_plain_object() {
        let coord = parse_geo_point(&json!({"latitude": 39.9334, "longitude": 32.8597})).unwrap();
        assert!((coord.latitude - 39.9334).abs() < 1e-9);
        assert!((coord.longitude - 32.8597).abs() < 1e-9);
    }

    #[test]
    fn test_parse_sdk_geopoint() {
        let coord = parse_geo_point(&json!({"_lat": -37.81, "_long": 144.96})).unwrap();
        assert_eq!(coord, Coordinate::new(-37.81, 144.96));
    }

    #[test]
    fn test_parse_firestore_typed_value() {
        let value = json!({"geoPointValue": {"latitude": 58.97, "longitude": 5.7331}});
        assert_eq!(parse_geo_point(&value), Some(Coordinate::new(58.97, 5.7331)));
    }

    #[test]
    fn test_parse_geojson() {
        let value = json!({"type": "Point", "coordinates": [144.96, -37.81]});
        assert_eq!(parse_geo_point(&value), Some(Coordinate::new(-37.81, 144.96)));
    }

    #[test]
    fn test_integer_components() {
        let coord = parse_geo_point(&json!({"latitude": 40, "longitude": 30})).unwrap();
        assert_eq!(coord, Coordinate::new(40.0, 30.0));
    }

    #[test]
    fn test_rejects_non_points() {
        assert!(parse_geo_point(&json!(null)).is_none());
        assert!(parse_geo_point(&json!("Old Melbourne Gaol")).is_none());
        assert!(parse_geo_point(&json!({"latitude": -37.81})).is_none());
        assert!(parse_geo_point(&json!({"latitude": "-37.81", "longitude": 144.96})).is_none());
        assert!(parse_geo_point(&json!({"coordinates": [144.96]})).is_none());
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(parse_geo_point(&json!({"latitude": 91.0, "longitude": 0.0})).is_none());
        assert!(parse_geo_point(&json!({"_lat": 0.0, "_long": -181.0})).is_none());
    }
}
