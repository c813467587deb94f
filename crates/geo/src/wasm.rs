//! WASM bindings for the geo crate.
//!
//! These bindings let the Expo web build call the proximity filter directly
//! with the JSON it already holds.

use crate::{distance_km, filter_within, sort_by_distance, Coordinate, Located};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

/// Record shape accepted from JavaScript.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct JsRecord {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    latitude: Option<f64>,
    #[serde(default)]
    longitude: Option<f64>,
}

impl Located for JsRecord {
    fn position(&self) -> Option<Coordinate> {
        Some(Coordinate::new(self.latitude?, self.longitude?))
    }
}

/// Calculate distance between two coordinates in kilometers.
#[wasm_bindgen]
pub fn distance(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> Result<f64, JsValue> {
    distance_km(&Coordinate::new(lat1, lng1), &Coordinate::new(lat2, lng2))
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Filter legends within a radius.
///
/// # Arguments
/// * `ref_lat` - Reference latitude
/// * `ref_lng` - Reference longitude
/// * `records_json` - JSON array of `{id, title, category, latitude?, longitude?}`
/// * `radius_km` - Maximum distance in kilometers
/// * `nearest_first` - Sort the result by distance
///
/// # Returns
/// JSON array of `{record, distanceKm}`
#[wasm_bindgen]
pub fn filter_within_radius(
    ref_lat: f64,
    ref_lng: f64,
    records_json: &str,
    radius_km: f64,
    nearest_first: bool,
) -> Result<String, JsValue> {
    let records: Vec<JsRecord> = serde_json::from_str(records_json)
        .map_err(|e| JsValue::from_str(&format!("JSON parse error: {}", e)))?;

    let mut results = filter_within(&Coordinate::new(ref_lat, ref_lng), &records, radius_km)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    if nearest_first {
        sort_by_distance(&mut results);
    }

    serde_json::to_string(&results)
        .map_err(|e| JsValue::from_str(&format!("JSON serialize error: {}", e)))
}
