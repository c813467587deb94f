//! Proximity filtering for Local Legends.
//!
//! This crate provides:
//! - Haversine distance calculations with coordinate guards
//! - Radius filtering of located records, annotated with their distance
//! - Normalization of the geo-point shapes found in legend documents
//! - WASM bindings for the mobile/web client
//!
//! # Example
//!
//! ```
//! use legends_geo::{distance_km, Coordinate};
//!
//! let melbourne = Coordinate::new(-37.8136, 144.9631);
//! let fallback = Coordinate::new(-37.81, 144.96);
//!
//! let km = distance_km(&melbourne, &fallback).unwrap();
//! assert!((km - 0.47).abs() < 0.05);
//! ```

mod error;
mod geopoint;
mod haversine;
pub mod proximity;

#[cfg(feature = "wasm")]
mod wasm;

pub use error::{GeoError, GeoErrorCode, Result};
pub use geopoint::parse_geo_point;
pub use haversine::{
    distance_km, distance_meters, haversine_distance, EARTH_RADIUS_KM, EARTH_RADIUS_M,
};
pub use proximity::{
    filter_within, sort_by_distance, AnnotatedRecord, Located, DEFAULT_RADIUS_KM,
};

/// A geographic coordinate with latitude and longitude.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180)
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a new coordinate.
    ///
    /// No range check happens here; use [`Coordinate::is_valid`] when the
    /// values come from untrusted input.
    #[inline]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Returns true if both components lie on the Earth's surface ranges.
    #[inline]
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Returns true if neither component is NaN or infinite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }

    /// Fails with [`GeoError::InvalidCoordinate`] unless both components are finite.
    pub fn ensure_finite(&self) -> Result<()> {
        if self.is_finite() {
            Ok(())
        } else {
            Err(GeoError::InvalidCoordinate(format!(
                "({}, {}) is not finite",
                self.latitude, self.longitude
            )))
        }
    }

    #[inline]
    pub(crate) fn to_radians(self) -> (f64, f64) {
        (self.latitude.to_radians(), self.longitude.to_radians())
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}
