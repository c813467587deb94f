//! Error types for the geo crate.

use thiserror::Error;

/// Result type alias for geo operations.
pub type Result<T> = std::result::Result<T, GeoError>;

/// Contract violations raised by the proximity functions.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeoError {
    /// Latitude or longitude is NaN or infinite
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// Radius is not a positive, finite number of kilometers
    #[error("Invalid radius: {0} km (must be positive and finite)")]
    InvalidRadius(f64),
}

/// Error code for integration with legends-core error handling.
/// Range: 10xxx for geo errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoErrorCode {
    /// Invalid coordinate values
    InvalidCoordinate = 10001,
    /// Invalid radius
    InvalidRadius = 10002,
}

impl GeoError {
    /// Returns the error code for this error.
    pub fn code(&self) -> GeoErrorCode {
        match self {
            GeoError::InvalidCoordinate(_) => GeoErrorCode::InvalidCoordinate,
            GeoError::InvalidRadius(_) => GeoErrorCode::InvalidRadius,
        }
    }
}
