//! Reference point resolution
//!
//! The proximity filter never substitutes a default point. Falling back to a
//! fixed coordinate happens here, and the result says which one was used.

use legends_core::config::LocationConfig;
use legends_core::{Error as CoreError, ErrorCode};
use legends_geo::Coordinate;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Why a device position is unavailable
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    /// User refused location access
    #[error("Location permission denied")]
    PermissionDenied,

    /// No fix could be obtained
    #[error("Location unavailable: {0}")]
    Unavailable(String),
}

/// Source of device positions.
pub trait LocationProvider: Send + Sync {
    /// Ask for permission if needed and return the current position.
    fn current_position(&self) -> impl Future<Output = Result<Coordinate, LocationError>> + Send;
}

impl From<LocationError> for CoreError {
    fn from(err: LocationError) -> Self {
        match err {
            LocationError::PermissionDenied => CoreError::location_permission_denied(),
            LocationError::Unavailable(reason) => {
                CoreError::new(ErrorCode::LocationUnavailable, reason)
            }
        }
    }
}

/// A provider that always reports the same position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedLocation(pub Coordinate);

impl LocationProvider for FixedLocation {
    async fn current_position(&self) -> Result<Coordinate, LocationError> {
        Ok(self.0)
    }
}

/// A provider whose permission was refused.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeniedLocation;

impl LocationProvider for DeniedLocation {
    async fn current_position(&self) -> Result<Coordinate, LocationError> {
        Err(LocationError::PermissionDenied)
    }
}

/// Where a reference point came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionSource {
    /// Reported by the device
    Device,
    /// Configured fallback
    Fallback,
}

/// The point proximity is measured from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferencePoint {
    /// Position
    pub coordinate: Coordinate,
    /// Where it came from
    pub source: PositionSource,
}

impl ReferencePoint {
    /// Whether the configured fallback was used
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.source == PositionSource::Fallback
    }
}

/// Fallback point and wait time for [`resolve_reference`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationSettings {
    /// Point used without a device fix
    pub fallback: Coordinate,
    /// How long to wait for the device
    pub timeout: Duration,
}

impl Default for LocationSettings {
    fn default() -> Self {
        Self::from(&LocationConfig::default())
    }
}

impl From<&LocationConfig> for LocationSettings {
    fn from(config: &LocationConfig) -> Self {
        Self {
            fallback: Coordinate::new(config.fallback_latitude, config.fallback_longitude),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

/// Ask the provider for a position, falling back on refusal, failure,
/// timeout or an unusable fix.
pub async fn resolve_reference<L: LocationProvider>(
    provider: &L,
    settings: &LocationSettings,
) -> ReferencePoint {
    let fallback = ReferencePoint {
        coordinate: settings.fallback,
        source: PositionSource::Fallback,
    };

    match tokio::time::timeout(settings.timeout, provider.current_position()).await {
        Ok(Ok(coordinate)) if coordinate.is_finite() && coordinate.is_valid() => {
            debug!(
                latitude = coordinate.latitude,
                longitude = coordinate.longitude,
                "Using device position"
            );
            ReferencePoint {
                coordinate,
                source: PositionSource::Device,
            }
        }
        Ok(Ok(coordinate)) => {
            warn!(
                latitude = coordinate.latitude,
                longitude = coordinate.longitude,
                "Device reported an invalid position, using fallback"
            );
            fallback
        }
        Ok(Err(e)) => {
            warn!(error = %e, "Device position unavailable, using fallback");
            fallback
        }
        Err(_) => {
            warn!(
                timeout_ms = settings.timeout.as_millis(),
                "Timed out waiting for device position, using fallback"
            );
            fallback
        }
    }
}
