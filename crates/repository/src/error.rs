//! Error types for the repository crate

use legends_core::{Error as CoreError, ErrorCode};
use legends_geo::GeoError;
use thiserror::Error;

/// Result type alias for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Repository and view errors
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Document store returned an error response
    #[error("API error ({status}): {message}")]
    ApiResponse {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// All retry attempts exhausted
    #[error("All {attempts} retry attempts failed: {last_error}")]
    RetriesExhausted {
        /// Number of attempts made
        attempts: u32,
        /// Last error message
        last_error: String,
    },

    /// A stored document could not be read as a legend
    #[error("Invalid document {id}: {reason}")]
    InvalidDocument {
        /// Document id
        id: String,
        /// What was wrong with it
        reason: String,
    },

    /// Target document does not exist
    #[error("Document {collection}/{id} not found")]
    NotFound {
        /// Collection name
        collection: String,
        /// Document id
        id: String,
    },

    /// Review rejected before it was sent
    #[error("Invalid review: {0}")]
    InvalidReview(String),

    /// Story submission rejected before it was sent
    #[error("Invalid submission: {0}")]
    InvalidSubmission(String),

    /// Operation needs a signed-in user
    #[error("You must be signed in to do this")]
    Unauthenticated,

    /// Operation needs a premium account
    #[error("This feature is only available for premium users")]
    PremiumRequired,

    /// The legend was written by someone else
    #[error("Legend {id} belongs to another user")]
    NotOwner {
        /// Document id
        id: String,
    },

    /// Proximity contract violation
    #[error(transparent)]
    Geo(#[from] GeoError),
}

impl RepositoryError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an API response error
    pub fn api_response(status: u16, message: impl Into<String>) -> Self {
        Self::ApiResponse {
            status,
            message: message.into(),
        }
    }

    /// Create an invalid document error
    pub fn invalid_document(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDocument {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Check if this error is retryable
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Request(e) => e.is_connect() || e.is_timeout(),
            Self::ApiResponse { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Check if the store reported a missing document
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::ApiResponse { status: 404, .. })
    }

    /// Code in the shared error taxonomy
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Request(_) | Self::ApiResponse { .. } | Self::RetriesExhausted { .. } => {
                ErrorCode::RepositoryError
            }
            Self::Json(_) | Self::InvalidDocument { .. } => ErrorCode::InvalidDocument,
            Self::Config(_) => ErrorCode::ConfigError,
            Self::NotFound { .. } => ErrorCode::DocumentNotFound,
            Self::InvalidReview(_) | Self::InvalidSubmission(_) => ErrorCode::InvalidInput,
            Self::Unauthenticated => ErrorCode::Unauthenticated,
            Self::PremiumRequired => ErrorCode::PremiumRequired,
            Self::NotOwner { .. } => ErrorCode::NotOwner,
            Self::Geo(GeoError::InvalidCoordinate(_)) => ErrorCode::InvalidCoordinate,
            Self::Geo(GeoError::InvalidRadius(_)) => ErrorCode::InvalidRadius,
        }
    }
}

impl From<RepositoryError> for CoreError {
    fn from(err: RepositoryError) -> Self {
        let code = err.code();
        let error = CoreError::new(code, err.to_string());
        match err {
            RepositoryError::Unauthenticated => error.with_suggestion("Sign in and try again"),
            RepositoryError::PremiumRequired => {
                error.with_suggestion("Upgrade to a premium account to see hidden gems")
            }
            other => error.with_source(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_statuses() {
        assert!(RepositoryError::api_response(503, "unavailable").is_retryable());
        assert!(RepositoryError::api_response(429, "slow down").is_retryable());
        assert!(!RepositoryError::api_response(403, "denied").is_retryable());
        assert!(!RepositoryError::PremiumRequired.is_retryable());
    }

    #[test]
    fn test_not_found() {
        assert!(RepositoryError::api_response(404, "missing").is_not_found());
        assert!(!RepositoryError::api_response(400, "bad").is_not_found());
    }

    #[test]
    fn test_into_core_error() {
        let core: CoreError = RepositoryError::PremiumRequired.into();
        assert_eq!(core.code, ErrorCode::PremiumRequired);
        assert!(core.suggestion.is_some());

        let core: CoreError = RepositoryError::NotOwner { id: "l1".into() }.into();
        assert_eq!(core.code, ErrorCode::NotOwner);
        assert!(core.message.contains("l1"));

        let core: CoreError = RepositoryError::Geo(GeoError::InvalidRadius(0.0)).into();
        assert_eq!(core.code, ErrorCode::InvalidRadius);
        assert!(core.source.is_some());
    }
}
