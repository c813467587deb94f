//! Coded errors shared by every crate
//!
//! Crate-level error enums convert into [`Error`] at the boundary the app
//! sees. The code groups by thousand: 1 general, 2 I/O, 3 configuration,
//! 4 repository, 5 location, 6 input.

use std::fmt;
use thiserror::Error;

/// Stable numeric error codes
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Internal = 1001,

    IoError = 2000,
    FileNotFound = 2001,
    PermissionDenied = 2002,

    ConfigError = 3000,
    ConfigNotFound = 3001,
    ConfigParseError = 3002,
    InvalidConfigValue = 3004,

    RepositoryError = 4000,
    DocumentNotFound = 4001,
    InvalidDocument = 4002,
    Unauthenticated = 4003,
    PremiumRequired = 4004,
    NotOwner = 4005,

    LocationPermissionDenied = 5001,
    LocationUnavailable = 5002,

    InvalidInput = 6001,
    InvalidCoordinate = 6002,
    InvalidRadius = 6003,
}

impl ErrorCode {
    /// Numeric value
    pub fn code(&self) -> u32 {
        *self as u32
    }

    /// Group name derived from the thousands digit
    pub fn category(&self) -> &'static str {
        match self.code() / 1000 {
            1 => "General",
            2 => "IO",
            3 => "Configuration",
            4 => "Repository",
            5 => "Location",
            _ => "Input",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

/// An error the app can show: code, message, and optional context,
/// suggestion and cause.
#[derive(Error, Debug)]
pub struct Error {
    /// Error code
    pub code: ErrorCode,
    /// What went wrong
    pub message: String,
    /// What was being attempted
    pub context: Option<String>,
    /// What the user can do about it
    pub suggestion: Option<String>,
    /// Underlying cause
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(context) = &self.context {
            write!(f, " ({context})")?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, ". {suggestion}")?;
        }
        Ok(())
    }
}

impl Error {
    /// Error with a code and message only
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: None,
            suggestion: None,
            source: None,
        }
    }

    /// Set the context
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Set the suggestion
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Set the cause
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// An explicitly requested configuration file does not exist
    pub fn config_not_found(path: impl AsRef<std::path::Path>) -> Self {
        Self::new(
            ErrorCode::ConfigNotFound,
            format!("Configuration file not found: {}", path.as_ref().display()),
        )
        .with_suggestion("Create a legends.toml file or pass the path of an existing one")
    }

    /// A configuration value is outside its allowed range
    pub fn invalid_config_value(key: &str, reason: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::InvalidConfigValue,
            format!("Invalid value for `{key}`: {}", reason.into()),
        )
    }

    /// The user refused location access
    pub fn location_permission_denied() -> Self {
        Self::new(ErrorCode::LocationPermissionDenied, "Location permission was denied")
            .with_suggestion("Grant location access or rely on the configured fallback coordinate")
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        let code = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorCode::PermissionDenied,
            _ => ErrorCode::IoError,
        };
        Error::new(code, err.to_string()).with_source(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::new(ErrorCode::InvalidInput, format!("Invalid JSON: {err}")).with_source(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::new(ErrorCode::ConfigParseError, format!("Invalid TOML: {err}")).with_source(err)
    }
}

/// Attach context to the error side of a [`Result`]
pub trait ResultExt<T> {
    /// Set the error's context
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}
