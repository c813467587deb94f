//! Core utilities for the Local Legends toolkit
//!
//! This crate provides shared functionality used by the geo, search and
//! repository crates:
//!
//! - **Error handling**: Errors with codes, context, and recovery suggestions
//! - **Configuration**: TOML-based configuration with validation
//! - **Retry**: Exponential backoff policy for remote calls
//! - **Logging**: `tracing` subscriber setup driven by configuration
//!
//! # Example
//!
//! ```rust,no_run
//! use legends_core::{config::Config, logging};
//!
//! let config = Config::load(None).expect("invalid legends.toml");
//! logging::init(&config.schema.logging).expect("logging already initialised");
//!
//! tracing::info!(radius_km = config.schema.proximity.radius_km, "ready");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod logging;
pub mod retry;

pub use error::{Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, ConfigSchema};
    pub use crate::error::{Error, ErrorCode, Result, ResultExt};
    pub use crate::retry::RetryConfig;
}
