//! Configuration loading and schema definitions
//!
//! Shared configuration types for every crate in the workspace.

mod loader;
mod schema;

pub use loader::Config;
pub use schema::*;
