//! Legend storage, location fallback and proximity views for Local Legends
//!
//! This crate connects the pure proximity and refine functions to the
//! outside world:
//!
//! - [`LegendRepository`]: the storage seam, with a Firestore REST
//!   implementation and an in-memory one
//! - [`LocatedRecord::from_document`]: normalization of stored documents
//! - [`resolve_reference`]: device position with a configured fallback
//! - [`LegendExplorer`]: the nearby, hidden gems, search, details and profile
//!   flows
//!
//! # Example
//!
//! ```rust
//! use legends_core::config::ConfigSchema;
//! use legends_geo::Coordinate;
//! use legends_repository::{ExplorerConfig, FixedLocation, InMemoryRepository, LegendExplorer};
//! use legends_search::RefineQuery;
//! use serde_json::json;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), legends_repository::RepositoryError> {
//! let repository = InMemoryRepository::new().with_documents(
//!     "legends",
//!     [("tunnel", json!({"title": "Tunnel Whispers", "latitude": -37.8183, "longitude": 144.9671}))],
//! );
//! let explorer = LegendExplorer::new(
//!     repository,
//!     FixedLocation(Coordinate::new(-37.8136, 144.9631)),
//!     ExplorerConfig::from(&ConfigSchema::default()),
//! );
//!
//! let nearby = explorer.nearby(&RefineQuery::new()).await?;
//! assert_eq!(nearby.legends.len(), 1);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod explorer;
pub mod firestore;
pub mod location;
pub mod memory;
pub mod model;
pub mod repository;
pub mod session;

pub use error::{RepositoryError, RepositoryResult};
pub use explorer::{CategoryGroup, ExplorerConfig, LegendExplorer, Nearby, NearbyLegend};
pub use firestore::FirestoreRepository;
pub use location::{
    resolve_reference, DeniedLocation, FixedLocation, LocationError, LocationProvider,
    LocationSettings, PositionSource, ReferencePoint,
};
pub use memory::InMemoryRepository;
pub use model::{LocatedRecord, NewLegend, NormalizeOptions, Review, ReviewSummary};
pub use repository::LegendRepository;
pub use session::{Session, UserIdentity};
