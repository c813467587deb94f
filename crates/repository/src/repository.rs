//! Storage seam for legends

use crate::error::RepositoryResult;
use crate::model::{LocatedRecord, NewLegend, Review};
use crate::session::Session;
use std::future::Future;

/// Read and write access to legend collections.
///
/// Implementations normalize documents with
/// [`LocatedRecord::from_document`] and keep the store's document order.
/// Documents that cannot be normalized are skipped by `list`.
///
/// Writes are made on behalf of `session`; a store that authenticates
/// requests sends the session's ID token with them.
pub trait LegendRepository: Send + Sync {
    /// All legends in a collection
    fn list(
        &self,
        collection: &str,
    ) -> impl Future<Output = RepositoryResult<Vec<LocatedRecord>>> + Send;

    /// One legend, `None` when it does not exist
    fn get(
        &self,
        collection: &str,
        id: &str,
    ) -> impl Future<Output = RepositoryResult<Option<LocatedRecord>>> + Send;

    /// Append a review to an existing legend
    fn add_review(
        &self,
        collection: &str,
        id: &str,
        review: &Review,
        session: &Session,
    ) -> impl Future<Output = RepositoryResult<()>> + Send;

    /// Store a new legend authored by the session's user and return its id
    fn submit(
        &self,
        collection: &str,
        legend: &NewLegend,
        session: &Session,
    ) -> impl Future<Output = RepositoryResult<String>> + Send;

    /// Remove a legend. Removing one that does not exist succeeds.
    fn delete(
        &self,
        collection: &str,
        id: &str,
        session: &Session,
    ) -> impl Future<Output = RepositoryResult<()>> + Send;

    /// Replace the title of an existing legend
    fn update_title(
        &self,
        collection: &str,
        id: &str,
        title: &str,
        session: &Session,
    ) -> impl Future<Output = RepositoryResult<()>> + Send;
}
