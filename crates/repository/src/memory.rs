//! In-process repository for tests and offline use

use crate::error::{RepositoryError, RepositoryResult};
use crate::model::{LocatedRecord, NewLegend, NormalizeOptions, Review};
use crate::repository::LegendRepository;
use crate::session::Session;
use chrono::Utc;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

type Documents = Vec<(String, Value)>;

/// Repository over plain JSON documents held in memory.
///
/// Documents go through the same normalization as stored ones.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    collections: RwLock<HashMap<String, Documents>>,
    options: NormalizeOptions,
}

impl InMemoryRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Use different normalization options
    #[must_use]
    pub fn with_normalize_options(mut self, options: NormalizeOptions) -> Self {
        self.options = options;
        self
    }

    /// Seed a collection, appending to what is already there
    #[must_use]
    pub fn with_documents<I, S>(mut self, collection: &str, documents: I) -> Self
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        self.collections
            .get_mut()
            .entry(collection.to_string())
            .or_default()
            .extend(documents.into_iter().map(|(id, doc)| (id.into(), doc)));
        self
    }

    /// Insert or replace one document
    pub async fn insert(&self, collection: &str, id: impl Into<String>, document: Value) {
        let id = id.into();
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();
        match docs.iter_mut().find(|(existing, _)| *existing == id) {
            Some((_, doc)) => *doc = document,
            None => docs.push((id, document)),
        }
    }

    /// Number of documents in a collection
    pub async fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, Vec::len)
    }
}

impl LegendRepository for InMemoryRepository {
    async fn list(&self, collection: &str) -> RepositoryResult<Vec<LocatedRecord>> {
        let collections = self.collections.read().await;
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let records = docs
            .iter()
            .filter_map(|(id, doc)| match LocatedRecord::from_document(id, doc, &self.options) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(collection, error = %e, "Skipping document");
                    None
                }
            })
            .collect::<Vec<_>>();

        debug!(collection, count = records.len(), "Listed in-memory legends");
        Ok(records)
    }

    async fn get(&self, collection: &str, id: &str) -> RepositoryResult<Option<LocatedRecord>> {
        let collections = self.collections.read().await;
        collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|(doc_id, _)| doc_id == id))
            .map(|(doc_id, doc)| LocatedRecord::from_document(doc_id, doc, &self.options))
            .transpose()
    }

    async fn add_review(
        &self,
        collection: &str,
        id: &str,
        review: &Review,
        _session: &Session,
    ) -> RepositoryResult<()> {
        let mut collections = self.collections.write().await;
        let not_found = || RepositoryError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        };

        let doc = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|(doc_id, _)| doc_id == id))
            .map(|(_, doc)| doc)
            .ok_or_else(not_found)?;

        let Some(fields) = doc.as_object_mut() else {
            return Err(RepositoryError::invalid_document(id, "document is not an object"));
        };

        let reviews = fields
            .entry("reviews")
            .or_insert_with(|| Value::Array(Vec::new()));
        if !reviews.is_array() {
            *reviews = Value::Array(Vec::new());
        }
        if let Value::Array(items) = reviews {
            items.push(review.to_value());
        }

        Ok(())
    }

    async fn submit(
        &self,
        collection: &str,
        legend: &NewLegend,
        session: &Session,
    ) -> RepositoryResult<String> {
        let author = session.require_user()?;
        legend.validate()?;

        let id = Uuid::new_v4().to_string();
        let document = legend.to_document(&author.user_id, Utc::now());
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .push((id.clone(), document));

        debug!(collection, id = %id, "Stored new legend");
        Ok(id)
    }

    async fn delete(&self, collection: &str, id: &str, _session: &Session) -> RepositoryResult<()> {
        if let Some(docs) = self.collections.write().await.get_mut(collection) {
            docs.retain(|(doc_id, _)| doc_id != id);
        }
        debug!(collection, id, "Deleted legend");
        Ok(())
    }

    async fn update_title(
        &self,
        collection: &str,
        id: &str,
        title: &str,
        _session: &Session,
    ) -> RepositoryResult<()> {
        let mut collections = self.collections.write().await;
        let fields = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|(doc_id, _)| doc_id == id))
            .map(|(_, doc)| doc)
            .ok_or_else(|| RepositoryError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?
            .as_object_mut()
            .ok_or_else(|| RepositoryError::invalid_document(id, "document is not an object"))?;

        fields.insert("title".to_string(), Value::String(title.to_string()));
        Ok(())
    }
}
