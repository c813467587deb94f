//! Firestore REST adapter

mod client;
pub mod value;

pub use client::FirestoreRepository;

use serde::Deserialize;
use serde_json::{Map, Value};

/// A document as returned by the REST API
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Document {
    /// `projects/{p}/databases/(default)/documents/{collection}/{id}`
    pub name: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl Document {
    /// Last path segment of the resource name
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }
}

/// One page of `documents.list`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListDocumentsResponse {
    #[serde(default)]
    pub documents: Vec<Document>,
    pub next_page_token: Option<String>,
}
