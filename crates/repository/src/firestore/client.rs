//! Firestore REST client implementing [`LegendRepository`]

use super::value::{decode_fields, encode, encode_fields};
use super::{Document, ListDocumentsResponse};
use crate::error::{RepositoryError, RepositoryResult};
use crate::model::{LocatedRecord, NewLegend, NormalizeOptions, Review};
use crate::repository::LegendRepository;
use crate::session::Session;
use chrono::Utc;
use legends_core::config::RepositoryConfig;
use legends_core::retry::RetryConfig;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Request correlation ID header
const X_REQUEST_ID: &str = "X-Request-ID";

/// Legend repository backed by the Firestore REST API
///
/// Every request carries a correlation id. Reads, reviews, renames and
/// deletes are retried with exponential backoff on connection failures, 429
/// and 5xx responses; creates are sent once.
///
/// Writes carry the session's ID token, falling back to the token set with
/// [`FirestoreRepository::with_bearer_token`].
#[derive(Clone)]
pub struct FirestoreRepository {
    inner: Client,
    config: Arc<RepositoryConfig>,
    project_id: String,
    retry: RetryConfig,
    options: NormalizeOptions,
    bearer_token: Option<String>,
}

impl std::fmt::Debug for FirestoreRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirestoreRepository")
            .field("base_url", &self.config.base_url)
            .field("project_id", &self.project_id)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl FirestoreRepository {
    /// Create a repository for the configured project
    pub fn new(config: RepositoryConfig) -> RepositoryResult<Self> {
        let project_id = config
            .project_id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| RepositoryError::config("repository.project_id is not set"))?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("local-legends/", env!("CARGO_PKG_VERSION"))),
        );

        let inner = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(default_headers)
            .build()?;

        Ok(Self {
            inner,
            config: Arc::new(config),
            project_id,
            retry: RetryConfig::default(),
            options: NormalizeOptions::default(),
            bearer_token: None,
        })
    }

    /// Use a different retry policy
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Use different normalization options
    #[must_use]
    pub fn with_normalize_options(mut self, options: NormalizeOptions) -> Self {
        self.options = options;
        self
    }

    /// Token sent when no session token applies
    #[must_use]
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    /// Resource name of the database's document root
    fn database_path(&self) -> String {
        format!("projects/{}/databases/(default)/documents", self.project_id)
    }

    fn document_path(&self, collection: &str, id: &str) -> String {
        format!("{}/{collection}/{id}", self.database_path())
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.config.base_url.trim_end_matches('/'))
    }

    fn token<'a>(&'a self, session: &'a Session) -> Option<&'a str> {
        session.bearer_token().or(self.bearer_token.as_deref())
    }

    fn not_found(collection: &str, id: &str) -> RepositoryError {
        RepositoryError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }

    async fn list_page(
        &self,
        collection: &str,
        page_token: Option<&str>,
    ) -> RepositoryResult<ListDocumentsResponse> {
        let url = self.url(&format!("{}/{collection}", self.database_path()));
        let mut query = vec![("pageSize", self.config.page_size.to_string())];
        if let Some(token) = page_token {
            query.push(("pageToken", token.to_string()));
        }
        self.execute_with_retry(Method::GET, &url, &query, None, self.bearer_token.as_deref())
            .await
    }

    fn normalize(&self, document: &Document) -> RepositoryResult<LocatedRecord> {
        let fields = decode_fields(&document.fields);
        LocatedRecord::from_document(document.id(), &fields, &self.options)
    }

    /// Execute request with retry logic
    async fn execute_with_retry<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
        token: Option<&str>,
    ) -> RepositoryResult<T> {
        let request_id = Uuid::new_v4().to_string();
        let mut last_error: Option<RepositoryError> = None;

        for attempt in 0..self.retry.max_attempts {
            if attempt > 0 {
                let delay = self.retry.delay_for_attempt(attempt);
                debug!(
                    request_id = %request_id,
                    attempt = attempt,
                    delay_ms = delay.as_millis(),
                    "Retrying after delay"
                );
                tokio::time::sleep(delay).await;
            }

            let start = Instant::now();
            let result = self
                .execute_single_request(&request_id, method.clone(), url, query, body, token)
                .await;

            match result {
                Ok(value) => {
                    debug!(
                        request_id = %request_id,
                        attempt = attempt + 1,
                        elapsed_ms = start.elapsed().as_millis(),
                        "Request succeeded"
                    );
                    return Ok(value);
                }
                Err(e) if e.is_retryable() && attempt + 1 < self.retry.max_attempts => {
                    warn!(
                        request_id = %request_id,
                        attempt = attempt + 1,
                        error = %e,
                        "Request failed, will retry"
                    );
                    last_error = Some(e);
                }
                Err(e) => {
                    debug!(
                        request_id = %request_id,
                        attempt = attempt + 1,
                        error = %e,
                        "Request failed, not retrying"
                    );
                    return Err(e);
                }
            }
        }

        Err(RepositoryError::RetriesExhausted {
            attempts: self.retry.max_attempts,
            last_error: last_error.map_or_else(|| "Unknown error".to_string(), |e| e.to_string()),
        })
    }

    /// Execute a single request without retry
    async fn execute_single_request<T: DeserializeOwned>(
        &self,
        request_id: &str,
        method: Method,
        url: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
        token: Option<&str>,
    ) -> RepositoryResult<T> {
        let mut request = self
            .inner
            .request(method, url)
            .header(X_REQUEST_ID, request_id)
            .query(query);

        if let Some(ref key) = self.config.api_key {
            request = request.query(&[("key", key)]);
        }
        if let Some(token) = token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        if let Some(b) = body {
            request = request.json(b);
        }

        let response = request.send().await?;
        handle_response(response).await
    }
}

/// Handle HTTP response and deserialize
async fn handle_response<T: DeserializeOwned>(response: Response) -> RepositoryResult<T> {
    let status = response.status();

    if status.is_success() {
        Ok(response.json().await?)
    } else {
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(RepositoryError::api_response(status.as_u16(), message))
    }
}

/// Body of a `documents:commit` call appending `review` to `document`.
///
/// The write fails when the document does not exist.
fn append_review_write(document: &str, review: &Review) -> Value {
    json!({
        "writes": [{
            "transform": {
                "document": document,
                "fieldTransforms": [{
                    "fieldPath": "reviews",
                    "appendMissingElements": { "values": [encode(&review.to_value())] }
                }]
            },
            "currentDocument": { "exists": true }
        }]
    })
}

/// Body of a create call for a new legend, with `createdAt` as a timestamp.
fn new_document_body(legend: &NewLegend, author_id: &str) -> Value {
    let document = legend.to_document(author_id, Utc::now());
    let mut fields = document
        .as_object()
        .map(encode_fields)
        .unwrap_or_default();
    if let Some(created) = document.get("createdAt").and_then(Value::as_str) {
        fields.insert("createdAt".into(), json!({ "timestampValue": created }));
    }
    json!({ "fields": fields })
}

impl LegendRepository for FirestoreRepository {
    #[instrument(skip(self))]
    async fn list(&self, collection: &str) -> RepositoryResult<Vec<LocatedRecord>> {
        let mut records = Vec::new();
        let mut page_token: Option<String> = None;
        let mut pages = 0u32;

        loop {
            let page = self.list_page(collection, page_token.as_deref()).await?;
            pages += 1;

            for document in &page.documents {
                match self.normalize(document) {
                    Ok(record) => records.push(record),
                    Err(e) => warn!(collection, error = %e, "Skipping document"),
                }
            }

            match page.next_page_token.filter(|token| !token.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!(collection, pages, count = records.len(), "Listed legends");
        Ok(records)
    }

    #[instrument(skip(self))]
    async fn get(&self, collection: &str, id: &str) -> RepositoryResult<Option<LocatedRecord>> {
        let url = self.url(&self.document_path(collection, id));
        match self
            .execute_with_retry::<Document>(
                Method::GET,
                &url,
                &[],
                None,
                self.bearer_token.as_deref(),
            )
            .await
        {
            Ok(document) => self.normalize(&document).map(Some),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self, review, session))]
    async fn add_review(
        &self,
        collection: &str,
        id: &str,
        review: &Review,
        session: &Session,
    ) -> RepositoryResult<()> {
        let url = self.url(&format!("{}:commit", self.database_path()));
        let body = append_review_write(&self.document_path(collection, id), review);

        match self
            .execute_with_retry::<Value>(Method::POST, &url, &[], Some(&body), self.token(session))
            .await
        {
            Ok(_) => {
                debug!(collection, id, rating = review.rating, "Review added");
                Ok(())
            }
            Err(e) if e.is_not_found() => Err(Self::not_found(collection, id)),
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self, legend, session))]
    async fn submit(
        &self,
        collection: &str,
        legend: &NewLegend,
        session: &Session,
    ) -> RepositoryResult<String> {
        let author = session.require_user()?;
        legend.validate()?;

        let id = Uuid::new_v4().to_string();
        let url = self.url(&format!("{}/{collection}", self.database_path()));
        let body = new_document_body(legend, &author.user_id);

        // A create is not idempotent, so it gets exactly one attempt.
        let request_id = Uuid::new_v4().to_string();
        let created: Document = self
            .execute_single_request(
                &request_id,
                Method::POST,
                &url,
                &[("documentId", id)],
                Some(&body),
                self.token(session),
            )
            .await?;

        debug!(collection, id = created.id(), "Legend submitted");
        Ok(created.id().to_string())
    }

    #[instrument(skip(self, session))]
    async fn delete(&self, collection: &str, id: &str, session: &Session) -> RepositoryResult<()> {
        let url = self.url(&self.document_path(collection, id));
        match self
            .execute_with_retry::<Value>(Method::DELETE, &url, &[], None, self.token(session))
            .await
        {
            Ok(_) => {
                debug!(collection, id, "Legend deleted");
                Ok(())
            }
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self, session))]
    async fn update_title(
        &self,
        collection: &str,
        id: &str,
        title: &str,
        session: &Session,
    ) -> RepositoryResult<()> {
        let url = self.url(&self.document_path(collection, id));
        let query = [
            ("updateMask.fieldPaths", "title".to_string()),
            ("currentDocument.exists", "true".to_string()),
        ];
        let body = json!({ "fields": { "title": { "stringValue": title } } });

        match self
            .execute_with_retry::<Document>(
                Method::PATCH,
                &url,
                &query,
                Some(&body),
                self.token(session),
            )
            .await
        {
            Ok(_) => {
                debug!(collection, id, "Legend renamed");
                Ok(())
            }
            Err(e) if e.is_not_found() => Err(Self::not_found(collection, id)),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> RepositoryConfig {
        RepositoryConfig {
            project_id: Some("legends-dev".into()),
            ..RepositoryConfig::default()
        }
    }

    #[test]
    fn test_requires_project_id() {
        let err = FirestoreRepository::new(RepositoryConfig::default()).unwrap_err();
        assert!(matches!(err, RepositoryError::Config(_)));

        let blank = RepositoryConfig {
            project_id: Some("  ".into()),
            ..RepositoryConfig::default()
        };
        assert!(FirestoreRepository::new(blank).is_err());
    }

    #[test]
    fn test_urls() {
        let repo = FirestoreRepository::new(RepositoryConfig {
            base_url: "http://localhost:8080/v1/".into(),
            ..config()
        })
        .unwrap();

        assert_eq!(
            repo.document_path("legends", "abc"),
            "projects/legends-dev/databases/(default)/documents/legends/abc"
        );
        assert_eq!(
            repo.url(&repo.database_path()),
            "http://localhost:8080/v1/projects/legends-dev/databases/(default)/documents"
        );
    }

    #[test]
    fn test_debug_hides_token() {
        let repo = FirestoreRepository::new(config())
            .unwrap()
            .with_bearer_token("secret-token");
        assert!(!format!("{repo:?}").contains("secret-token"));
    }

    #[test]
    fn test_append_review_write() {
        let review = Review::new("maya", 5, "Chilling").unwrap();
        let body = append_review_write("projects/p/databases/(default)/documents/legends/a", &review);

        let write = &body["writes"][0];
        assert_eq!(write["currentDocument"]["exists"], true);
        let transform = &write["transform"]["fieldTransforms"][0];
        assert_eq!(transform["fieldPath"], "reviews");
        let appended = &transform["appendMissingElements"]["values"][0]["mapValue"]["fields"];
        assert_eq!(appended["rating"], json!({"integerValue": "5"}));
        assert_eq!(appended["comment"], json!({"stringValue": "Chilling"}));
    }

    #[test]
    fn test_new_document_body() {
        let legend = NewLegend {
            title: "Lantern".into(),
            description: "Fog".into(),
            location_name: "Williamstown".into(),
            category: "Folklore".into(),
            image_url: None,
            position: None,
        };
        let body = new_document_body(&legend, "uid-1");
        let fields = &body["fields"];

        assert_eq!(fields["userId"], json!({"stringValue": "uid-1"}));
        assert!(fields["createdAt"].get("timestampValue").is_some());
        assert!(fields.get("latitude").is_none());

        let decoded = decode_fields(fields.as_object().unwrap());
        let record = LocatedRecord::from_document("new", &decoded, &NormalizeOptions::default())
            .unwrap();
        assert_eq!(record.location_name.as_deref(), Some("Williamstown"));
        assert!(record.created_at.is_some());
    }

    #[test]
    fn test_normalize_decodes_typed_fields() {
        let repo = FirestoreRepository::new(config()).unwrap();
        let document: Document = serde_json::from_value(json!({
            "name": "projects/legends-dev/databases/(default)/documents/legendsWgem/gem1",
            "fields": {
                "title": {"stringValue": "Hidden Bar"},
                "category": {"stringValue": "Bar"},
                "location": {"geoPointValue": {"latitude": -37.8, "longitude": 144.98}},
                "hiddenGem": {"booleanValue": true},
            }
        }))
        .unwrap();

        let record = repo.normalize(&document).unwrap();
        assert_eq!(record.id, "gem1");
        assert!(record.hidden_gem);
        assert_eq!(
            record.position,
            Some(legends_geo::Coordinate::new(-37.8, 144.98))
        );
    }

    /// Runs against the emulator or project named by `LEGENDS_FIRESTORE_*`.
    #[cfg(feature = "integration")]
    #[tokio::test]
    async fn test_list_live_collection() {
        let schema = legends_core::config::Config::load(None).unwrap().schema;
        let repo = FirestoreRepository::new(schema.repository.clone()).unwrap();
        let records = repo.list(&schema.repository.legends_collection).await.unwrap();
        assert!(records.iter().all(|r| !r.id.is_empty()));
    }
}
