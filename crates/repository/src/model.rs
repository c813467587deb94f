//! Legend records and their normalization from stored documents
//!
//! Documents written by different app versions disagree on where the
//! position lives and what the flags are called. [`LocatedRecord::from_document`]
//! is the single place that knows about those variants.

use crate::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, TimeZone, Utc};
use legends_geo::{parse_geo_point, Coordinate, Located};
use legends_search::{categories, Refinable};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

/// A legend as the rest of the toolkit sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocatedRecord {
    /// Document id assigned by the store
    pub id: String,
    /// Story title
    pub title: String,
    /// Story text
    pub description: String,
    /// Category label (compared exactly)
    pub category: String,
    /// Geographic position, when the document has a usable one
    pub position: Option<Coordinate>,
    /// Free-text place name
    pub location_name: Option<String>,
    /// Premium-only point of interest
    pub hidden_gem: bool,
    /// Submitted by a user rather than pre-added
    pub user_submitted: bool,
    /// Uid of the submitting user
    pub author_id: Option<String>,
    /// Image URL or local URI
    pub image_url: Option<String>,
    /// Submission time
    pub created_at: Option<DateTime<Utc>>,
    /// Reviews in the order they were added
    pub reviews: Vec<Review>,
}

impl Located for LocatedRecord {
    fn position(&self) -> Option<Coordinate> {
        self.position
    }
}

impl Refinable for LocatedRecord {
    fn title(&self) -> &str {
        &self.title
    }

    /// The place name when there is one, the description otherwise.
    fn secondary_text(&self) -> Option<&str> {
        self.location_name.as_deref().or(Some(&self.description))
    }

    fn category(&self) -> &str {
        &self.category
    }
}

/// Knobs for [`LocatedRecord::from_document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Treat an exact `(0, 0)` position as "no position".
    ///
    /// Early story submissions wrote `latitude: 0, longitude: 0` as a
    /// placeholder.
    pub null_island_is_placeholder: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            null_island_is_placeholder: true,
        }
    }
}

impl LocatedRecord {
    /// Build a record from the plain JSON fields of a stored document.
    ///
    /// Position precedence: top-level numeric `latitude`/`longitude`, then a
    /// geo-point object in `location`. A string `location` is the place name.
    pub fn from_document(
        id: impl Into<String>,
        fields: &Value,
        options: &NormalizeOptions,
    ) -> RepositoryResult<Self> {
        let id = id.into();
        let Some(fields) = fields.as_object() else {
            return Err(RepositoryError::invalid_document(id, "document is not an object"));
        };

        let position = extract_position(&id, fields, options);
        let location_name = fields
            .get("location")
            .and_then(Value::as_str)
            .map(str::to_string);
        let author_id = string_field(fields, "userId");

        Ok(Self {
            title: string_field(fields, "title").unwrap_or_default(),
            description: string_field(fields, "description").unwrap_or_default(),
            category: string_field(fields, "category").unwrap_or_default(),
            position,
            location_name,
            hidden_gem: bool_field(fields, "hiddenGem") || bool_field(fields, "isHiddenGem"),
            user_submitted: bool_field(fields, "isUserSubmitted") || author_id.is_some(),
            author_id,
            image_url: string_field(fields, "image").filter(|url| !url.is_empty()),
            created_at: fields.get("createdAt").and_then(parse_timestamp),
            reviews: parse_reviews(&id, fields.get("reviews")),
            id,
        })
    }

    /// Aggregate of this legend's reviews
    #[must_use]
    pub fn review_summary(&self) -> ReviewSummary {
        ReviewSummary::from_reviews(&self.reviews)
    }
}

fn extract_position(
    id: &str,
    fields: &Map<String, Value>,
    options: &NormalizeOptions,
) -> Option<Coordinate> {
    let top_level = match (
        fields.get("latitude").and_then(Value::as_f64),
        fields.get("longitude").and_then(Value::as_f64),
    ) {
        (Some(lat), Some(lng)) => Some(Coordinate::new(lat, lng)),
        _ => None,
    };

    let candidate = match top_level {
        Some(coord) if !coord.is_valid() => {
            warn!(id, latitude = coord.latitude, longitude = coord.longitude, "Out-of-range position ignored");
            None
        }
        Some(coord) => Some(coord),
        None => fields.get("location").and_then(parse_geo_point),
    }?;

    if options.null_island_is_placeholder && candidate.latitude == 0.0 && candidate.longitude == 0.0 {
        debug!(id, "Placeholder (0, 0) position treated as missing");
        return None;
    }

    Some(candidate)
}

fn string_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields.get(key).and_then(Value::as_str).map(str::to_string)
}

fn bool_field(fields: &Map<String, Value>, key: &str) -> bool {
    fields.get(key).and_then(Value::as_bool).unwrap_or(false)
}

/// RFC 3339 strings (REST API) or `{seconds, nanoseconds}` objects (SDK export).
fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Object(map) => {
            let seconds = map.get("seconds").or_else(|| map.get("_seconds"))?.as_i64()?;
            let nanos = map
                .get("nanoseconds")
                .or_else(|| map.get("_nanoseconds"))
                .and_then(Value::as_u64)
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(0);
            Utc.timestamp_opt(seconds, nanos).single()
        }
        _ => None,
    }
}

fn parse_reviews(id: &str, value: Option<&Value>) -> Vec<Review> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match Review::from_value(item) {
            Some(review) => Some(review),
            None => {
                debug!(id, review = %item, "Skipping malformed review");
                None
            }
        })
        .collect()
}

/// Lowest accepted star rating
pub const MIN_RATING: u8 = 1;
/// Highest accepted star rating
pub const MAX_RATING: u8 = 5;

/// A star rating with a comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    /// Display name of the reviewer
    pub reviewer: String,
    /// Stars, 1 to 5
    pub rating: u8,
    /// Review text
    pub comment: String,
}

impl Review {
    /// Validate and build a review.
    ///
    /// The comment is trimmed; blank comments and ratings outside 1..=5 are rejected.
    pub fn new(
        reviewer: impl Into<String>,
        rating: u8,
        comment: impl AsRef<str>,
    ) -> RepositoryResult<Self> {
        let comment = comment.as_ref().trim();
        if comment.is_empty() {
            return Err(RepositoryError::InvalidReview("comment cannot be empty".into()));
        }
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(RepositoryError::InvalidReview(format!(
                "rating {rating} is outside {MIN_RATING}..={MAX_RATING}"
            )));
        }

        Ok(Self {
            reviewer: reviewer.into(),
            rating,
            comment: comment.to_string(),
        })
    }

    /// The stored JSON shape
    #[must_use]
    pub fn to_value(&self) -> Value {
        json!({
            "reviewer": self.reviewer,
            "rating": self.rating,
            "comment": self.comment,
        })
    }

    fn from_value(value: &Value) -> Option<Self> {
        let rating = value.get("rating")?.as_f64()?.round();
        let rating = u8::try_from(rating as i64).ok()?;
        let reviewer = value
            .get("reviewer")
            .and_then(Value::as_str)
            .unwrap_or("Anonymous");
        let comment = value.get("comment")?.as_str()?;
        Self::new(reviewer, rating, comment).ok()
    }
}

/// Review count and mean rating.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReviewSummary {
    /// Number of reviews
    pub count: usize,
    /// Mean rating, `None` without reviews
    pub average: Option<f64>,
}

impl ReviewSummary {
    /// Summarize a list of reviews
    #[must_use]
    pub fn from_reviews(reviews: &[Review]) -> Self {
        let count = reviews.len();
        let average = (count > 0).then(|| {
            let total: u32 = reviews.iter().map(|r| u32::from(r.rating)).sum();
            f64::from(total) / count as f64
        });
        Self { count, average }
    }
}

/// A story submitted from the app.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLegend {
    /// Story title
    pub title: String,
    /// Story text
    pub description: String,
    /// Free-text place name
    pub location_name: String,
    /// Story type
    pub category: String,
    /// Picked image, if any
    pub image_url: Option<String>,
    /// Position, if the submitter provided one
    pub position: Option<Coordinate>,
}

impl NewLegend {
    /// Check the required fields, the story type and the optional position.
    pub fn validate(&self) -> RepositoryResult<()> {
        let required = [
            ("title", &self.title),
            ("description", &self.description),
            ("location", &self.location_name),
            ("category", &self.category),
        ];
        if let Some((name, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(RepositoryError::InvalidSubmission(format!("{name} is required")));
        }

        if !categories::SUBMISSION.contains(&self.category.as_str()) {
            return Err(RepositoryError::InvalidSubmission(format!(
                "unknown story type {:?}, expected one of {:?}",
                self.category,
                categories::SUBMISSION
            )));
        }

        if let Some(position) = self.position {
            if !position.is_finite() || !position.is_valid() {
                return Err(RepositoryError::InvalidSubmission(format!(
                    "({}, {}) is not a valid position",
                    position.latitude, position.longitude
                )));
            }
        }

        Ok(())
    }

    /// The stored JSON shape, attributed to `author_id`.
    ///
    /// Without a position no coordinate fields are written.
    #[must_use]
    pub fn to_document(&self, author_id: &str, created_at: DateTime<Utc>) -> Value {
        let mut doc = json!({
            "title": self.title.trim(),
            "description": self.description.trim(),
            "location": self.location_name.trim(),
            "category": self.category,
            "image": self.image_url.clone().unwrap_or_default(),
            "userId": author_id,
            "isUserSubmitted": true,
            "createdAt": created_at.to_rfc3339(),
            "reviews": [],
        });

        if let (Some(position), Some(map)) = (self.position, doc.as_object_mut()) {
            map.insert("latitude".into(), json!(position.latitude));
            map.insert("longitude".into(), json!(position.longitude));
        }

        doc
    }
}
