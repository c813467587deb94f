//! WASM bindings for search utilities.

use crate::{rank_by_relevance, refine, Refinable, RefineQuery, Result};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct JsRecord {
    id: String,
    title: String,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    category: String,
}

impl Refinable for JsRecord {
    fn title(&self) -> &str {
        &self.title
    }

    fn secondary_text(&self) -> Option<&str> {
        self.location.as_deref()
    }

    fn category(&self) -> &str {
        &self.category
    }
}

/// Calculate relevance score for a query against text (0-50).
#[wasm_bindgen]
pub fn relevance_score(query: &str, text: &str) -> u32 {
    crate::calculate_relevance(text, query)
}

/// Refine a JSON array of records by optional text and category.
///
/// Empty strings disable the matching predicate.
#[wasm_bindgen]
pub fn refine_records(records_json: &str, text: &str, category: &str) -> std::result::Result<String, JsValue> {
    run_refine(records_json, text, category).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Rank a JSON array of records against a query, best first.
#[wasm_bindgen]
pub fn search_records(records_json: &str, query: &str) -> std::result::Result<String, JsValue> {
    let run = || -> Result<String> {
        let records: Vec<JsRecord> = serde_json::from_str(records_json)?;
        Ok(serde_json::to_string(&rank_by_relevance(&records, query))?)
    };
    run().map_err(|e| JsValue::from_str(&e.to_string()))
}

fn run_refine(records_json: &str, text: &str, category: &str) -> Result<String> {
    let records: Vec<JsRecord> = serde_json::from_str(records_json)?;

    let mut query = RefineQuery::new();
    if !text.is_empty() {
        query = query.with_text(text);
    }
    if !category.is_empty() {
        query = query.with_category(category);
    }

    Ok(serde_json::to_string(&refine(&records, &query))?)
}
