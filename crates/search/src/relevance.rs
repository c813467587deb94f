//! Relevance scoring for search results.

use crate::{Refinable, SearchResult};

/// Relevance score levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RelevanceScore {
    /// No match
    None = 0,
    /// Query characters appear in order
    Fuzzy = 10,
    /// Contains substring
    Contains = 20,
    /// Word boundary match
    WordBoundary = 30,
    /// Starts with query
    StartsWith = 40,
    /// Exact match
    Exact = 50,
}

/// Calculate relevance score for a text against a query.
///
/// Comparison is case-insensitive. Returns 0 when nothing matches.
pub fn calculate_relevance(text: &str, query: &str) -> u32 {
    let text_lower = text.to_lowercase();
    let query_lower = query.trim().to_lowercase();

    let score = if query_lower.is_empty() {
        RelevanceScore::None
    } else if text_lower == query_lower {
        RelevanceScore::Exact
    } else if text_lower.starts_with(&query_lower) {
        RelevanceScore::StartsWith
    } else if text_lower
        .split_whitespace()
        .any(|word| word.starts_with(&query_lower))
    {
        RelevanceScore::WordBoundary
    } else if text_lower.contains(&query_lower) {
        RelevanceScore::Contains
    } else if chars_in_order(&text_lower, &query_lower) {
        RelevanceScore::Fuzzy
    } else {
        RelevanceScore::None
    };

    score as u32
}

/// Scores each record by its best field and returns the matches, best first.
///
/// The title is weighted above the secondary text so a title hit always
/// outranks an equally good place-name hit. Ties keep input order.
pub fn rank_by_relevance<T: Refinable + Clone>(records: &[T], query: &str) -> Vec<SearchResult<T>> {
    let mut results: Vec<SearchResult<T>> = records
        .iter()
        .filter_map(|record| {
            let title = calculate_relevance(record.title(), query) * 2;
            let secondary = record
                .secondary_text()
                .map_or(0, |text| calculate_relevance(text, query));
            let score = title.max(secondary);
            (score > 0).then(|| SearchResult {
                item: record.clone(),
                score,
            })
        })
        .collect();

    results.sort_by(|a, b| b.score.cmp(&a.score));
    results
}

/// True if every query character appears in `text` in order.
fn chars_in_order(text: &str, query: &str) -> bool {
    let mut text_chars = text.chars();
    query
        .chars()
        .all(|wanted| text_chars.by_ref().any(|c| c == wanted))
}
