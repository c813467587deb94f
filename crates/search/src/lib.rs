//! Text and category refinement for Local Legends.
//!
//! This crate provides:
//! - Conjunctive text/category filtering ([`refine`])
//! - Multi-level relevance ranking for search boxes
//! - Grouping by category for sectioned lists

mod category;
mod error;
mod refine;
mod relevance;

#[cfg(feature = "wasm")]
mod wasm;

pub use category::{categories, group_by_category, group_in_order};
pub use error::{Result, SearchError};
pub use refine::{refine, RefineQuery, Refinable};
pub use relevance::{calculate_relevance, rank_by_relevance, RelevanceScore};

/// Search result with relevance score.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SearchResult<T> {
    /// The matched item
    pub item: T,
    /// Relevance score (higher is better)
    pub score: u32,
}
