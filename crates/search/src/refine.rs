//! Conjunctive text and category filtering.

use serde::{Deserialize, Serialize};

/// Anything the search box and the category chips can filter.
pub trait Refinable {
    /// Primary display text, always searched
    fn title(&self) -> &str;

    /// Secondary searchable text (a place name, a description)
    fn secondary_text(&self) -> Option<&str> {
        None
    }

    /// Category label, compared exactly
    fn category(&self) -> &str;
}

/// Optional predicates for [`refine`]. Absent predicates pass everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefineQuery {
    /// Case-insensitive substring matched against title or secondary text
    pub text: Option<String>,
    /// Case-sensitive exact category
    pub category: Option<String>,
}

impl RefineQuery {
    /// Create an empty query (matches everything)
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by free text
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Filter by exact category
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// True when no predicate is active.
    pub fn is_empty(&self) -> bool {
        self.needle().is_none() && self.category.is_none()
    }

    /// Lowercased search text; whitespace-only text counts as no text.
    fn needle(&self) -> Option<String> {
        self.text
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .map(str::to_lowercase)
    }

    /// Test a single record against every active predicate.
    pub fn matches<T: Refinable + ?Sized>(&self, record: &T) -> bool {
        self.matches_with(record, self.needle().as_deref())
    }

    fn matches_with<T: Refinable + ?Sized>(&self, record: &T, needle: Option<&str>) -> bool {
        if let Some(category) = &self.category {
            if record.category() != category {
                return false;
            }
        }

        match needle {
            None => true,
            Some(needle) => {
                record.title().to_lowercase().contains(needle)
                    || record
                        .secondary_text()
                        .is_some_and(|text| text.to_lowercase().contains(needle))
            }
        }
    }
}

/// Returns the records that satisfy every predicate of `query`, in input order.
///
/// # Example
/// ```
/// use legends_search::{refine, Refinable, RefineQuery};
///
/// #[derive(Clone)]
/// struct Story { title: &'static str, category: &'static str }
///
/// impl Refinable for Story {
///     fn title(&self) -> &str { self.title }
///     fn category(&self) -> &str { self.category }
/// }
///
/// let stories = vec![
///     Story { title: "The Tunnel Ghost", category: "Urban Legends" },
///     Story { title: "Founding Day", category: "Historical Events" },
/// ];
///
/// let ghosts = refine(&stories, &RefineQuery::new().with_text("ghost"));
/// assert_eq!(ghosts.len(), 1);
/// ```
pub fn refine<T: Refinable + Clone>(records: &[T], query: &RefineQuery) -> Vec<T> {
    let needle = query.needle();
    records
        .iter()
        .filter(|record| query.matches_with(*record, needle.as_deref()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Story {
        title: String,
        place: Option<String>,
        category: String,
    }

    impl Refinable for Story {
        fn title(&self) -> &str {
            &self.title
        }

        fn secondary_text(&self) -> Option<&str> {
            self.place.as_deref()
        }

        fn category(&self) -> &str {
            &self.category
        }
    }

    fn story(title: &str, place: Option<&str>, category: &str) -> Story {
        Story {
            title: title.to_string(),
            place: place.map(String::from),
            category: category.to_string(),
        }
    }

    fn stories() -> Vec<Story> {
        vec![
            story("The Princes Bridge Ghost", Some("Southbank"), "Urban Legends"),
            story("Bunyip of the Yarra", Some("Yarra Bend"), "Myth"),
            story("Eureka Stockade", Some("Ballarat"), "Historical Events"),
            story("River spirit", None, "myth"),
        ]
    }

    #[test]
    fn test_no_predicates_is_identity() {
        let input = stories();
        assert_eq!(refine(&input, &RefineQuery::new()), input);
    }

    #[test]
    fn test_blank_text_is_identity() {
        let input = stories();
        assert_eq!(refine(&input, &RefineQuery::new().with_text("   ")), input);
    }

    #[test]
    fn test_text_matches_title_case_insensitively() {
        let results = refine(&stories(), &RefineQuery::new().with_text("BUNYIP"));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Bunyip of the Yarra");
    }

    #[test]
    fn test_text_matches_secondary_field() {
        let results = refine(&stories(), &RefineQuery::new().with_text("ballarat"));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Eureka Stockade");
    }

    #[test]
    fn test_category_is_case_sensitive() {
        let results = refine(&stories(), &RefineQuery::new().with_category("Myth"));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Bunyip of the Yarra");
    }

    #[test]
    fn test_predicates_are_conjunctive() {
        let query = RefineQuery::new().with_text("yarra").with_category("Urban Legends");
        assert!(refine(&stories(), &query).is_empty());

        let query = RefineQuery::new().with_text("yarra").with_category("Myth");
        assert_eq!(refine(&stories(), &query).len(), 1);
    }

    #[test]
    fn test_query_is_empty() {
        assert!(RefineQuery::new().is_empty());
        assert!(RefineQuery::new().with_text(" ").is_empty());
        assert!(!RefineQuery::new().with_category("Myth").is_empty());
    }

    proptest! {
        #[test]
        fn prop_result_is_ordered_subset(text in "[a-z ]{0,4}") {
            let input = stories();
            let results = refine(&input, &RefineQuery::new().with_text(text.clone()));
            let expected: Vec<Story> = input
                .iter()
                .filter(|s| RefineQuery::new().with_text(text.clone()).matches(*s))
                .cloned()
                .collect();
            prop_assert_eq!(results, expected);
        }
    }
}
