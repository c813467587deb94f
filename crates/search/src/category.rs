//! Category labels and grouping.

use crate::Refinable;

/// Category labels stored on legend documents.
///
/// Labels are compared exactly, so the singular submission labels and the
/// plural browse labels are distinct categories.
pub mod categories {
    /// Browse chip: historical events
    pub const HISTORICAL_EVENTS: &str = "Historical Events";
    /// Browse chip: myths
    pub const MYTHS: &str = "Myths";
    /// Browse chip: urban legends
    pub const URBAN_LEGENDS: &str = "Urban Legends";

    /// Submission type: folklore
    pub const FOLKLORE: &str = "Folklore";
    /// Submission type: myth
    pub const MYTH: &str = "Myth";
    /// Submission type: historical event
    pub const HISTORICAL_EVENT: &str = "Historical Event";

    /// Hidden gem kind: scenic spot
    pub const SCENIC: &str = "scenic";
    /// Hidden gem kind: bar
    pub const BAR: &str = "bar";
    /// Hidden gem kind: anything else
    pub const OTHER: &str = "other";

    /// Types offered when submitting a story.
    pub const SUBMISSION: [&str; 3] = [FOLKLORE, MYTH, HISTORICAL_EVENT];

    /// Sections of the hidden gem view, in display order.
    pub const HIDDEN_GEM: [&str; 3] = [SCENIC, BAR, OTHER];
}

/// Groups records by category.
///
/// Groups appear in the order their category is first seen; records keep
/// their relative order inside each group.
pub fn group_by_category<T: Refinable + Clone>(records: &[T]) -> Vec<(String, Vec<T>)> {
    let mut groups: Vec<(String, Vec<T>)> = Vec::new();

    for record in records {
        match groups.iter_mut().find(|(name, _)| name == record.category()) {
            Some((_, members)) => members.push(record.clone()),
            None => groups.push((record.category().to_string(), vec![record.clone()])),
        }
    }

    groups
}

/// Groups records under a fixed list of sections.
///
/// Sections follow `order` and empty ones are left out. Categories missing
/// from `order` come last, in first-seen order.
pub fn group_in_order<T: Refinable + Clone>(
    records: &[T],
    order: &[&str],
) -> Vec<(String, Vec<T>)> {
    let mut groups = group_by_category(records);
    groups.sort_by_key(|(name, _)| {
        order
            .iter()
            .position(|section| *section == name.as_str())
            .unwrap_or(order.len())
    });
    groups
}
