//! Global free-text search over rows.
//!
//! A row matches when the string form of any of its values contains the
//! term, compared case-insensitively. Search is never scoped to a field.

use crate::row::Row;

/// Returns the lowercased term, or `None` when the term is empty.
#[must_use]
pub fn normalize(term: &str) -> Option<String> {
    (!term.is_empty()).then(|| term.to_lowercase())
}

/// Whether any field of `row` contains the already lowercased `needle`.
#[must_use]
pub fn row_matches(row: &Row, needle: &str) -> bool {
    row.iter()
        .any(|(_, value)| value.to_string().to_lowercase().contains(needle))
}

/// Keeps the rows matching `term`, preserving order.
///
/// An empty term keeps every row.
pub fn search_rows<'a>(rows: impl IntoIterator<Item = &'a Row>, term: &str) -> Vec<&'a Row> {
    match normalize(term) {
        Some(needle) => rows
            .into_iter()
            .filter(|row| row_matches(row, &needle))
            .collect(),
        None => rows.into_iter().collect(),
    }
}
