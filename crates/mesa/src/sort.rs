//! Single-column sorting.
//!
//! At most one column is sorted at a time. The local table cycles a header
//! through ascending, descending and unsorted; the remote table only toggles
//! between ascending and descending once a column has been chosen.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::row::Row;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

impl SortDirection {
    /// The opposite direction.
    #[must_use]
    pub fn toggle(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// Wire name: `asc` or `desc`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }

    /// Header indicator.
    #[must_use]
    pub fn indicator(self) -> &'static str {
        match self {
            Self::Ascending => "▲",
            Self::Descending => "▼",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The active sort: a column key and a direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub key: String,
    pub direction: SortDirection,
}

impl SortState {
    #[must_use]
    pub fn new(key: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            key: key.into(),
            direction,
        }
    }

    #[must_use]
    pub fn ascending(key: impl Into<String>) -> Self {
        Self::new(key, SortDirection::Ascending)
    }

    #[must_use]
    pub fn descending(key: impl Into<String>) -> Self {
        Self::new(key, SortDirection::Descending)
    }

    /// Parses `key` or `key:asc` / `key:desc`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let (key, direction) = match s.rsplit_once(':') {
            Some((key, "asc")) => (key, SortDirection::Ascending),
            Some((key, "desc")) => (key, SortDirection::Descending),
            Some(_) => return None,
            None => (s, SortDirection::Ascending),
        };
        (!key.is_empty()).then(|| Self::new(key, direction))
    }
}

/// Header click on the local table: ascending → descending → unsorted.
///
/// Clicking a different column starts over at ascending.
#[must_use]
pub fn cycle_local(current: Option<&SortState>, key: &str) -> Option<SortState> {
    match current {
        Some(s) if s.key == key => match s.direction {
            SortDirection::Ascending => Some(SortState::descending(key)),
            SortDirection::Descending => None,
        },
        _ => Some(SortState::ascending(key)),
    }
}

/// Header click on the remote table: ascending ⇄ descending.
#[must_use]
pub fn cycle_remote(current: Option<&SortState>, key: &str) -> SortState {
    match current {
        Some(s) if s.key == key => SortState::new(key, s.direction.toggle()),
        _ => SortState::ascending(key),
    }
}

/// Stable-sorts `rows` by the sort key.
///
/// Rows with equal keys keep their relative order in both directions.
pub fn sort_rows(rows: &mut [&Row], state: &SortState) {
    rows.sort_by(|a, b| {
        let ord = a.value(&state.key).compare(b.value(&state.key));
        match state.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row;

    #[test]
    fn test_cycle_local() {
        let s = cycle_local(None, "name");
        assert_eq!(s, Some(SortState::ascending("name")));
        let s = cycle_local(s.as_ref(), "name");
        assert_eq!(s, Some(SortState::descending("name")));
        let s = cycle_local(s.as_ref(), "name");
        assert_eq!(s, None);
    }

    #[test]
    fn test_cycle_local_other_column_restarts() {
        let current = SortState::descending("name");
        assert_eq!(
            cycle_local(Some(&current), "age"),
            Some(SortState::ascending("age"))
        );
    }

    #[test]
    fn test_cycle_remote_never_unsorts() {
        let s = cycle_remote(None, "name");
        assert_eq!(s, SortState::ascending("name"));
        let s = cycle_remote(Some(&s), "name");
        assert_eq!(s, SortState::descending("name"));
        let s = cycle_remote(Some(&s), "name");
        assert_eq!(s, SortState::ascending("name"));
    }

    #[test]
    fn test_sort_rows_stable_both_directions() {
        let rows = vec![
            row! { "id" => 1, "g" => "b" },
            row! { "id" => 2, "g" => "a" },
            row! { "id" => 3, "g" => "b" },
            row! { "id" => 4, "g" => "a" },
        ];
        let ids = |v: &[&Row]| -> Vec<String> { v.iter().map(|r| r.value("id").to_string()).collect() };

        let mut view: Vec<&Row> = rows.iter().collect();
        sort_rows(&mut view, &SortState::ascending("g"));
        assert_eq!(ids(&view), vec!["2", "4", "1", "3"]);

        let mut view: Vec<&Row> = rows.iter().collect();
        sort_rows(&mut view, &SortState::descending("g"));
        assert_eq!(ids(&view), vec!["1", "3", "2", "4"]);
    }

    #[test]
    fn test_sort_numbers_numerically() {
        let rows = vec![row! { "n" => 10 }, row! { "n" => 9 }, row! { "n" => 100 }];
        let mut view: Vec<&Row> = rows.iter().collect();
        sort_rows(&mut view, &SortState::ascending("n"));
        let ns: Vec<String> = view.iter().map(|r| r.value("n").to_string()).collect();
        assert_eq!(ns, vec!["9", "10", "100"]);
    }

    #[test]
    fn test_parse() {
        assert_eq!(SortState::parse("name"), Some(SortState::ascending("name")));
        assert_eq!(SortState::parse("name:desc"), Some(SortState::descending("name")));
        assert_eq!(SortState::parse("name:up"), None);
        assert_eq!(SortState::parse(""), None);
    }

    #[test]
    fn test_direction_wire_format() {
        assert_eq!(serde_json::to_string(&SortDirection::Descending).expect("json"), "\"desc\"");
        assert_eq!(SortDirection::Ascending.to_string(), "asc");
    }
}
