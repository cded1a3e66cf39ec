//! Table rows.
//!
//! A row is the caller's domain record: an open mapping from field name to
//! [`Value`]. Tables read rows but never mutate them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::Value;

static NULL: Value = Value::Null;

/// Field used as the rendering key when present.
pub const ID_FIELD: &str = "id";

/// A single record of a table's collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(BTreeMap<String, Value>);

impl Row {
    /// Creates an empty row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field (builder pattern).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Sets a field, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Returns the field, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns the field, or [`Value::Null`] when absent.
    #[must_use]
    pub fn value(&self, key: &str) -> &Value {
        self.0.get(key).unwrap_or(&NULL)
    }

    /// Returns the `id` field, if present and not null.
    #[must_use]
    pub fn id(&self) -> Option<&Value> {
        self.get(ID_FIELD).filter(|v| !v.is_null())
    }

    /// Key identifying the row when rendering: its `id`, or its position.
    #[must_use]
    pub fn render_key(&self, index: usize) -> String {
        self.id().map_or_else(|| index.to_string(), ToString::to_string)
    }

    /// Iterates over fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterates over field names in key order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the row has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Converts a JSON object into a row. Other JSON values are rejected.
    #[must_use]
    pub fn from_json(value: serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Object(map) => {
                Some(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
            _ => None,
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
