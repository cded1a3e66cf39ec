//! Column descriptors.

use std::fmt;
use std::sync::Arc;

use crate::row::Row;
use crate::value::Value;

/// Custom cell renderer: `(cell value, whole row) -> display text`.
pub type RenderFn = Arc<dyn Fn(&Value, &Row) -> String + Send + Sync>;

/// Content of one rendered cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// The raw value stored in the row.
    Value(Value),
    /// Content produced by the column's render callback.
    Custom(String),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{v}"),
            Self::Custom(s) => f.write_str(s),
        }
    }
}

/// Describes how one field of a row is displayed.
#[derive(Clone)]
pub struct Column {
    /// Row field this column reads.
    pub key: String,
    /// Header label.
    pub header: String,
    /// Whether clicking the header sorts by this column.
    pub sortable: bool,
    /// Right-align cells (numeric data).
    pub numeric: bool,
    /// Fixed display width; computed from content when unset.
    pub width: Option<usize>,
    render: Option<RenderFn>,
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("header", &self.header)
            .field("sortable", &self.sortable)
            .field("numeric", &self.numeric)
            .field("width", &self.width)
            .field("render", &self.render.is_some())
            .finish()
    }
}

impl Column {
    /// Creates a column for `key` with the given header label.
    #[must_use]
    pub fn new(key: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            header: header.into(),
            sortable: false,
            numeric: false,
            width: None,
            render: None,
        }
    }

    /// Marks the column sortable (builder pattern).
    #[must_use]
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Marks the column numeric (builder pattern).
    #[must_use]
    pub fn numeric(mut self) -> Self {
        self.numeric = true;
        self
    }

    /// Fixes the display width (builder pattern).
    #[must_use]
    pub fn width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    /// Sets a custom renderer (builder pattern).
    #[must_use]
    pub fn render<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value, &Row) -> String + Send + Sync + 'static,
    {
        self.render = Some(Arc::new(f));
        self
    }

    /// Produces the cell for `row`.
    #[must_use]
    pub fn cell(&self, row: &Row) -> Cell {
        let value = row.value(&self.key);
        match &self.render {
            Some(render) => Cell::Custom(render(value, row)),
            None => Cell::Value(value.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row;

    #[test]
    fn test_column_builder() {
        let col = Column::new("price", "Price").sortable().numeric().width(8);
        assert_eq!(col.key, "price");
        assert_eq!(col.header, "Price");
        assert!(col.sortable);
        assert!(col.numeric);
        assert_eq!(col.width, Some(8));
    }

    #[test]
    fn test_cell_raw_value() {
        let col = Column::new("name", "Name");
        let r = row! { "name" => "Ana" };
        assert_eq!(col.cell(&r), Cell::Value(Value::from("Ana")));
        assert_eq!(col.cell(&Row::new()), Cell::Value(Value::Null));
    }

    #[test]
    fn test_cell_custom_render_sees_row() {
        let col = Column::new("first", "Name")
            .render(|v, row| format!("{v} {}", row.value("last")));
        let r = row! { "first" => "Ana", "last" => "Lima" };
        assert_eq!(col.cell(&r), Cell::Custom("Ana Lima".into()));
        assert_eq!(col.cell(&r).to_string(), "Ana Lima");
    }
}
