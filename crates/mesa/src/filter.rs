//! Schema-driven table filters.
//!
//! A [`FilterConfig`] lists typed fields. A [`TableFilter`] keeps a draft
//! value map edited while its drawer is open and a committed map shown as
//! removable chips. Committed values are either applied as predicates to a
//! local collection or forwarded untouched to a consumer such as
//! [`crate::remote::RemoteTable`].
//!
//! # Example
//!
//! ```rust
//! use mesa::prelude::*;
//!
//! let config = FilterConfig::new(vec![FilterField::radio(
//!     "status",
//!     "Status",
//!     vec![FilterOption::new("Ativo", "Active"), FilterOption::new("Inativo", "Inactive")],
//! )]);
//! let rows = vec![
//!     row! { "status" => "Ativo" },
//!     row! { "status" => "Inativo" },
//!     row! { "status" => "Ativo" },
//! ];
//!
//! let mut filter = TableFilter::local(config, rows);
//! filter.set_value("status", "Ativo");
//! match filter.apply() {
//!     FilterChange::Filtered(rows) => assert_eq!(rows.len(), 2),
//!     FilterChange::Delegated(_) => unreachable!(),
//! }
//! assert_eq!(filter.active_filters()[0].display, "Active");
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::row::Row;
use crate::value::Value;

/// One choice of a select, radio or checkbox field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    /// Value compared against row values.
    pub value: String,
    /// Label shown to the user.
    pub label: String,
}

impl FilterOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// The input kind of a filter field, with the data each kind needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FilterKind {
    /// Free text; matches case-insensitive substrings.
    Input {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,
    },
    /// Single choice from a list; exact match.
    Select {
        options: Vec<FilterOption>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,
    },
    /// Single choice shown as radio buttons; exact match.
    Radio { options: Vec<FilterOption> },
    /// Multiple choices; the row value must be one of them.
    Checkbox { options: Vec<FilterOption> },
    /// Calendar date; matches regardless of time of day.
    Date,
    /// Number; matches numerically.
    Number {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,
    },
}

impl FilterKind {
    /// The options of choice kinds; empty for the others.
    #[must_use]
    pub fn options(&self) -> &[FilterOption] {
        match self {
            Self::Select { options, .. } | Self::Radio { options } | Self::Checkbox { options } => {
                options
            }
            Self::Input { .. } | Self::Date | Self::Number { .. } => &[],
        }
    }

    /// Lowercase kind name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Input { .. } => "input",
            Self::Select { .. } => "select",
            Self::Radio { .. } => "radio",
            Self::Checkbox { .. } => "checkbox",
            Self::Date => "date",
            Self::Number { .. } => "number",
        }
    }
}

/// A filter field descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterField {
    /// Row field the filter constrains; also the key in [`FilterValues`].
    pub key: String,
    /// Label shown on the control and on chips.
    pub label: String,
    #[serde(flatten)]
    pub kind: FilterKind,
}

impl FilterField {
    pub fn new(key: impl Into<String>, label: impl Into<String>, kind: FilterKind) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            kind,
        }
    }

    pub fn input(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(key, label, FilterKind::Input { placeholder: None })
    }

    pub fn select(
        key: impl Into<String>,
        label: impl Into<String>,
        options: Vec<FilterOption>,
    ) -> Self {
        Self::new(
            key,
            label,
            FilterKind::Select {
                options,
                placeholder: None,
            },
        )
    }

    pub fn radio(
        key: impl Into<String>,
        label: impl Into<String>,
        options: Vec<FilterOption>,
    ) -> Self {
        Self::new(key, label, FilterKind::Radio { options })
    }

    pub fn checkbox(
        key: impl Into<String>,
        label: impl Into<String>,
        options: Vec<FilterOption>,
    ) -> Self {
        Self::new(key, label, FilterKind::Checkbox { options })
    }

    pub fn date(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(key, label, FilterKind::Date)
    }

    pub fn number(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(key, label, FilterKind::Number { placeholder: None })
    }

    /// Sets the placeholder of input, select and number fields (builder
    /// pattern). Other kinds have no placeholder and are left unchanged.
    #[must_use]
    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        match &mut self.kind {
            FilterKind::Input { placeholder }
            | FilterKind::Select { placeholder, .. }
            | FilterKind::Number { placeholder } => *placeholder = Some(text.into()),
            FilterKind::Radio { .. } | FilterKind::Checkbox { .. } | FilterKind::Date => {}
        }
        self
    }

    /// Label of the option whose value is `value`, if any.
    #[must_use]
    pub fn option_label(&self, value: &str) -> Option<&str> {
        self.kind
            .options()
            .iter()
            .find(|o| o.value == value)
            .map(|o| o.label.as_str())
    }

    /// Whether `cell` satisfies `filter`.
    ///
    /// Inactive filter values always match. A list value on a kind other
    /// than checkbox matches when any entry matches.
    #[must_use]
    pub fn matches(&self, cell: &Value, filter: &FilterValue) -> bool {
        let wanted: &[String] = match filter {
            FilterValue::Null => return true,
            FilterValue::Text(s) if s.is_empty() => return true,
            FilterValue::List(items) if items.is_empty() => return true,
            FilterValue::Text(s) => std::slice::from_ref(s),
            FilterValue::List(items) => items,
        };

        let text = cell.to_string();
        match &self.kind {
            FilterKind::Input { .. } => {
                let haystack = text.to_lowercase();
                wanted.iter().any(|w| haystack.contains(&w.to_lowercase()))
            }
            FilterKind::Select { .. } | FilterKind::Radio { .. } | FilterKind::Checkbox { .. } => {
                wanted.iter().any(|w| *w == text)
            }
            FilterKind::Number { .. } => number_coerce(cell).is_some_and(|n| {
                wanted
                    .iter()
                    .any(|w| number_coerce(&Value::from(w.as_str())) == Some(n))
            }),
            FilterKind::Date => cell.to_date().is_some_and(|d| {
                wanted
                    .iter()
                    .any(|w| Value::from(w.as_str()).to_date() == Some(d))
            }),
        }
    }
}

/// Numeric coercion for number filters: null and blank text count as zero.
fn number_coerce(value: &Value) -> Option<f64> {
    match value {
        Value::Null => Some(0.0),
        Value::Text(s) if s.trim().is_empty() => Some(0.0),
        other => other.to_number(),
    }
}

/// The fields of a filter builder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    pub fields: Vec<FilterField>,
}

impl FilterConfig {
    #[must_use]
    pub fn new(fields: Vec<FilterField>) -> Self {
        Self { fields }
    }

    /// The field with the given key.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&FilterField> {
        self.fields.iter().find(|f| f.key == key)
    }
}

/// The value of one filter field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// No value.
    #[default]
    Null,
    /// Text, select, radio, date and number fields.
    Text(String),
    /// Checkbox fields.
    List(Vec<String>),
}

impl FilterValue {
    /// Whether the value constrains anything.
    ///
    /// Null, empty text and empty lists are inactive.
    #[must_use]
    pub fn is_active(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Text(s) => !s.is_empty(),
            Self::List(items) => !items.is_empty(),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

impl From<Vec<&str>> for FilterValue {
    fn from(items: Vec<&str>) -> Self {
        Self::List(items.into_iter().map(String::from).collect())
    }
}

impl<T: Into<FilterValue>> From<Option<T>> for FilterValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Text(s) => f.write_str(s),
            Self::List(items) => f.write_str(&items.join(", ")),
        }
    }
}

/// Map from filter key to value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterValues(BTreeMap<String, FilterValue>);

impl FilterValues {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a value (builder pattern).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Sets a value, returning the previous one.
    pub fn set(
        &mut self,
        key: impl Into<String>,
        value: impl Into<FilterValue>,
    ) -> Option<FilterValue> {
        self.0.insert(key.into(), value.into())
    }

    /// Removes a key, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<FilterValue> {
        self.0.remove(key)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&FilterValue> {
        self.0.get(key)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Iterates over every stored entry, active or not.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of stored entries, active or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The subset of entries that constrain anything.
    #[must_use]
    pub fn active(&self) -> Self {
        Self(
            self.0
                .iter()
                .filter(|(_, v)| v.is_active())
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }

    /// Whether any entry is active.
    #[must_use]
    pub fn has_active(&self) -> bool {
        self.0.values().any(FilterValue::is_active)
    }
}

impl<K: Into<String>, V: Into<FilterValue>> FromIterator<(K, V)> for FilterValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Whether `row` satisfies every active value.
///
/// Keys without a field in `config` are matched by exact text equality.
#[must_use]
pub fn row_matches(config: &FilterConfig, row: &Row, values: &FilterValues) -> bool {
    values
        .iter()
        .filter(|(_, value)| value.is_active())
        .all(|(key, value)| {
            let cell = row.value(key);
            match config.field(key) {
                Some(field) => field.matches(cell, value),
                None => FilterField::select(key, key, Vec::new()).matches(cell, value),
            }
        })
}

/// Keeps the rows satisfying every active value, preserving order.
#[must_use]
pub fn apply_filters(config: &FilterConfig, rows: &[Row], values: &FilterValues) -> Vec<Row> {
    if !values.has_active() {
        return rows.to_vec();
    }
    rows.iter()
        .filter(|row| row_matches(config, row, values))
        .cloned()
        .collect()
}

/// A committed filter rendered as a removable chip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveFilter {
    /// Filter key; pass to [`TableFilter::remove`].
    pub key: String,
    /// Field label.
    pub label: String,
    /// Human-readable value.
    pub display: String,
}

impl fmt::Display for ActiveFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.display)
    }
}

/// Describes the active values as chips, in field order.
///
/// Keys without a field follow, labelled by their key.
#[must_use]
pub fn active_filters(config: &FilterConfig, values: &FilterValues) -> Vec<ActiveFilter> {
    let known = config.fields.iter().filter_map(|field| {
        let value = values.get(&field.key).filter(|v| v.is_active())?;
        let display = match value {
            FilterValue::List(items) => items
                .iter()
                .map(|item| field.option_label(item).unwrap_or(item).to_string())
                .collect::<Vec<_>>()
                .join(", "),
            FilterValue::Text(text) => field.option_label(text).unwrap_or(text).to_string(),
            FilterValue::Null => String::new(),
        };
        Some(ActiveFilter {
            key: field.key.clone(),
            label: field.label.clone(),
            display,
        })
    });

    let unknown = values
        .iter()
        .filter(|(key, value)| value.is_active() && config.field(key).is_none())
        .map(|(key, value)| ActiveFilter {
            key: key.to_string(),
            label: key.to_string(),
            display: value.to_string(),
        });

    known.chain(unknown).collect()
}

/// Callback receiving the locally filtered rows.
pub type FilteredDataFn = Arc<dyn Fn(&[Row]) + Send + Sync>;
/// Callback receiving the committed value map.
pub type FiltersChangeFn = Arc<dyn Fn(&FilterValues) + Send + Sync>;

/// Where committed filters go.
#[derive(Debug, Clone)]
pub enum FilterTarget {
    /// Apply predicates to this collection.
    Local(Vec<Row>),
    /// Forward the value map to a consumer.
    Delegate,
}

/// Result of committing, removing or clearing filters.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterChange {
    /// Rows of the local collection that pass every active filter.
    Filtered(Vec<Row>),
    /// The active values, for a consumer to apply.
    Delegated(FilterValues),
}

/// Filter builder with a drawer, a draft map and committed chips.
pub struct TableFilter {
    id: u64,
    config: FilterConfig,
    target: FilterTarget,
    draft: FilterValues,
    applied: FilterValues,
    open: bool,
    clear_label: String,
    on_filtered_data_change: Option<FilteredDataFn>,
    on_filters_change: Option<FiltersChangeFn>,
}

impl fmt::Debug for TableFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableFilter")
            .field("id", &self.id)
            .field("config", &self.config)
            .field("draft", &self.draft)
            .field("applied", &self.applied)
            .field("open", &self.open)
            .finish_non_exhaustive()
    }
}

impl TableFilter {
    /// Creates a filter for the given target.
    #[must_use]
    pub fn new(config: FilterConfig, target: FilterTarget) -> Self {
        Self {
            id: crate::next_id(),
            config,
            target,
            draft: FilterValues::new(),
            applied: FilterValues::new(),
            open: false,
            clear_label: "Clear all".to_string(),
            on_filtered_data_change: None,
            on_filters_change: None,
        }
    }

    /// Creates a filter applying predicates to `data`.
    #[must_use]
    pub fn local(config: FilterConfig, data: Vec<Row>) -> Self {
        Self::new(config, FilterTarget::Local(data))
    }

    /// Creates a filter forwarding values to a consumer.
    #[must_use]
    pub fn delegate(config: FilterConfig) -> Self {
        Self::new(config, FilterTarget::Delegate)
    }

    /// Sets the callback receiving filtered rows (builder pattern).
    #[must_use]
    pub fn on_filtered_data_change<F>(mut self, f: F) -> Self
    where
        F: Fn(&[Row]) + Send + Sync + 'static,
    {
        self.on_filtered_data_change = Some(Arc::new(f));
        self
    }

    /// Sets the callback receiving committed values (builder pattern).
    #[must_use]
    pub fn on_filters_change<F>(mut self, f: F) -> Self
    where
        F: Fn(&FilterValues) + Send + Sync + 'static,
    {
        self.on_filters_change = Some(Arc::new(f));
        self
    }

    /// Sets the clear-all label (builder pattern).
    #[must_use]
    pub fn clear_label(mut self, label: impl Into<String>) -> Self {
        self.clear_label = label.into();
        self
    }

    /// Returns the filter's unique ID.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[must_use]
    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    #[must_use]
    pub fn target(&self) -> &FilterTarget {
        &self.target
    }

    /// Whether the drawer is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Opens the drawer; the draft starts from the committed values.
    pub fn open(&mut self) {
        if !self.open {
            self.draft = self.applied.clone();
            self.open = true;
        }
    }

    /// Closes the drawer, discarding uncommitted edits.
    pub fn close(&mut self) {
        self.open = false;
        self.draft = self.applied.clone();
    }

    pub fn toggle(&mut self) {
        if self.open {
            self.close();
        } else {
            self.open();
        }
    }

    /// Edits the draft.
    pub fn set_value(&mut self, key: impl Into<String>, value: impl Into<FilterValue>) {
        self.draft.set(key, value);
    }

    /// The draft values.
    #[must_use]
    pub fn draft(&self) -> &FilterValues {
        &self.draft
    }

    /// The committed values.
    #[must_use]
    pub fn values(&self) -> &FilterValues {
        &self.applied
    }

    /// Chips for the committed values.
    #[must_use]
    pub fn active_filters(&self) -> Vec<ActiveFilter> {
        active_filters(&self.config, &self.applied)
    }

    /// Commits the draft, closes the drawer and re-applies.
    pub fn apply(&mut self) -> FilterChange {
        self.applied = self.draft.clone();
        self.open = false;
        self.emit()
    }

    /// Commits `values` directly and re-applies.
    pub fn set_values(&mut self, values: FilterValues) -> FilterChange {
        self.draft = values.clone();
        self.applied = values;
        self.emit()
    }

    /// Removes one filter (a chip) and re-applies.
    pub fn remove(&mut self, key: &str) -> FilterChange {
        self.applied.remove(key);
        self.draft.remove(key);
        self.emit()
    }

    /// Removes every filter and re-applies.
    pub fn clear(&mut self) -> FilterChange {
        self.applied.clear();
        self.draft.clear();
        self.emit()
    }

    /// Replaces the local collection and re-applies.
    ///
    /// A delegating filter ignores the data and reports its values.
    pub fn set_data(&mut self, data: Vec<Row>) -> FilterChange {
        if let FilterTarget::Local(rows) = &mut self.target {
            *rows = data;
        }
        self.emit()
    }

    /// The current result without invoking callbacks.
    #[must_use]
    pub fn current(&self) -> FilterChange {
        match &self.target {
            FilterTarget::Local(rows) => {
                FilterChange::Filtered(apply_filters(&self.config, rows, &self.applied))
            }
            FilterTarget::Delegate => FilterChange::Delegated(self.applied.active()),
        }
    }

    fn emit(&self) -> FilterChange {
        let change = self.current();
        match &change {
            FilterChange::Filtered(rows) => {
                tracing::debug!(id = self.id, rows = rows.len(), "filters applied locally");
                if let Some(callback) = &self.on_filtered_data_change {
                    callback(rows);
                }
            }
            FilterChange::Delegated(values) => {
                tracing::debug!(id = self.id, active = values.len(), "filters delegated");
                if let Some(callback) = &self.on_filters_change {
                    callback(values);
                }
            }
        }
        change
    }

    /// Renders the chips line and, when open, the drawer's fields.
    #[must_use]
    pub fn view(&self) -> String {
        let mut lines = Vec::new();

        let chips = self.active_filters();
        if !chips.is_empty() {
            let mut line: Vec<String> = chips.iter().map(|c| format!("[{c} ×]")).collect();
            line.push(format!("[{}]", self.clear_label));
            lines.push(line.join(" "));
        }

        if self.open {
            for field in &self.config.fields {
                let value = self.draft.get(&field.key).cloned().unwrap_or_default();
                lines.push(render_field(field, &value));
            }
        }

        lines.join("\n")
    }
}

fn render_field(field: &FilterField, value: &FilterValue) -> String {
    let shown = |placeholder: &Option<String>| match value {
        v if v.is_active() => v.to_string(),
        _ => placeholder.clone().unwrap_or_default(),
    };
    let body = match &field.kind {
        FilterKind::Input { placeholder } | FilterKind::Number { placeholder } => {
            format!("[{}]", shown(placeholder))
        }
        FilterKind::Select {
            options,
            placeholder,
        } => {
            let selected = match value {
                FilterValue::Text(v) => options.iter().find(|o| o.value == *v),
                _ => None,
            };
            match selected {
                Some(option) => format!("[{} ▾]", option.label),
                None => format!("[{} ▾]", placeholder.clone().unwrap_or_default()),
            }
        }
        FilterKind::Radio { options } => options
            .iter()
            .map(|o| {
                let on = matches!(value, FilterValue::Text(v) if *v == o.value);
                format!("({}) {}", if on { "•" } else { " " }, o.label)
            })
            .collect::<Vec<_>>()
            .join("  "),
        FilterKind::Checkbox { options } => options
            .iter()
            .map(|o| {
                let on = match value {
                    FilterValue::List(items) => items.contains(&o.value),
                    FilterValue::Text(v) => *v == o.value,
                    FilterValue::Null => false,
                };
                format!("[{}] {}", if on { "x" } else { " " }, o.label)
            })
            .collect::<Vec<_>>()
            .join("  "),
        FilterKind::Date => format!("[{}]", shown(&Some("YYYY-MM-DD".to_string()))),
    };
    format!("{}: {}", field.label, body)
}
