//! Server-side table.
//!
//! A [`RemoteTable`] owns the full query (page, page size, sort, debounced
//! search and filters) and delegates it to an injected [`DataSource`]. Any
//! change to the query issues a new fetch; the response is rendered as-is,
//! totals included.
//!
//! Every load is tagged with a sequence number. Only the response to the
//! most recently issued load is applied, so overlapping fetches that resolve
//! out of order cannot overwrite newer state.
//!
//! # Example
//!
//! ```rust
//! use mesa::prelude::*;
//!
//! let source = |params: FetchParams| async move {
//!     Ok::<_, FetchError>(TablePage {
//!         data: vec![row! { "id" => 1 }],
//!         total: 57,
//!         page: params.page,
//!         page_size: params.page_size,
//!         total_pages: 3,
//!     })
//! };
//!
//! futures::executor::block_on(async {
//!     let mut sim = ProgramSimulator::new(RemoteTable::new(vec![Column::new("id", "ID")], source));
//!     sim.run_until_idle().await;
//!
//!     assert_eq!(sim.model().total(), 57);
//!     assert!(!sim.model().is_loading());
//! });
//! ```

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

use crate::column::Column;
use crate::config::{TableConfig, TableText};
use crate::debounce::{DEFAULT_DELAY, DebounceMsg, Debouncer};
use crate::error::FetchError;
use crate::filter::{ActiveFilter, FilterChange, FilterConfig, FilterValues, TableFilter};
use crate::local::RowClickFn;
use crate::message::{
    HeaderClickMsg, Message, PageNav, PageNavMsg, RetryMsg, RowClickMsg, RowClickedMsg,
    SearchInputMsg, addressed_to,
};
use crate::paginator::{DEFAULT_MAX_BUTTONS, PageItem, Paginator};
use crate::row::Row;
use crate::sort::{self, SortDirection, SortState};
use crate::{Cmd, Model, render};

/// Default rows per page requested by a remote table.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// The query sent to a data source.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchParams {
    /// Requested page (1-based).
    pub page: usize,
    /// Requested rows per page.
    pub page_size: usize,
    /// Sort column key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    /// Sort direction; present only with `sort_by`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortDirection>,
    /// Settled search term; absent when empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Active filter values; absent when none is active.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<FilterValues>,
}

/// One page as reported by a data source.
///
/// Every field is authoritative; the table never recomputes `total_pages`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TablePage {
    pub data: Vec<Row>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

/// Something that can answer a [`FetchParams`] query.
///
/// Implemented for any `Fn(FetchParams) -> impl Future<Output = Result<TablePage, FetchError>>`.
pub trait DataSource: Send + Sync + 'static {
    /// Fetches one page. Called exactly once per table load.
    fn fetch(&self, params: FetchParams) -> BoxFuture<'static, Result<TablePage, FetchError>>;
}

impl<F, Fut> DataSource for F
where
    F: Fn(FetchParams) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<TablePage, FetchError>> + Send + 'static,
{
    fn fetch(&self, params: FetchParams) -> BoxFuture<'static, Result<TablePage, FetchError>> {
        self(params).boxed()
    }
}

/// Result of a fetch, fed back into the table that issued it.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedMsg {
    /// The table that issued the load.
    pub id: u64,
    /// Sequence number of the load.
    pub seq: u64,
    pub result: Result<TablePage, FetchError>,
}

/// External token whose change forces a reload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RefreshKey {
    Text(String),
    Number(i64),
}

impl From<&str> for RefreshKey {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for RefreshKey {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for RefreshKey {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for RefreshKey {
    fn from(n: i32) -> Self {
        Self::Number(i64::from(n))
    }
}

/// A server-side table.
pub struct RemoteTable {
    id: u64,
    columns: Vec<Column>,
    source: Arc<dyn DataSource>,
    filter: Option<TableFilter>,
    searchable: bool,
    search_input: String,
    search: Debouncer<String>,
    sort: Option<SortState>,
    page: usize,
    page_size: usize,
    filters: FilterValues,
    data: Vec<Row>,
    total: usize,
    total_pages: usize,
    loading: bool,
    error: Option<String>,
    seq: u64,
    refresh_key: Option<RefreshKey>,
    max_buttons: usize,
    text: TableText,
    // Builder-set placeholder, kept when a config is applied afterwards.
    placeholder: Option<String>,
    on_row_click: Option<RowClickFn>,
}

impl fmt::Debug for RemoteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteTable")
            .field("id", &self.id)
            .field("params", &self.params())
            .field("rows", &self.data.len())
            .field("total", &self.total)
            .field("total_pages", &self.total_pages)
            .field("loading", &self.loading)
            .field("error", &self.error)
            .field("seq", &self.seq)
            .finish_non_exhaustive()
    }
}

impl RemoteTable {
    /// Creates a table fetching from `source`.
    ///
    /// Nothing is fetched until [`Model::init`] or [`RemoteTable::load`].
    #[must_use]
    pub fn new(columns: Vec<Column>, source: impl DataSource) -> Self {
        Self {
            id: crate::next_id(),
            columns,
            source: Arc::new(source),
            filter: None,
            searchable: false,
            search_input: String::new(),
            search: Debouncer::new(String::new(), DEFAULT_DELAY),
            sort: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            filters: FilterValues::new(),
            data: Vec::new(),
            total: 0,
            total_pages: 0,
            loading: false,
            error: None,
            seq: 0,
            refresh_key: None,
            max_buttons: DEFAULT_MAX_BUTTONS,
            text: TableText::default(),
            placeholder: None,
            on_row_click: None,
        }
    }

    /// Applies shared defaults: page size, debounce delay, page window and
    /// text.
    #[must_use]
    pub fn with_config(mut self, config: &TableConfig) -> Self {
        self.page_size = config.remote_page_size.max(1);
        self.search.set_delay(config.search_debounce());
        self.max_buttons = config.max_page_buttons.max(1);
        self.text = config.text.clone();
        if let Some(placeholder) = &self.placeholder {
            self.text.search_placeholder.clone_from(placeholder);
        }
        if let Some(filter) = self.filter.take() {
            self.filter = Some(filter.clear_label(self.text.clear_filters_label.clone()));
        }
        self
    }

    /// Adds a filter drawer whose committed values drive the query.
    #[must_use]
    pub fn filter_config(mut self, config: FilterConfig) -> Self {
        let filter = TableFilter::delegate(config).clear_label(self.text.clear_filters_label.clone());
        self.filter = Some(filter);
        self
    }

    /// Shows a search box (builder pattern).
    #[must_use]
    pub fn searchable(mut self, searchable: bool) -> Self {
        self.searchable = searchable;
        self
    }

    /// Sets the search box placeholder (builder pattern).
    #[must_use]
    pub fn search_placeholder(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.text.search_placeholder.clone_from(&text);
        self.placeholder = Some(text);
        self
    }

    /// Sets the rows per page (builder pattern).
    #[must_use]
    pub fn page_size(mut self, size: usize) -> Self {
        self.page_size = size.max(1);
        self
    }

    /// Sets the row activation callback (builder pattern).
    #[must_use]
    pub fn on_row_click<F>(mut self, f: F) -> Self
    where
        F: Fn(&Row) + Send + Sync + 'static,
    {
        self.on_row_click = Some(Arc::new(f));
        self
    }

    /// Sets the initial refresh key (builder pattern).
    #[must_use]
    pub fn refresh_key(mut self, key: impl Into<RefreshKey>) -> Self {
        self.refresh_key = Some(key.into());
        self
    }

    /// Starts with a settled search term (builder pattern).
    #[must_use]
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        self.search_input.clone_from(&term);
        self.search.reset(term);
        self
    }

    /// Starts sorted (builder pattern).
    #[must_use]
    pub fn with_sort(mut self, sort: SortState) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Starts on a page (builder pattern).
    #[must_use]
    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page.max(1);
        self
    }

    /// Starts with committed filters (builder pattern).
    #[must_use]
    pub fn with_filters(mut self, values: FilterValues) -> Self {
        if let Some(filter) = &mut self.filter {
            filter.set_values(values.clone());
        }
        self.filters = values.active();
        self
    }

    /// Returns the table's unique ID.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Rows of the last successful response.
    #[must_use]
    pub fn data(&self) -> &[Row] {
        &self.data
    }

    /// Total rows reported by the source.
    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Total pages reported by the source.
    #[must_use]
    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Current page (1-based).
    #[must_use]
    pub fn page(&self) -> usize {
        self.page
    }

    #[must_use]
    pub fn get_page_size(&self) -> usize {
        self.page_size
    }

    #[must_use]
    pub fn sort(&self) -> Option<&SortState> {
        self.sort.as_ref()
    }

    /// Text typed in the search box, settled or not.
    #[must_use]
    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    /// The settled search term sent to the source.
    #[must_use]
    pub fn search(&self) -> &str {
        self.search.value()
    }

    /// Committed active filters sent to the source.
    #[must_use]
    pub fn filters(&self) -> &FilterValues {
        &self.filters
    }

    /// Whether the latest load is still in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Message of the last failed load, if the latest load failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Sequence number of the latest issued load.
    #[must_use]
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// The query the next load will send.
    #[must_use]
    pub fn params(&self) -> FetchParams {
        let sort_by = self.sort.as_ref().map(|s| s.key.clone());
        let sort_order = self.sort.as_ref().map(|s| s.direction);
        let search = Some(self.search.value().clone()).filter(|s| !s.is_empty());
        let filters = Some(self.filters.clone()).filter(|f| !f.is_empty());
        FetchParams {
            page: self.page,
            page_size: self.page_size,
            sort_by,
            sort_order,
            search,
            filters,
        }
    }

    /// Issues a fetch for the current query.
    ///
    /// Sets `loading` and supersedes any load still in flight.
    pub fn load(&mut self) -> Cmd {
        self.seq += 1;
        self.loading = true;

        let params = self.params();
        tracing::debug!(id = self.id, seq = self.seq, ?params, "loading page");

        let id = self.id;
        let seq = self.seq;
        let fetch = self.source.fetch(params);
        Cmd::new(async move {
            let result = fetch.await;
            Message::new(LoadedMsg { id, seq, result })
        })
    }

    /// Re-issues the current query after a failure.
    pub fn retry(&mut self) -> Cmd {
        self.load()
    }

    fn handle_loaded(&mut self, msg: LoadedMsg) {
        if msg.seq != self.seq {
            tracing::trace!(id = self.id, seq = msg.seq, latest = self.seq, "dropping stale response");
            return;
        }
        self.loading = false;
        match msg.result {
            Ok(page) => {
                self.page = page.page.clamp(1, page.total_pages.max(1));
                self.data = page.data;
                self.total = page.total;
                self.total_pages = page.total_pages;
                self.error = None;
            }
            Err(err) => {
                tracing::warn!(id = self.id, seq = msg.seq, error = %err, "fetch failed");
                self.error = Some(err.user_message(&self.text.error_fallback));
                self.data.clear();
            }
        }
    }

    /// Records a keystroke in the search box; the term is sent once it has
    /// been stable for the debounce delay.
    pub fn set_search_input(&mut self, text: impl Into<String>) -> Cmd {
        let text = text.into();
        self.search_input.clone_from(&text);
        self.search.set(text)
    }

    /// Settles the typed search term immediately.
    pub fn flush_search(&mut self) -> Option<Cmd> {
        self.search.flush()?;
        Some(self.query_changed())
    }

    fn query_changed(&mut self) -> Cmd {
        self.page = 1;
        self.load()
    }

    /// Commits filter values. Only the active subset is kept.
    ///
    /// The drawer, when configured, takes the same values so its chips
    /// follow. Returns a load when the active subset changed.
    pub fn set_filters(&mut self, values: &FilterValues) -> Option<Cmd> {
        if let Some(filter) = &mut self.filter {
            filter.set_values(values.clone());
        }
        self.commit_filters(values)
    }

    fn commit_filters(&mut self, values: &FilterValues) -> Option<Cmd> {
        let active = values.active();
        if active == self.filters {
            return None;
        }
        self.filters = active;
        Some(self.query_changed())
    }

    /// The filter drawer, if configured.
    #[must_use]
    pub fn filter(&self) -> Option<&TableFilter> {
        self.filter.as_ref()
    }

    /// The filter drawer, for editing its draft.
    pub fn filter_mut(&mut self) -> Option<&mut TableFilter> {
        self.filter.as_mut()
    }

    /// Chips for the committed filters.
    #[must_use]
    pub fn active_filters(&self) -> Vec<ActiveFilter> {
        self.filter
            .as_ref()
            .map(TableFilter::active_filters)
            .unwrap_or_default()
    }

    /// Commits the drawer's draft.
    pub fn apply_filters(&mut self) -> Option<Cmd> {
        let change = self.filter.as_mut()?.apply();
        self.filter_changed(change)
    }

    /// Removes one committed filter.
    pub fn remove_filter(&mut self, key: &str) -> Option<Cmd> {
        let change = self.filter.as_mut()?.remove(key);
        self.filter_changed(change)
    }

    /// Removes every committed filter.
    pub fn clear_filters(&mut self) -> Option<Cmd> {
        let change = self.filter.as_mut()?.clear();
        self.filter_changed(change)
    }

    fn filter_changed(&mut self, change: FilterChange) -> Option<Cmd> {
        match change {
            FilterChange::Delegated(values) => self.commit_filters(&values),
            FilterChange::Filtered(_) => None,
        }
    }

    /// Sorts by a column: ascending first, then toggling.
    ///
    /// Unknown and non-sortable columns are ignored.
    pub fn click_header(&mut self, key: &str) -> Option<Cmd> {
        if !self.columns.iter().any(|c| c.key == key && c.sortable) {
            return None;
        }
        self.sort = Some(sort::cycle_remote(self.sort.as_ref(), key));
        Some(self.load())
    }

    /// Jumps to a page, clamped to the reported range.
    ///
    /// Returns a load when the page changed.
    pub fn goto_page(&mut self, page: usize) -> Option<Cmd> {
        let page = page.clamp(1, self.total_pages.max(1));
        if page == self.page {
            return None;
        }
        self.page = page;
        Some(self.load())
    }

    pub fn next_page(&mut self) -> Option<Cmd> {
        self.goto_page(self.page + 1)
    }

    pub fn prev_page(&mut self) -> Option<Cmd> {
        self.goto_page(self.page.saturating_sub(1))
    }

    pub fn first_page(&mut self) -> Option<Cmd> {
        self.goto_page(1)
    }

    pub fn last_page(&mut self) -> Option<Cmd> {
        self.goto_page(self.total_pages)
    }

    /// Changes the rows per page; the current page is kept.
    pub fn set_page_size(&mut self, size: usize) -> Option<Cmd> {
        let size = size.max(1);
        if size == self.page_size {
            return None;
        }
        self.page_size = size;
        Some(self.load())
    }

    /// Updates the refresh key, reloading when it changed.
    pub fn set_refresh_key(&mut self, key: impl Into<RefreshKey>) -> Option<Cmd> {
        let key = Some(key.into());
        if key == self.refresh_key {
            return None;
        }
        self.refresh_key = key;
        Some(self.load())
    }

    /// Activates the row at `index` of the current page.
    pub fn click_row(&self, index: usize) -> Option<Row> {
        let row = self.data.get(index)?.clone();
        if let Some(callback) = &self.on_row_click {
            callback(&row);
        }
        Some(row)
    }

    fn paginator(&self) -> Paginator {
        let mut paginator = Paginator::new()
            .per_page(self.page_size)
            .total_pages(self.total_pages)
            .max_buttons(self.max_buttons);
        paginator.set_page(self.page);
        paginator
    }

    /// The page buttons around the current page.
    #[must_use]
    pub fn window(&self) -> Vec<PageItem> {
        self.paginator().window()
    }

    fn navigate(&mut self, nav: PageNav) -> Option<Cmd> {
        match nav {
            PageNav::First => self.first_page(),
            PageNav::Prev => self.prev_page(),
            PageNav::Next => self.next_page(),
            PageNav::Last => self.last_page(),
            PageNav::Goto(page) => self.goto_page(page),
        }
    }
}

impl Model for RemoteTable {
    fn init(&mut self) -> Option<Cmd> {
        Some(self.load())
    }

    fn update(&mut self, msg: Message) -> Option<Cmd> {
        if msg.is::<LoadedMsg>() {
            let loaded = msg.downcast::<LoadedMsg>()?;
            if loaded.id == self.id {
                self.handle_loaded(loaded);
            }
            return None;
        }
        if msg.is::<DebounceMsg>() {
            self.search.update(&msg)?;
            return Some(self.query_changed());
        }

        if let Some(m) = msg.downcast_ref::<SearchInputMsg>() {
            if addressed_to(m.id, self.id) {
                return Some(self.set_search_input(m.text.clone()));
            }
        } else if let Some(m) = msg.downcast_ref::<HeaderClickMsg>() {
            if addressed_to(m.id, self.id) {
                return self.click_header(&m.key);
            }
        } else if let Some(m) = msg.downcast_ref::<PageNavMsg>() {
            if addressed_to(m.id, self.id) {
                return self.navigate(m.nav);
            }
        } else if let Some(m) = msg.downcast_ref::<RowClickMsg>() {
            if addressed_to(m.id, self.id) {
                let row = self.click_row(m.index)?;
                return Some(Cmd::message(RowClickedMsg { id: self.id, row }));
            }
        } else if let Some(m) = msg.downcast_ref::<RetryMsg>() {
            if addressed_to(m.id, self.id) {
                return Some(self.retry());
            }
        }
        None
    }

    fn view(&self) -> String {
        let mut lines = Vec::new();
        if self.searchable {
            lines.push(render::search_line(
                &self.search_input,
                &self.text.search_placeholder,
            ));
        }
        if let Some(filter) = &self.filter {
            let filters = filter.view();
            if !filters.is_empty() {
                lines.push(filters);
            }
        }
        if let Some(error) = &self.error {
            lines.push(format!("! {error} [{}]", self.text.retry_label));
        }

        let rows: Vec<&Row> = self.data.iter().collect();
        lines.extend(render::grid(&self.columns, self.sort.as_ref(), &rows));
        if self.loading {
            lines.push(self.text.loading_message.clone());
        } else if rows.is_empty() && self.error.is_none() {
            lines.push(self.text.empty_message.clone());
        }

        lines.push(render::footer(&self.paginator(), self.total));
        lines.join("\n")
    }
}
