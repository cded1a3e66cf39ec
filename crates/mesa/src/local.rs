//! Client-side table over an in-memory collection.
//!
//! Every relevant change recomputes the pipeline in a fixed order:
//! search, then sort, then paginate. The search term applies immediately
//! and resets the page to 1.
//!
//! # Example
//!
//! ```rust
//! use mesa::prelude::*;
//!
//! let rows: Vec<Row> = (1..=25).map(|i| row! { "id" => i }).collect();
//! let mut table = LocalTable::new(rows, vec![Column::new("id", "ID").sortable()]);
//!
//! assert_eq!(table.total_pages(), 3);
//! table.last_page();
//! assert_eq!(table.visible_rows().len(), 5);
//!
//! table.click_header("id");
//! table.click_header("id");
//! table.first_page();
//! assert_eq!(table.visible_rows()[0].value("id"), &Value::from(25));
//! ```

use std::fmt;
use std::sync::Arc;

use crate::column::Column;
use crate::config::{TableConfig, TableText};
use crate::message::{
    HeaderClickMsg, Message, PageNav, PageNavMsg, RowClickMsg, RowClickedMsg, SearchInputMsg,
    addressed_to,
};
use crate::paginator::Paginator;
use crate::row::Row;
use crate::sort::{self, SortState};
use crate::{Cmd, Model, render, search};

/// Callback invoked with an activated row.
pub type RowClickFn = Arc<dyn Fn(&Row) + Send + Sync>;

/// Default rows per page of a local table.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// A client-side table.
#[derive(Clone)]
pub struct LocalTable {
    id: u64,
    data: Vec<Row>,
    columns: Vec<Column>,
    searchable: bool,
    search: String,
    sort: Option<SortState>,
    pagination: bool,
    paginator: Paginator,
    loading: bool,
    text: TableText,
    // Builder-set text, kept when a config is applied afterwards.
    placeholder: Option<String>,
    empty: Option<String>,
    on_row_click: Option<RowClickFn>,
}

impl fmt::Debug for LocalTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalTable")
            .field("id", &self.id)
            .field("rows", &self.data.len())
            .field("columns", &self.columns)
            .field("search", &self.search)
            .field("sort", &self.sort)
            .field("paginator", &self.paginator)
            .field("loading", &self.loading)
            .finish_non_exhaustive()
    }
}

impl LocalTable {
    /// Creates a table over `data` with pagination enabled.
    #[must_use]
    pub fn new(data: Vec<Row>, columns: Vec<Column>) -> Self {
        let mut table = Self {
            id: crate::next_id(),
            data,
            columns,
            searchable: false,
            search: String::new(),
            sort: None,
            pagination: true,
            paginator: Paginator::new().per_page(DEFAULT_PAGE_SIZE),
            loading: false,
            text: TableText::default(),
            placeholder: None,
            empty: None,
            on_row_click: None,
        };
        table.sync_pages();
        table
    }

    /// Applies shared defaults: page size, page window and text.
    ///
    /// A placeholder or empty message set through the builder is kept.
    #[must_use]
    pub fn with_config(mut self, config: &TableConfig) -> Self {
        self.text = config.text.clone();
        if let Some(placeholder) = &self.placeholder {
            self.text.search_placeholder.clone_from(placeholder);
        }
        if let Some(empty) = &self.empty {
            self.text.empty_message.clone_from(empty);
        }
        self.paginator = self.paginator.max_buttons(config.max_page_buttons);
        self.page_size(config.local_page_size)
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

    /// Enables or disables pagination (builder pattern).
    ///
    /// Without pagination every processed row is visible.
    #[must_use]
    pub fn pagination(mut self, enabled: bool) -> Self {
        self.pagination = enabled;
        self
    }

    /// Sets the rows per page (builder pattern).
    #[must_use]
    pub fn page_size(mut self, size: usize) -> Self {
        self.set_page_size(size);
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

    /// Sets the loading flag (builder pattern).
    #[must_use]
    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    /// Sets the empty-state message (builder pattern).
    #[must_use]
    pub fn empty_message(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.text.empty_message.clone_from(&text);
        self.empty = Some(text);
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

    /// The full collection, unprocessed.
    #[must_use]
    pub fn data(&self) -> &[Row] {
        &self.data
    }

    /// Replaces the collection, keeping search, sort and page (clamped).
    pub fn set_data(&mut self, data: Vec<Row>) {
        self.data = data;
        self.sync_pages();
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// The current search term.
    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Sets the search term and returns to the first page.
    pub fn set_search(&mut self, term: impl Into<String>) {
        let term = term.into();
        if term == self.search {
            return;
        }
        self.search = term;
        self.sync_pages();
        self.paginator.first_page();
    }

    /// The current sort, if any.
    #[must_use]
    pub fn sort(&self) -> Option<&SortState> {
        self.sort.as_ref()
    }

    /// Sets or clears the sort directly.
    pub fn set_sort(&mut self, sort: Option<SortState>) {
        self.sort = sort;
    }

    /// Cycles the sort of a column: ascending, descending, unsorted.
    ///
    /// Unknown and non-sortable columns are ignored.
    pub fn click_header(&mut self, key: &str) {
        let sortable = self.columns.iter().any(|c| c.key == key && c.sortable);
        if sortable {
            self.sort = sort::cycle_local(self.sort.as_ref(), key);
        }
    }

    /// Current page (1-based).
    #[must_use]
    pub fn page(&self) -> usize {
        self.paginator.page()
    }

    #[must_use]
    pub fn get_page_size(&self) -> usize {
        self.paginator.get_per_page()
    }

    /// Changes the rows per page, clamping the current page.
    pub fn set_page_size(&mut self, size: usize) {
        self.paginator.set_per_page(size);
        self.sync_pages();
    }

    /// `ceil(processed rows / page size)`; zero when nothing matches.
    #[must_use]
    pub fn total_pages(&self) -> usize {
        self.paginator.get_total_pages()
    }

    pub fn next_page(&mut self) {
        self.paginator.next_page();
    }

    pub fn prev_page(&mut self) {
        self.paginator.prev_page();
    }

    pub fn first_page(&mut self) {
        self.paginator.first_page();
    }

    pub fn last_page(&mut self) {
        self.paginator.last_page();
    }

    /// Jumps to a page, clamped to the valid range.
    pub fn goto_page(&mut self, page: usize) {
        self.paginator.set_page(page);
    }

    /// Rows after search and sort, before pagination.
    #[must_use]
    pub fn processed_rows(&self) -> Vec<&Row> {
        let mut rows = search::search_rows(&self.data, &self.search);
        if let Some(state) = &self.sort {
            sort::sort_rows(&mut rows, state);
        }
        rows
    }

    /// Rows of the current page.
    #[must_use]
    pub fn visible_rows(&self) -> Vec<&Row> {
        let rows = self.processed_rows();
        if !self.pagination {
            return rows;
        }
        let (start, end) = self.paginator.get_slice_bounds(rows.len());
        rows[start..end].to_vec()
    }

    /// Activates the row at `index` of the visible page.
    ///
    /// Invokes the row click callback and returns the row.
    pub fn click_row(&self, index: usize) -> Option<Row> {
        let row = self.visible_rows().get(index).map(|r| (*r).clone())?;
        if let Some(callback) = &self.on_row_click {
            callback(&row);
        }
        Some(row)
    }

    fn sync_pages(&mut self) {
        let count = search::search_rows(&self.data, &self.search).len();
        self.paginator.set_total_pages_from_items(count);
    }

    fn navigate(&mut self, nav: PageNav) {
        match nav {
            PageNav::First => self.first_page(),
            PageNav::Prev => self.prev_page(),
            PageNav::Next => self.next_page(),
            PageNav::Last => self.last_page(),
            PageNav::Goto(page) => self.goto_page(page),
        }
    }
}

impl Model for LocalTable {
    fn init(&mut self) -> Option<Cmd> {
        None
    }

    fn update(&mut self, msg: Message) -> Option<Cmd> {
        if let Some(m) = msg.downcast_ref::<SearchInputMsg>() {
            if addressed_to(m.id, self.id) {
                self.set_search(m.text.clone());
            }
        } else if let Some(m) = msg.downcast_ref::<HeaderClickMsg>() {
            if addressed_to(m.id, self.id) {
                self.click_header(&m.key);
            }
        } else if let Some(m) = msg.downcast_ref::<PageNavMsg>() {
            if addressed_to(m.id, self.id) {
                self.navigate(m.nav);
            }
        } else if let Some(m) = msg.downcast_ref::<RowClickMsg>() {
            if addressed_to(m.id, self.id) {
                let row = self.click_row(m.index)?;
                return Some(Cmd::message(RowClickedMsg { id: self.id, row }));
            }
        }
        None
    }

    fn view(&self) -> String {
        let mut lines = Vec::new();
        if self.searchable {
            lines.push(render::search_line(&self.search, &self.text.search_placeholder));
        }

        let processed = self.processed_rows();
        let visible = if self.loading {
            Vec::new()
        } else if self.pagination {
            let (start, end) = self.paginator.get_slice_bounds(processed.len());
            processed[start..end].to_vec()
        } else {
            processed.clone()
        };

        lines.extend(render::grid(&self.columns, self.sort.as_ref(), &visible));
        if self.loading {
            lines.push(self.text.loading_message.clone());
        } else if visible.is_empty() {
            lines.push(self.text.empty_message.clone());
        }

        if self.pagination && !self.loading {
            lines.push(render::footer(&self.paginator, processed.len()));
        }
        lines.join("\n")
    }
}
