//! In-memory [`DataSource`].
//!
//! [`MemorySource`] answers queries the way a server would: filters, then
//! search, then sort, then the requested page, with authoritative totals.
//! Latency and failures can be injected to exercise loading and error
//! states.

use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use parking_lot::Mutex;

use crate::error::FetchError;
use crate::filter::{self, FilterConfig};
use crate::remote::{DataSource, FetchParams, TablePage};
use crate::row::Row;
use crate::search;
use crate::sort::{self, SortDirection, SortState};

#[derive(Debug, Default)]
struct State {
    requests: Vec<FetchParams>,
    fail_next: Option<FetchError>,
    fail_always: Option<FetchError>,
}

/// A data source serving a fixed collection.
///
/// Clones share the request log and failure injection.
#[derive(Debug, Clone)]
pub struct MemorySource {
    rows: Arc<Vec<Row>>,
    config: Arc<FilterConfig>,
    latency: Option<Duration>,
    state: Arc<Mutex<State>>,
}

impl MemorySource {
    #[must_use]
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            rows: Arc::new(rows),
            config: Arc::new(FilterConfig::default()),
            latency: None,
            state: Arc::new(Mutex::new(State::default())),
        }
    }

    /// Uses the field kinds of `config` for filter predicates (builder
    /// pattern). Keys without a field are matched by equality.
    #[must_use]
    pub fn filter_config(mut self, config: FilterConfig) -> Self {
        self.config = Arc::new(config);
        self
    }

    /// Delays every response (builder pattern).
    #[must_use]
    pub fn latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Fails the next fetch only.
    pub fn fail_next(&self, err: FetchError) {
        self.state.lock().fail_next = Some(err);
    }

    /// Fails every fetch until called with `None`.
    pub fn fail_always(&self, err: Option<FetchError>) {
        self.state.lock().fail_always = err;
    }

    /// Every query received, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<FetchParams> {
        self.state.lock().requests.clone()
    }

    #[must_use]
    pub fn request_count(&self) -> usize {
        self.state.lock().requests.len()
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }
}

impl DataSource for MemorySource {
    fn fetch(&self, params: FetchParams) -> BoxFuture<'static, Result<TablePage, FetchError>> {
        let failure = {
            let mut state = self.state.lock();
            state.requests.push(params.clone());
            state.fail_next.take().or_else(|| state.fail_always.clone())
        };
        let result = match failure {
            Some(err) => Err(err),
            None => Ok(query(&self.rows, &params, &self.config)),
        };

        let latency = self.latency;
        async move {
            if let Some(latency) = latency {
                tokio::time::sleep(latency).await;
            }
            result
        }
        .boxed()
    }
}

/// Answers `params` over `rows`.
///
/// A page past the end yields no rows but still reports the totals.
#[must_use]
pub fn query(rows: &[Row], params: &FetchParams, config: &FilterConfig) -> TablePage {
    let filtered: Vec<&Row> = match &params.filters {
        Some(values) if values.has_active() => rows
            .iter()
            .filter(|row| filter::row_matches(config, row, values))
            .collect(),
        _ => rows.iter().collect(),
    };

    let mut matched = search::search_rows(filtered, params.search.as_deref().unwrap_or(""));
    if let Some(key) = &params.sort_by {
        let direction = params.sort_order.unwrap_or(SortDirection::Ascending);
        sort::sort_rows(&mut matched, &SortState::new(key.clone(), direction));
    }

    let page_size = params.page_size.max(1);
    let page = params.page.max(1);
    let total = matched.len();
    let start = (page - 1).checked_mul(page_size).map_or(total, |s| s.min(total));
    let end = start.saturating_add(page_size).min(total);

    TablePage {
        data: matched[start..end].iter().map(|row| (*row).clone()).collect(),
        total,
        page,
        page_size,
        total_pages: total.div_ceil(page_size),
    }
}
