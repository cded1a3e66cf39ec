#![forbid(unsafe_code)]
// Allow pedantic lints for early-stage API ergonomics.
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::nursery)]
#![allow(clippy::pedantic)]

//! # Mesa
//!
//! Headless data-table components built on the Elm Architecture.
//!
//! Mesa provides:
//! - **local** - Client-side table: search, sort and paginate an in-memory collection
//! - **remote** - Server-side table: delegate every query to an injected data source
//! - **filter** - Schema-driven filter builder with chips, drawer and predicates
//! - **paginator** - 1-based pagination with a windowed page list
//! - **debounce** - Cancel-and-reschedule value debouncing
//! - **toast** - Bounded notification stack
//!
//! Components are driven by [`Message`]s and express side effects as [`Cmd`]s,
//! so they can be hosted by any event loop; [`simulator::ProgramSimulator`]
//! drives them without one.
//!
//! ## Example
//!
//! ```rust
//! use mesa::prelude::*;
//!
//! let rows = vec![
//!     row! { "name" => "Ana", "status" => "Ativo" },
//!     row! { "name" => "Bruno", "status" => "Inativo" },
//! ];
//! let columns = vec![Column::new("name", "Name").sortable(), Column::new("status", "Status")];
//!
//! let mut table = LocalTable::new(rows, columns).page_size(10);
//! table.set_search("ana");
//! assert_eq!(table.visible_rows().len(), 1);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

pub mod command;
pub mod message;
pub mod simulator;

pub mod column;
pub mod row;
pub mod value;

pub mod paginator;
pub mod search;
pub mod sort;

pub mod debounce;
pub mod filter;
pub mod local;
pub mod remote;
pub mod source;
pub mod toast;

pub mod config;
pub mod error;
mod render;

pub use command::{Cmd, batch, tick};
pub use message::Message;

/// Global ID counter for component instances.
static NEXT_ID: AtomicU64 = AtomicU64::new(1);

pub(crate) fn next_id() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// The Elm Architecture contract every component implements.
pub trait Model: Send + 'static {
    /// Initialize the model and return an optional startup command.
    fn init(&mut self) -> Option<Cmd>;

    /// Process a message and return a new command.
    fn update(&mut self, msg: Message) -> Option<Cmd>;

    /// Render the model as a string for display.
    fn view(&self) -> String;
}

/// Builds a [`row::Row`] from `key => value` pairs.
///
/// ```rust
/// use mesa::row;
///
/// let r = row! { "id" => 7, "name" => "Ana" };
/// assert_eq!(r.get("name").map(ToString::to_string).as_deref(), Some("Ana"));
/// ```
#[macro_export]
macro_rules! row {
    () => { $crate::row::Row::new() };
    ($($key:expr => $value:expr),+ $(,)?) => {
        $crate::row::Row::new()$(.with($key, $value))+
    };
}

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::Model;
    pub use crate::column::{Cell, Column};
    pub use crate::command::{Cmd, batch, tick};
    pub use crate::config::{TableConfig, TableText};
    pub use crate::debounce::{DebounceMsg, Debouncer};
    pub use crate::error::{ConfigError, FetchError};
    pub use crate::filter::{
        ActiveFilter, FilterChange, FilterConfig, FilterField, FilterKind, FilterOption,
        FilterTarget, FilterValue, FilterValues, TableFilter,
    };
    pub use crate::local::LocalTable;
    pub use crate::message::{
        HeaderClickMsg, Message, PageNav, PageNavMsg, RetryMsg, RowClickMsg, RowClickedMsg,
        SearchInputMsg,
    };
    pub use crate::paginator::{PageItem, Paginator};
    pub use crate::remote::{DataSource, FetchParams, LoadedMsg, RefreshKey, RemoteTable, TablePage};
    pub use crate::row;
    pub use crate::row::Row;
    pub use crate::simulator::ProgramSimulator;
    pub use crate::sort::{SortDirection, SortState};
    pub use crate::source::MemorySource;
    pub use crate::toast::{Toast, ToastKind, ToastMsg, ToastStack};
    pub use crate::value::Value;
}
