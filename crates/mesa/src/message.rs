//! Message types for the Elm Architecture.
//!
//! Messages are the only way to update a component. User input, debounce
//! ticks and data-source completions are all represented as messages.
//!
//! Input messages carry the id of the component they address. An id of `0`
//! addresses every component that handles the message type.

use std::any::Any;
use std::fmt;

use crate::command::Cmd;
use crate::row::Row;

/// A type-erased message container.
///
/// # Example
///
/// ```rust
/// use mesa::Message;
///
/// struct MyMsg(i32);
///
/// let msg = Message::new(MyMsg(42));
/// if let Some(my_msg) = msg.downcast::<MyMsg>() {
///     assert_eq!(my_msg.0, 42);
/// }
/// ```
pub struct Message(Box<dyn Any + Send>);

impl Message {
    /// Create a new message from any sendable type.
    pub fn new<M: Any + Send + 'static>(msg: M) -> Self {
        Self(Box::new(msg))
    }

    /// Try to downcast to a specific message type.
    pub fn downcast<M: Any + Send + 'static>(self) -> Option<M> {
        self.0.downcast::<M>().ok().map(|b| *b)
    }

    /// Try to get a reference to the message as a specific type.
    pub fn downcast_ref<M: Any + Send + 'static>(&self) -> Option<&M> {
        self.0.downcast_ref::<M>()
    }

    /// Check if the message is of a specific type.
    pub fn is<M: Any + Send + 'static>(&self) -> bool {
        self.0.is::<M>()
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message").finish_non_exhaustive()
    }
}

/// Commands to run concurrently, produced by [`crate::batch`].
pub struct BatchMsg(pub Vec<Cmd>);

impl fmt::Debug for BatchMsg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BatchMsg").field(&self.0.len()).finish()
    }
}

pub(crate) fn addressed_to(target: u64, id: u64) -> bool {
    target == 0 || target == id
}

/// The search box text changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchInputMsg {
    /// Target component id.
    pub id: u64,
    /// Current text of the search box.
    pub text: String,
}

/// A column header was clicked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderClickMsg {
    /// Target component id.
    pub id: u64,
    /// Key of the clicked column.
    pub key: String,
}

/// Pagination control actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageNav {
    First,
    Prev,
    Next,
    Last,
    /// Jump to a 1-based page number.
    Goto(usize),
}

/// A pagination control was used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageNavMsg {
    /// Target component id.
    pub id: u64,
    /// The requested navigation.
    pub nav: PageNav,
}

/// A row of the visible page was clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowClickMsg {
    /// Target component id.
    pub id: u64,
    /// Index of the row within the visible page.
    pub index: usize,
}

/// Emitted by a table after a row was activated.
#[derive(Debug, Clone, PartialEq)]
pub struct RowClickedMsg {
    /// The component that emitted the message.
    pub id: u64,
    /// The activated row.
    pub row: Row,
}

/// The retry affordance of an error banner was used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryMsg {
    /// Target component id.
    pub id: u64,
}
