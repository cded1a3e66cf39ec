//! Bounded notification stack.
//!
//! A [`ToastStack`] is owned by the host application. Pushing past the
//! capacity evicts the oldest toast.
//!
//! # Example
//!
//! ```rust
//! use mesa::toast::{ToastKind, ToastStack};
//!
//! let mut toasts = ToastStack::new(2);
//! toasts.info("Loaded");
//! toasts.success("Saved");
//! toasts.error("Failed to load data");
//!
//! let kinds: Vec<ToastKind> = toasts.iter().map(|t| t.kind).collect();
//! assert_eq!(kinds, vec![ToastKind::Success, ToastKind::Error]);
//! ```

use std::collections::VecDeque;
use std::fmt;

use crate::config::TableConfig;
use crate::message::Message;

/// Default number of toasts kept at once.
pub const DEFAULT_CAPACITY: usize = 5;

/// Severity of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
}

impl ToastKind {
    /// Single-character marker used by [`ToastStack::view`].
    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            Self::Success => "✓",
            Self::Error => "✗",
            Self::Warning => "!",
            Self::Info => "i",
        }
    }
}

/// A notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Unique within its stack.
    pub id: u64,
    pub kind: ToastKind,
    pub title: Option<String>,
    pub message: String,
}

impl fmt::Display for Toast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.title {
            Some(title) => write!(f, "{} {title}: {}", self.kind.icon(), self.message),
            None => write!(f, "{} {}", self.kind.icon(), self.message),
        }
    }
}

/// Toast-related messages.
#[derive(Debug, Clone)]
pub enum ToastMsg {
    /// Show a new toast.
    Show {
        kind: ToastKind,
        title: Option<String>,
        message: String,
    },
    /// Dismiss a toast by ID.
    Dismiss(u64),
    /// Dismiss the oldest toast.
    DismissOldest,
    /// Clear all toasts.
    ClearAll,
}

impl ToastMsg {
    /// Wraps this message for delivery through `update`.
    #[must_use]
    pub fn into_message(self) -> Message {
        Message::new(self)
    }
}

/// Toasts, oldest first.
#[derive(Debug, Clone)]
pub struct ToastStack {
    toasts: VecDeque<Toast>,
    capacity: usize,
    next_id: u64,
}

impl Default for ToastStack {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl ToastStack {
    /// Creates a stack keeping at most `capacity` toasts (at least one).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            toasts: VecDeque::with_capacity(capacity),
            capacity,
            next_id: 1,
        }
    }

    /// Creates a stack sized by `config.toast_capacity`.
    #[must_use]
    pub fn from_config(config: &TableConfig) -> Self {
        Self::new(config.toast_capacity)
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Pushes a toast, evicting the oldest when full. Returns its ID.
    pub fn add(&mut self, kind: ToastKind, title: Option<String>, message: impl Into<String>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.toasts.push_back(Toast {
            id,
            kind,
            title,
            message: message.into(),
        });
        while self.toasts.len() > self.capacity {
            self.toasts.pop_front();
        }
        id
    }

    pub fn success(&mut self, message: impl Into<String>) -> u64 {
        self.add(ToastKind::Success, None, message)
    }

    pub fn error(&mut self, message: impl Into<String>) -> u64 {
        self.add(ToastKind::Error, None, message)
    }

    pub fn warning(&mut self, message: impl Into<String>) -> u64 {
        self.add(ToastKind::Warning, None, message)
    }

    pub fn info(&mut self, message: impl Into<String>) -> u64 {
        self.add(ToastKind::Info, None, message)
    }

    /// Removes a toast by ID. Returns it if it was present.
    pub fn remove(&mut self, id: u64) -> Option<Toast> {
        let index = self.toasts.iter().position(|t| t.id == id)?;
        self.toasts.remove(index)
    }

    pub fn remove_oldest(&mut self) -> Option<Toast> {
        self.toasts.pop_front()
    }

    pub fn clear(&mut self) {
        self.toasts.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    /// Handles a [`ToastMsg`]. Returns true if the message was one.
    pub fn update(&mut self, msg: &Message) -> bool {
        let Some(toast_msg) = msg.downcast_ref::<ToastMsg>() else {
            return false;
        };
        match toast_msg {
            ToastMsg::Show {
                kind,
                title,
                message,
            } => {
                self.add(*kind, title.clone(), message.clone());
            }
            ToastMsg::Dismiss(id) => {
                self.remove(*id);
            }
            ToastMsg::DismissOldest => {
                self.remove_oldest();
            }
            ToastMsg::ClearAll => self.clear(),
        }
        true
    }

    /// One line per toast, oldest first.
    #[must_use]
    pub fn view(&self) -> String {
        self.toasts
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
