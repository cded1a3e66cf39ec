//! Error types.
//!
//! The only runtime failure in the table pipeline is a data-source fetch
//! failure. It is absorbed by the remote table into an error banner and never
//! propagated. Configuration loading has its own error type.

use std::io;

use thiserror::Error;

/// Errors a [`crate::remote::DataSource`] reports.
///
/// # Note on Clone and PartialEq
///
/// This error type implements `Clone` and `PartialEq` so responses can be
/// replayed in tests. Variants therefore store message strings rather than
/// the underlying transport errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The source failed with a message meant for the user.
    #[error("{0}")]
    Message(String),

    /// The source answered with an error status.
    #[error("request failed with status {code}: {message}")]
    Status { code: u16, message: String },

    /// The source could not be reached.
    #[error("data source unavailable")]
    Unavailable,
}

impl FetchError {
    /// Creates a message error.
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }

    /// Text for the error banner.
    ///
    /// Uses the error's own message when there is one, `fallback` otherwise.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        let own = match self {
            Self::Message(message) | Self::Status { message, .. } => message.trim(),
            Self::Unavailable => "",
        };
        if own.is_empty() {
            fallback.to_string()
        } else {
            own.to_string()
        }
    }
}

/// Errors loading a [`crate::config::TableConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    /// The TOML document is malformed.
    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    /// The JSON document is malformed.
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    /// The values are out of range.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// A specialized `Result` type for configuration loading.
pub type Result<T, E = ConfigError> = std::result::Result<T, E>;
