//! Table configuration.
//!
//! [`TableConfig`] holds the defaults shared by every table: page sizes,
//! debounce delay, page window size, toast capacity and user-facing text.
//! It can be built in code or loaded from a TOML or JSON file; missing keys
//! keep their defaults.
//!
//! ```rust
//! use mesa::config::TableConfig;
//!
//! let config = TableConfig::from_toml_str("remote_page_size = 50").unwrap();
//! assert_eq!(config.remote_page_size, 50);
//! assert_eq!(config.local_page_size, 10);
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// User-facing strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableText {
    /// Shown when a table has no rows to display.
    pub empty_message: String,
    /// Shown while rows are loading.
    pub loading_message: String,
    /// Error banner text when a fetch failure carries no message.
    pub error_fallback: String,
    /// Placeholder of the search box.
    pub search_placeholder: String,
    /// Label of the retry affordance.
    pub retry_label: String,
    /// Label of the clear-all-filters affordance.
    pub clear_filters_label: String,
}

impl Default for TableText {
    fn default() -> Self {
        Self {
            empty_message: "No records found".to_string(),
            loading_message: "Loading...".to_string(),
            error_fallback: "Failed to load data".to_string(),
            search_placeholder: "Search...".to_string(),
            retry_label: "Retry".to_string(),
            clear_filters_label: "Clear all".to_string(),
        }
    }
}

/// Defaults shared by tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Rows per page of a local table.
    pub local_page_size: usize,
    /// Rows per page requested by a remote table.
    pub remote_page_size: usize,
    /// Idle time before a remote table's search term is sent.
    pub search_debounce_ms: u64,
    /// Most numbered buttons in the page window.
    pub max_page_buttons: usize,
    /// Most toasts kept at once.
    pub toast_capacity: usize,
    /// User-facing strings.
    pub text: TableText,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            local_page_size: 10,
            remote_page_size: 20,
            search_debounce_ms: 500,
            max_page_buttons: 5,
            toast_capacity: 5,
            text: TableText::default(),
        }
    }
}

impl TableConfig {
    /// Create a new config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The search debounce delay.
    #[must_use]
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates a JSON document.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a config file, choosing the format by extension.
    ///
    /// `.json` files are parsed as JSON, anything else as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&contents)
        } else {
            Self::from_toml_str(&contents)
        }
    }

    /// Rejects values no table can work with.
    pub fn validate(&self) -> Result<()> {
        if self.local_page_size == 0 || self.remote_page_size == 0 {
            return Err(ConfigError::Invalid("page sizes must be positive".into()));
        }
        if self.max_page_buttons == 0 {
            return Err(ConfigError::Invalid("max_page_buttons must be positive".into()));
        }
        if self.toast_capacity == 0 {
            return Err(ConfigError::Invalid("toast_capacity must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = TableConfig::default();
        assert_eq!(config.local_page_size, 10);
        assert_eq!(config.remote_page_size, 20);
        assert_eq!(config.search_debounce(), Duration::from_millis(500));
        assert_eq!(config.max_page_buttons, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = TableConfig::from_toml_str(
            r#"
            search_debounce_ms = 250

            [text]
            empty_message = "Nenhum registro encontrado"
            "#,
        )
        .expect("valid config");
        assert_eq!(config.search_debounce_ms, 250);
        assert_eq!(config.text.empty_message, "Nenhum registro encontrado");
        assert_eq!(config.text.retry_label, "Retry");
        assert_eq!(config.remote_page_size, 20);
    }

    #[test]
    fn test_json() {
        let config = TableConfig::from_json_str(r#"{"local_page_size": 25}"#).expect("valid");
        assert_eq!(config.local_page_size, 25);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = TableConfig::from_toml_str("local_page_size = 0").expect_err("zero page size");
        assert!(matches!(err, ConfigError::Invalid(_)));
        let err = TableConfig::from_toml_str("max_page_buttons = 0").expect_err("zero buttons");
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_malformed_documents() {
        assert!(matches!(
            TableConfig::from_toml_str("local_page_size = ["),
            Err(ConfigError::Toml(_))
        ));
        assert!(matches!(
            TableConfig::from_json_str("{"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_load_by_extension() {
        let dir = tempfile::tempdir().expect("temp dir");

        let toml_path = dir.path().join("table.toml");
        let mut f = std::fs::File::create(&toml_path).expect("create");
        writeln!(f, "remote_page_size = 30").expect("write");
        assert_eq!(TableConfig::load(&toml_path).expect("load").remote_page_size, 30);

        let json_path = dir.path().join("table.json");
        std::fs::write(&json_path, r#"{"remote_page_size": 40}"#).expect("write");
        assert_eq!(TableConfig::load(&json_path).expect("load").remote_page_size, 40);

        let missing = dir.path().join("missing.toml");
        assert!(matches!(TableConfig::load(&missing), Err(ConfigError::Io { .. })));
    }
}
