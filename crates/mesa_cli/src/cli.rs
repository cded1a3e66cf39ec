//! Command-line interface for `mesa`.
//!
//! # Examples
//!
//! ```bash
//! # Render the first page of a dataset
//! mesa people.json
//!
//! # Search, sort and jump to a page
//! mesa people.json --search ana --sort age:desc --page 2
//!
//! # Filter through a field schema and query it like a server would
//! mesa people.json --fields fields.json --filter status=Ativo --remote
//! ```

use std::path::PathBuf;

use clap::Parser;
use mesa::sort::SortState;

/// Render a JSON dataset through a mesa table.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "mesa",
    author,
    version,
    about = "Render a JSON dataset through a searchable, sortable, paginated table"
)]
pub struct Cli {
    /// JSON file holding an array of row objects
    pub data: PathBuf,

    /// Columns to show, comma separated
    ///
    /// Defaults to the keys of the first row
    #[arg(long, short = 'c', value_delimiter = ',')]
    pub columns: Vec<String>,

    /// Search term matched against every field
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Sort column, optionally followed by `:asc` or `:desc`
    #[arg(long, value_parser = parse_sort)]
    pub sort: Option<SortState>,

    /// Page to show (1-based)
    #[arg(long, short = 'p', default_value_t = 1)]
    pub page: usize,

    /// Rows per page
    ///
    /// Defaults to the configured page size of the chosen table
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Filter as KEY=VALUE; repeat a key to select several values
    #[arg(long = "filter", value_name = "KEY=VALUE", value_parser = parse_filter)]
    pub filters: Vec<(String, String)>,

    /// JSON file describing the filter fields
    #[arg(long)]
    pub fields: Option<PathBuf>,

    /// Query the data through the remote table and an in-memory source
    #[arg(long)]
    pub remote: bool,

    /// Artificial latency of the in-memory source, in milliseconds
    #[arg(long, default_value_t = 0, requires = "remote")]
    pub latency_ms: u64,

    /// Path to a TOML or JSON table config file
    #[arg(long, env = "MESA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (repeat for more)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Log filter directive for the verbosity count.
    #[must_use]
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

fn parse_sort(s: &str) -> Result<SortState, String> {
    SortState::parse(s).ok_or_else(|| format!("invalid sort `{s}`, expected KEY[:asc|desc]"))
}

fn parse_filter(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("invalid filter `{s}`, expected KEY=VALUE")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesa::sort::SortDirection;

    #[test]
    fn test_parse_full_command_line() {
        let cli = Cli::try_parse_from([
            "mesa",
            "rows.json",
            "--columns",
            "id,name",
            "--sort",
            "name:desc",
            "--filter",
            "status=Ativo",
            "--filter",
            "tag=a=b",
            "-vv",
        ])
        .expect("valid arguments");

        assert_eq!(cli.columns, vec!["id", "name"]);
        assert_eq!(
            cli.sort,
            Some(SortState::new("name", SortDirection::Descending))
        );
        assert_eq!(
            cli.filters,
            vec![
                ("status".to_string(), "Ativo".to_string()),
                ("tag".to_string(), "a=b".to_string())
            ]
        );
        assert_eq!(cli.page, 1);
        assert_eq!(cli.log_level(), "debug");
    }

    #[test]
    fn test_rejects_bad_filter_and_sort() {
        assert!(Cli::try_parse_from(["mesa", "rows.json", "--filter", "novalue"]).is_err());
        assert!(Cli::try_parse_from(["mesa", "rows.json", "--filter", "=x"]).is_err());
        assert!(Cli::try_parse_from(["mesa", "rows.json", "--sort", "name:sideways"]).is_err());
    }

    #[test]
    fn test_latency_requires_remote() {
        assert!(Cli::try_parse_from(["mesa", "rows.json", "--latency-ms", "10"]).is_err());
        assert!(
            Cli::try_parse_from(["mesa", "rows.json", "--remote", "--latency-ms", "10"]).is_ok()
        );
    }
}
