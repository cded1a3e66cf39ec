//! Builds a table from the command line and renders it.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use mesa::prelude::*;

use crate::cli::Cli;

/// Loads the inputs named by `cli`, drives the chosen table to idle and
/// returns what should be printed.
pub async fn run(cli: &Cli) -> Result<String> {
    let config = match &cli.config {
        Some(path) => TableConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => TableConfig::default(),
    };
    let rows = read_rows(&cli.data)?;
    let fields = match &cli.fields {
        Some(path) => read_fields(path)?,
        None => FilterConfig::default(),
    };
    let columns = build_columns(&cli.columns, &rows);
    let filters: FilterValues = collect_filters(&cli.filters);

    tracing::info!(
        rows = rows.len(),
        columns = columns.len(),
        remote = cli.remote,
        "rendering table"
    );

    let mut output = if cli.remote {
        render_remote(cli, &config, rows, columns, fields, filters).await?
    } else {
        render_local(cli, &config, rows, columns, fields, &filters).await
    };
    output.push('\n');
    Ok(output)
}

fn read_rows(path: &Path) -> Result<Vec<Row>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading data file {}", path.display()))?;
    let json: serde_json::Value = serde_json::from_str(&contents)
        .with_context(|| format!("parsing data file {}", path.display()))?;
    let serde_json::Value::Array(items) = json else {
        bail!("{} must hold a JSON array of objects", path.display());
    };
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            Row::from_json(item).with_context(|| format!("row {i} is not a JSON object"))
        })
        .collect()
}

fn read_fields(path: &Path) -> Result<FilterConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading fields file {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("parsing fields file {}", path.display()))
}

/// Columns named on the command line, or every key of the first row.
///
/// Columns whose first value is a number are right-aligned.
fn build_columns(names: &[String], rows: &[Row]) -> Vec<Column> {
    let first = rows.first();
    let keys: Vec<String> = if names.is_empty() {
        first
            .map(|row| row.keys().map(String::from).collect())
            .unwrap_or_default()
    } else {
        names.to_vec()
    };

    keys.into_iter()
        .map(|key| {
            let numeric = first.is_some_and(|row| matches!(row.value(&key), Value::Number(_)));
            let column = Column::new(key.clone(), key).sortable();
            if numeric { column.numeric() } else { column }
        })
        .collect()
}

/// Repeated keys become a list of values.
fn collect_filters(pairs: &[(String, String)]) -> FilterValues {
    let mut values = FilterValues::new();
    for (key, value) in pairs {
        let merged = match values.remove(key) {
            None => FilterValue::Text(value.clone()),
            Some(FilterValue::Text(previous)) => {
                FilterValue::List(vec![previous, value.clone()])
            }
            Some(FilterValue::List(mut items)) => {
                items.push(value.clone());
                FilterValue::List(items)
            }
            Some(FilterValue::Null) => FilterValue::Text(value.clone()),
        };
        values.set(key.clone(), merged);
    }
    values
}

fn chips_line(chips: &[ActiveFilter]) -> Option<String> {
    if chips.is_empty() {
        return None;
    }
    let chips: Vec<String> = chips.iter().map(ToString::to_string).collect();
    Some(format!("Filters: {}", chips.join(", ")))
}

async fn render_local(
    cli: &Cli,
    config: &TableConfig,
    rows: Vec<Row>,
    columns: Vec<Column>,
    fields: FilterConfig,
    filters: &FilterValues,
) -> String {
    let mut filter = TableFilter::local(fields, rows);
    let rows = match filter.set_values(filters.clone()) {
        FilterChange::Filtered(rows) => rows,
        FilterChange::Delegated(_) => Vec::new(),
    };

    let mut table = LocalTable::new(rows, columns)
        .with_config(config)
        .searchable(cli.search.is_some());
    if let Some(size) = cli.page_size {
        table = table.page_size(size);
    }
    table.set_sort(cli.sort.clone());
    let id = table.id();

    let mut sim = ProgramSimulator::new(table);
    if let Some(search) = &cli.search {
        sim.send(Message::new(SearchInputMsg {
            id,
            text: search.clone(),
        }));
    }
    sim.send(Message::new(PageNavMsg {
        id,
        nav: PageNav::Goto(cli.page),
    }));
    sim.run_until_idle().await;

    let mut out = sim.model().view();
    if let Some(line) = chips_line(&filter.active_filters()) {
        out.push('\n');
        out.push_str(&line);
    }
    out
}

async fn render_remote(
    cli: &Cli,
    config: &TableConfig,
    rows: Vec<Row>,
    columns: Vec<Column>,
    fields: FilterConfig,
    filters: FilterValues,
) -> Result<String> {
    let mut source = MemorySource::new(rows).filter_config(fields.clone());
    if cli.latency_ms > 0 {
        source = source.latency(Duration::from_millis(cli.latency_ms));
    }

    let mut table = RemoteTable::new(columns, source)
        .with_config(config)
        .filter_config(fields)
        .searchable(cli.search.is_some())
        .with_search(cli.search.clone().unwrap_or_default())
        .with_page(cli.page)
        .with_filters(filters);
    if let Some(size) = cli.page_size {
        table = table.page_size(size);
    }
    if let Some(sort) = &cli.sort {
        table = table.with_sort(sort.clone());
    }

    let mut sim = ProgramSimulator::new(table);
    sim.run_until_idle().await;
    let table = sim.model();

    if let Some(error) = table.error() {
        let mut toasts = ToastStack::from_config(config);
        toasts.error(error);
        bail!("{}", toasts.view());
    }

    let mut out = table.view();
    if let Some(line) = chips_line(&table.active_filters()) {
        out.push('\n');
        out.push_str(&line);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_filters_merges_repeated_keys() {
        let pairs = vec![
            ("tag".to_string(), "a".to_string()),
            ("status".to_string(), "Ativo".to_string()),
            ("tag".to_string(), "b".to_string()),
            ("tag".to_string(), "c".to_string()),
        ];
        let values = collect_filters(&pairs);
        assert_eq!(values.get("status"), Some(&FilterValue::from("Ativo")));
        assert_eq!(values.get("tag"), Some(&FilterValue::from(vec!["a", "b", "c"])));
    }

    #[test]
    fn test_build_columns_from_first_row() {
        let rows = vec![row! { "name" => "Ana", "age" => 30 }];
        let columns = build_columns(&[], &rows);
        let keys: Vec<&str> = columns.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["age", "name"]);
        assert!(columns[0].numeric);
        assert!(!columns[1].numeric);
        assert!(columns.iter().all(|c| c.sortable));
    }

    #[test]
    fn test_build_columns_from_names() {
        let rows = vec![row! { "name" => "Ana" }];
        let columns = build_columns(&["missing".to_string()], &rows);
        assert_eq!(columns.len(), 1);
        assert!(!columns[0].numeric);
    }
}
