//! E2E integration tests for the table components driven as models.
//!
//! Test categories:
//! - Lifecycle tests: init -> update -> view
//! - Fetch contract tests: remote table against a data source
//! - Filter tests: the filter builder feeding both engines

#![forbid(unsafe_code)]

use std::time::Duration;

use mesa::prelude::*;

fn statuses() -> Vec<Row> {
    vec![
        row! { "id" => 1, "name" => "Ana", "status" => "Ativo" },
        row! { "id" => 2, "name" => "Bruno", "status" => "Inativo" },
        row! { "id" => 3, "name" => "Carla", "status" => "Ativo" },
    ]
}

fn numbered(n: usize) -> Vec<Row> {
    (1..=n)
        .map(|i| {
            let status = if i % 2 == 0 { "Ativo" } else { "Inativo" };
            row! { "id" => i, "name" => format!("user {i:02}"), "status" => status }
        })
        .collect()
}

fn columns() -> Vec<Column> {
    vec![
        Column::new("id", "ID").sortable().numeric(),
        Column::new("name", "Name").sortable(),
        Column::new("status", "Status"),
    ]
}

fn status_config() -> FilterConfig {
    FilterConfig::new(vec![FilterField::radio(
        "status",
        "Status",
        vec![
            FilterOption::new("Ativo", "Active"),
            FilterOption::new("Inativo", "Inactive"),
        ],
    )])
}

// ============================================================================
// Local Table Tests
// ============================================================================

mod local_tests {
    use super::*;

    #[test]
    fn test_local_lifecycle_through_messages() {
        let table = LocalTable::new(numbered(25), columns()).searchable(true);
        let id = table.id();
        let mut sim = ProgramSimulator::new(table);
        sim.init();

        sim.send(Message::new(HeaderClickMsg {
            id,
            key: "id".into(),
        }));
        sim.send(Message::new(HeaderClickMsg {
            id,
            key: "id".into(),
        }));
        sim.send(Message::new(PageNavMsg {
            id,
            nav: PageNav::Next,
        }));
        for _ in 0..3 {
            assert!(sim.step().is_none());
        }
        assert!(sim.is_idle());

        let table = sim.model();
        assert_eq!(table.page(), 2);
        let ids: Vec<String> = table
            .visible_rows()
            .iter()
            .map(|r| r.value("id").to_string())
            .collect();
        assert_eq!(ids.first().map(String::as_str), Some("15"));
        assert_eq!(ids.last().map(String::as_str), Some("6"));

        let view = sim.last_view().expect("view");
        assert!(view.contains("ID ▼"));
        assert!(view.contains("Page 2 of 3 · 25 total · 1 [2] 3"));
    }

    #[test]
    fn test_local_search_message_resets_page() {
        let mut table = LocalTable::new(numbered(40), columns());
        table.goto_page(4);

        let mut sim = ProgramSimulator::new(table);
        sim.send(Message::new(SearchInputMsg {
            id: 0,
            text: "USER 1".into(),
        }));
        sim.step();

        assert_eq!(sim.model().page(), 1);
        assert_eq!(sim.model().processed_rows().len(), 10);
    }

    #[test]
    fn test_local_filter_feeds_table() {
        let mut filter = TableFilter::local(status_config(), statuses());
        let mut table = LocalTable::new(statuses(), columns());

        filter.set_value("status", "Ativo");
        if let FilterChange::Filtered(rows) = filter.apply() {
            table.set_data(rows);
        }
        let names: Vec<String> = table
            .visible_rows()
            .iter()
            .map(|r| r.value("name").to_string())
            .collect();
        assert_eq!(names, vec!["Ana", "Carla"]);

        if let FilterChange::Filtered(rows) = filter.clear() {
            table.set_data(rows);
        }
        assert_eq!(table.visible_rows().len(), 3);
    }

    #[test]
    fn test_local_empty_state() {
        let table = LocalTable::new(Vec::new(), columns()).empty_message("Nada");
        assert_eq!(table.total_pages(), 0);
        assert!(table.visible_rows().is_empty());
        assert!(table.view().contains("Nada"));
    }

    #[test]
    fn test_view_snapshot() {
        let table = LocalTable::new(statuses(), columns());
        insta::assert_snapshot!(table.view(), @r"
        ID │ Name  │ Status
        ───┼───────┼────────
         1 │ Ana   │ Ativo
         2 │ Bruno │ Inativo
         3 │ Carla │ Ativo
        Page 1 of 1 · 3 total · [1]
        ");
    }

    #[test]
    fn test_custom_render_in_view() {
        let columns = vec![
            Column::new("name", "Name"),
            Column::new("status", "Status")
                .render(|value, row| format!("{value} (#{})", row.value("id"))),
        ];
        let table = LocalTable::new(statuses(), columns);
        assert!(table.view().contains("Inativo (#2)"));
    }
}

// ============================================================================
// Remote Table Tests
// ============================================================================

mod remote_tests {
    use super::*;

    fn fixed_page() -> TablePage {
        TablePage {
            data: statuses(),
            total: 57,
            page: 2,
            page_size: 20,
            total_pages: 3,
        }
    }

    #[tokio::test]
    async fn test_fetch_round_trip_renders_response_verbatim() {
        let source = |_params: FetchParams| async { Ok::<_, FetchError>(fixed_page()) };
        let table = RemoteTable::new(columns(), source);
        assert_eq!(table.page(), 1);
        let mut sim = ProgramSimulator::new(table);
        sim.run_until_idle().await;

        let table = sim.model();
        assert_eq!(table.data(), fixed_page().data.as_slice());
        assert_eq!(table.page(), 2);
        assert_eq!(table.total_pages(), 3);
        assert_eq!(table.total(), 57);

        let view = sim.last_view().expect("view");
        assert!(view.contains("Page 2 of 3 · 57 total"));
        for name in ["Ana", "Bruno", "Carla"] {
            assert!(view.contains(name));
        }
    }

    #[tokio::test]
    async fn test_memory_source_lifecycle() {
        let source = MemorySource::new(numbered(57)).filter_config(status_config());
        let log = source.clone();
        let table = RemoteTable::new(columns(), source)
            .filter_config(status_config())
            .searchable(true);
        let id = table.id();

        let mut sim = ProgramSimulator::new(table);
        sim.run_until_idle().await;
        assert_eq!(sim.model().total(), 57);
        assert_eq!(sim.model().data().len(), 20);

        sim.send(Message::new(PageNavMsg {
            id,
            nav: PageNav::Last,
        }));
        sim.run_until_idle().await;
        assert_eq!(sim.model().page(), 3);
        assert_eq!(sim.model().data().len(), 17);

        let cmd = {
            let table = sim.model_mut();
            let filter = table.filter_mut().expect("filter drawer");
            filter.open();
            filter.set_value("status", "Ativo");
            table.apply_filters()
        };
        sim.dispatch(cmd);
        sim.run_until_idle().await;

        let table = sim.model();
        assert_eq!(table.page(), 1);
        assert_eq!(table.total(), 28);
        assert_eq!(table.total_pages(), 2);
        assert!(sim.last_view().expect("view").contains("[Status: Active ×]"));

        let requests = log.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[1].page, 3);
        assert_eq!(requests[2].page, 1);
        assert_eq!(
            requests[2].filters,
            Some(FilterValues::new().with("status", "Ativo"))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_burst_sends_one_request_on_page_one() {
        let source = MemorySource::new(numbered(57));
        let log = source.clone();
        let table = RemoteTable::new(columns(), source).searchable(true);
        let id = table.id();
        let mut sim = ProgramSimulator::new(table);
        sim.run_until_idle().await;

        sim.send(Message::new(PageNavMsg {
            id,
            nav: PageNav::Goto(3),
        }));
        sim.run_until_idle().await;
        assert_eq!(sim.model().page(), 3);

        for text in ["u", "us", "user 0"] {
            sim.send(Message::new(SearchInputMsg {
                id,
                text: text.into(),
            }));
        }
        sim.run_until_idle().await;

        let requests = log.requests();
        assert_eq!(requests.len(), 3);
        let last = requests.last().expect("search request");
        assert_eq!(last.page, 1);
        assert_eq!(last.search.as_deref(), Some("user 0"));
        assert_eq!(sim.model().total(), 9);
    }

    #[tokio::test]
    async fn test_failure_then_retry() {
        let source = MemorySource::new(numbered(5));
        let control = source.clone();
        control.fail_next(FetchError::Status {
            code: 503,
            message: String::new(),
        });

        let table = RemoteTable::new(columns(), source);
        let id = table.id();
        let mut sim = ProgramSimulator::new(table);
        sim.run_until_idle().await;

        assert_eq!(sim.model().error(), Some("Failed to load data"));
        assert!(sim.model().data().is_empty());
        assert!(
            sim.last_view()
                .expect("view")
                .contains("! Failed to load data [Retry]")
        );

        sim.send(Message::new(RetryMsg { id }));
        sim.run_until_idle().await;
        assert_eq!(sim.model().error(), None);
        assert_eq!(sim.model().data().len(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_loading_is_visible_while_fetch_is_pending() {
        let source = MemorySource::new(numbered(5)).latency(Duration::from_millis(200));
        let mut table = RemoteTable::new(columns(), source);
        let cmd = table.init().expect("initial load");
        assert!(table.is_loading());
        assert!(table.view().contains("Loading..."));

        let msg = cmd.execute().await.expect("loaded");
        table.update(msg);
        assert!(!table.is_loading());
    }

    #[test]
    fn test_pagination_window_examples() {
        let three = Paginator::new().total_pages(3);
        assert_eq!(
            three.window(),
            vec![PageItem::Page(1), PageItem::Page(2), PageItem::Page(3)]
        );

        let mut twenty = Paginator::new().total_pages(20);
        twenty.set_page(10);
        assert_eq!(
            twenty.window(),
            vec![
                PageItem::Page(1),
                PageItem::Ellipsis,
                PageItem::Page(8),
                PageItem::Page(9),
                PageItem::Page(10),
                PageItem::Page(11),
                PageItem::Page(12),
                PageItem::Ellipsis,
                PageItem::Page(20),
            ]
        );
    }
}

// ============================================================================
// Filter Tests
// ============================================================================

mod filter_tests {
    use super::*;

    #[test]
    fn test_radio_ativo_keeps_two_rows_in_order() {
        let rows = vec![
            row! { "status" => "Ativo", "n" => 1 },
            row! { "status" => "Inativo", "n" => 2 },
            row! { "status" => "Ativo", "n" => 3 },
        ];
        let mut filter = TableFilter::local(status_config(), rows);
        filter.set_value("status", "Ativo");
        let FilterChange::Filtered(kept) = filter.apply() else {
            panic!("local filter delegated");
        };
        let ns: Vec<String> = kept.iter().map(|r| r.value("n").to_string()).collect();
        assert_eq!(ns, vec!["1", "3"]);
    }

    #[test]
    fn test_inactive_values_do_not_filter() {
        for inactive in [
            FilterValue::Null,
            FilterValue::Text(String::new()),
            FilterValue::List(Vec::new()),
        ] {
            let mut filter = TableFilter::local(status_config(), statuses());
            filter.set_value("status", inactive);
            let FilterChange::Filtered(kept) = filter.apply() else {
                panic!("local filter delegated");
            };
            assert_eq!(kept, statuses());
            assert!(filter.active_filters().is_empty());
        }
    }

    #[test]
    fn test_row_click_through_simulator() {
        let table = LocalTable::new(statuses(), columns());
        let id = table.id();
        let mut sim = ProgramSimulator::new(table);
        sim.send(Message::new(RowClickMsg { id, index: 2 }));
        let cmd = sim.step().expect("row click command");
        let msg = futures::executor::block_on(cmd.execute()).expect("message");
        let clicked = msg.downcast::<RowClickedMsg>().expect("row clicked");
        assert_eq!(clicked.id, id);
        assert_eq!(clicked.row.render_key(2), "3");
    }
}
