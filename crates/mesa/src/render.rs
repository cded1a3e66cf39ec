//! Plain-text rendering shared by the table views.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::column::Column;
use crate::paginator::Paginator;
use crate::row::Row;
use crate::sort::SortState;

/// Widest a column grows when its width is computed from content.
const MAX_AUTO_WIDTH: usize = 32;

const SEPARATOR: &str = " │ ";

/// Truncates a string to the given display width, adding an ellipsis if needed.
pub(crate) fn truncate(s: &str, width: usize) -> String {
    if s.width() <= width {
        return s.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Truncates then pads to exactly `width` display columns.
pub(crate) fn fit(s: &str, width: usize, right_align: bool) -> String {
    let cell = truncate(s, width);
    let pad = " ".repeat(width.saturating_sub(cell.width()));
    if right_align {
        format!("{pad}{cell}")
    } else {
        format!("{cell}{pad}")
    }
}

fn header_label(column: &Column, sort: Option<&SortState>) -> String {
    match sort {
        Some(state) if state.key == column.key => {
            format!("{} {}", column.header, state.direction.indicator())
        }
        _ => column.header.clone(),
    }
}

/// Renders the header, a rule and one line per row.
pub(crate) fn grid(columns: &[Column], sort: Option<&SortState>, rows: &[&Row]) -> Vec<String> {
    let headers: Vec<String> = columns.iter().map(|c| header_label(c, sort)).collect();
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| columns.iter().map(|c| c.cell(row).to_string()).collect())
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            column.width.unwrap_or_else(|| {
                cells
                    .iter()
                    .map(|line| line[i].width())
                    .chain(std::iter::once(headers[i].width()))
                    .max()
                    .unwrap_or(0)
                    .min(MAX_AUTO_WIDTH)
            })
        })
        .collect();

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(join_line(
        headers
            .iter()
            .zip(&widths)
            .map(|(h, &w)| fit(h, w, false)),
    ));
    lines.push(
        widths
            .iter()
            .map(|&w| "─".repeat(w))
            .collect::<Vec<_>>()
            .join("─┼─"),
    );
    for line in &cells {
        lines.push(join_line(
            line.iter()
                .zip(columns.iter().zip(&widths))
                .map(|(cell, (column, &w))| fit(cell, w, column.numeric)),
        ));
    }
    lines
}

/// Status line under the grid: `Page 2 of 3 · 57 total · 1 [2] 3`.
pub(crate) fn footer(paginator: &Paginator, total: usize) -> String {
    let window = paginator.window_view();
    if window.is_empty() {
        format!("{} · {total} total", paginator.view())
    } else {
        format!("{} · {total} total · {window}", paginator.view())
    }
}

/// The search line: the current text, or the placeholder when empty.
pub(crate) fn search_line(text: &str, placeholder: &str) -> String {
    if text.is_empty() {
        format!("Search: [{placeholder}]")
    } else {
        format!("Search: [{text}]")
    }
}

fn join_line(cells: impl Iterator<Item = String>) -> String {
    let line = cells.collect::<Vec<_>>().join(SEPARATOR);
    line.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Hello", 10), "Hello");
        assert_eq!(truncate("Hello World", 5), "Hell…");
        assert_eq!(truncate("Hi", 2), "Hi");
        assert_eq!(truncate("", 5), "");
        assert_eq!(truncate("Hello", 0), "");
    }

    #[test]
    fn test_truncate_wide_chars() {
        // Each CJK character is two columns wide.
        assert_eq!(truncate("日本語テキスト", 5), "日本…");
        assert_eq!(truncate("日本", 4), "日本");
    }

    #[test]
    fn test_fit_alignment() {
        assert_eq!(fit("7", 3, true), "  7");
        assert_eq!(fit("ab", 4, false), "ab  ");
        assert_eq!(fit("abcdef", 4, false), "abc…");
    }

    #[test]
    fn test_grid_layout() {
        let columns = vec![
            Column::new("name", "Name"),
            Column::new("qty", "Qty").numeric(),
        ];
        let a = row! { "name" => "Ana", "qty" => 5 };
        let b = row! { "name" => "Bruno", "qty" => 12 };
        let sort = SortState::descending("qty");
        let lines = grid(&columns, Some(&sort), &[&a, &b]);

        assert_eq!(lines[0], "Name  │ Qty ▼");
        assert_eq!(lines[1], "──────┼──────");
        assert_eq!(lines[2], "Ana   │     5");
        assert_eq!(lines[3], "Bruno │    12");
    }

    #[test]
    fn test_footer() {
        let mut p = Paginator::new().per_page(20);
        p.set_total_pages(3);
        p.set_page(2);
        assert_eq!(footer(&p, 57), "Page 2 of 3 · 57 total · 1 [2] 3");
        assert_eq!(footer(&Paginator::new(), 0), "Page 1 of 1 · 0 total");
    }

    #[test]
    fn test_grid_fixed_width_truncates() {
        let columns = vec![Column::new("name", "Name").width(4)];
        let r = row! { "name" => "Alexandra" };
        let lines = grid(&columns, None, &[&r]);
        assert_eq!(lines[2], "Ale…");
    }
}
