//! Pagination state and the windowed page list.
//!
//! Pages are 1-based. The total page count is either derived from an item
//! count (local tables) or reported by a data source (remote tables).
//!
//! # Example
//!
//! ```rust
//! use mesa::paginator::{PageItem, Paginator};
//!
//! let mut paginator = Paginator::new().per_page(10);
//! paginator.set_total_pages_from_items(200);
//! paginator.set_page(10);
//!
//! let items = paginator.window();
//! assert_eq!(items.first(), Some(&PageItem::Page(1)));
//! assert_eq!(items.last(), Some(&PageItem::Page(20)));
//!
//! let (start, end) = paginator.get_slice_bounds(200);
//! assert_eq!((start, end), (90, 100));
//! ```

use std::fmt;

/// Default number of numbered buttons in the page window.
pub const DEFAULT_MAX_BUTTONS: usize = 5;

/// One entry of the rendered page list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    /// A numbered page button.
    Page(usize),
    /// A gap of skipped pages.
    Ellipsis,
}

impl fmt::Display for PageItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Page(n) => write!(f, "{n}"),
            Self::Ellipsis => f.write_str("..."),
        }
    }
}

/// Pagination model.
#[derive(Debug, Clone)]
pub struct Paginator {
    /// Current page (1-based).
    page: usize,
    /// Items per page.
    per_page: usize,
    /// Total number of pages; zero when there are no items.
    total_pages: usize,
    /// Most numbered buttons shown by [`Paginator::window`].
    max_buttons: usize,
    /// Format string for the status line: page, then total pages.
    pub status_format: String,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new()
    }
}

impl Paginator {
    /// Creates a new paginator with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            page: 1,
            per_page: 1,
            total_pages: 0,
            max_buttons: DEFAULT_MAX_BUTTONS,
            status_format: "Page {} of {}".to_string(),
        }
    }

    /// Sets the number of items per page.
    #[must_use]
    pub fn per_page(mut self, n: usize) -> Self {
        self.per_page = n.max(1);
        self
    }

    /// Sets the total number of pages.
    #[must_use]
    pub fn total_pages(mut self, n: usize) -> Self {
        self.total_pages = n;
        self.clamp();
        self
    }

    /// Sets the most numbered buttons in the page window.
    #[must_use]
    pub fn max_buttons(mut self, n: usize) -> Self {
        self.max_buttons = n.max(1);
        self
    }

    /// Returns the current page (1-based).
    #[must_use]
    pub fn page(&self) -> usize {
        self.page
    }

    /// Sets the current page, clamped to `[1, last page]`.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.clamp(1, self.max_page());
    }

    /// Returns the items per page.
    #[must_use]
    pub fn get_per_page(&self) -> usize {
        self.per_page
    }

    /// Sets the items per page, keeping the current page in range.
    pub fn set_per_page(&mut self, n: usize) {
        self.per_page = n.max(1);
    }

    /// Returns the total number of pages.
    #[must_use]
    pub fn get_total_pages(&self) -> usize {
        self.total_pages
    }

    /// Sets the total number of pages as reported by a data source.
    pub fn set_total_pages(&mut self, n: usize) {
        self.total_pages = n;
        self.clamp();
    }

    /// Calculates and sets the total pages from an item count.
    ///
    /// Returns the calculated total pages (`ceil(items / per_page)`).
    pub fn set_total_pages_from_items(&mut self, items: usize) -> usize {
        self.total_pages = items.div_ceil(self.per_page);
        self.clamp();
        self.total_pages
    }

    /// Returns the number of items on the current page.
    #[must_use]
    pub fn items_on_page(&self, total_items: usize) -> usize {
        let (start, end) = self.get_slice_bounds(total_items);
        end - start
    }

    /// Returns slice bounds for the current page.
    ///
    /// Both bounds are clamped to `length`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mesa::paginator::Paginator;
    ///
    /// let items = vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10];
    /// let mut paginator = Paginator::new().per_page(3);
    /// paginator.set_total_pages_from_items(items.len());
    ///
    /// let (start, end) = paginator.get_slice_bounds(items.len());
    /// assert_eq!(&items[start..end], &[1, 2, 3]);
    /// ```
    #[must_use]
    pub fn get_slice_bounds(&self, length: usize) -> (usize, usize) {
        let start = (self.page - 1).saturating_mul(self.per_page).min(length);
        let end = start.saturating_add(self.per_page).min(length);
        (start, end)
    }

    /// Navigates to the previous page.
    pub fn prev_page(&mut self) {
        if self.page > 1 {
            self.page -= 1;
        }
    }

    /// Navigates to the next page.
    pub fn next_page(&mut self) {
        if !self.on_last_page() {
            self.page += 1;
        }
    }

    /// Navigates to the first page.
    pub fn first_page(&mut self) {
        self.page = 1;
    }

    /// Navigates to the last page.
    pub fn last_page(&mut self) {
        self.page = self.max_page();
    }

    /// Returns whether we're on the last page.
    #[must_use]
    pub fn on_last_page(&self) -> bool {
        self.page >= self.max_page()
    }

    /// Returns whether we're on the first page.
    #[must_use]
    pub fn on_first_page(&self) -> bool {
        self.page == 1
    }

    fn max_page(&self) -> usize {
        self.total_pages.max(1)
    }

    fn clamp(&mut self) {
        self.page = self.page.clamp(1, self.max_page());
    }

    /// The page buttons to render around the current page.
    ///
    /// With no more than `max_buttons` pages every page is listed. Otherwise
    /// a window of `max_buttons` pages starts `max_buttons / 2` before the
    /// current page, bracketed by the first and last pages with an ellipsis
    /// marking each skipped range.
    #[must_use]
    pub fn window(&self) -> Vec<PageItem> {
        let total = self.total_pages;
        if total <= self.max_buttons {
            return (1..=total).map(PageItem::Page).collect();
        }

        let start = self.page.saturating_sub(self.max_buttons / 2).max(1);
        let end = (start + self.max_buttons - 1).min(total);

        let mut items = Vec::with_capacity(self.max_buttons + 4);
        if start > 1 {
            items.push(PageItem::Page(1));
            if start > 2 {
                items.push(PageItem::Ellipsis);
            }
        }
        items.extend((start..=end).map(PageItem::Page));
        if end < total {
            if end < total - 1 {
                items.push(PageItem::Ellipsis);
            }
            items.push(PageItem::Page(total));
        }
        items
    }

    /// Renders the page window, marking the current page: `1 ... [10] ... 20`.
    #[must_use]
    pub fn window_view(&self) -> String {
        self.window()
            .iter()
            .map(|item| match item {
                PageItem::Page(n) if *n == self.page => format!("[{n}]"),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Renders the status line, e.g. `Page 2 of 3`.
    #[must_use]
    pub fn view(&self) -> String {
        // Replace first {} with current page, second {} with total pages
        self.status_format
            .replacen("{}", &self.page.to_string(), 1)
            .replacen("{}", &self.max_page().to_string(), 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(items: &[PageItem]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_paginator_new() {
        let p = Paginator::new();
        assert_eq!(p.page(), 1);
        assert_eq!(p.get_per_page(), 1);
        assert_eq!(p.get_total_pages(), 0);
    }

    #[test]
    fn test_paginator_navigation_clamps() {
        let mut p = Paginator::new().total_pages(5);

        assert!(p.on_first_page());
        p.prev_page();
        assert_eq!(p.page(), 1);

        p.next_page();
        assert_eq!(p.page(), 2);

        p.last_page();
        assert_eq!(p.page(), 5);
        assert!(p.on_last_page());

        p.next_page();
        assert_eq!(p.page(), 5);

        p.set_page(99);
        assert_eq!(p.page(), 5);
        p.set_page(0);
        assert_eq!(p.page(), 1);

        p.set_page(3);
        p.first_page();
        assert_eq!(p.page(), 1);
    }

    #[test]
    fn test_paginator_empty_stays_on_page_one() {
        let mut p = Paginator::new().per_page(10);
        assert_eq!(p.set_total_pages_from_items(0), 0);
        p.next_page();
        assert_eq!(p.page(), 1);
        assert!(p.on_first_page());
        assert!(p.on_last_page());
        assert_eq!(p.get_slice_bounds(0), (0, 0));
    }

    #[test]
    fn test_paginator_slice_bounds() {
        let mut p = Paginator::new().per_page(3);
        p.set_total_pages_from_items(10);

        assert_eq!(p.get_slice_bounds(10), (0, 3));
        p.next_page();
        assert_eq!(p.get_slice_bounds(10), (3, 6));
        p.next_page();
        assert_eq!(p.get_slice_bounds(10), (6, 9));
        p.next_page();
        assert_eq!(p.get_slice_bounds(10), (9, 10));
        assert_eq!(p.items_on_page(10), 1);
    }

    #[test]
    fn test_set_total_pages_from_items() {
        let mut p = Paginator::new().per_page(10);
        assert_eq!(p.set_total_pages_from_items(25), 3);
        assert_eq!(p.set_total_pages_from_items(20), 2);
        assert_eq!(p.set_total_pages_from_items(1), 1);
    }

    #[test]
    fn test_shrinking_total_clamps_page() {
        let mut p = Paginator::new().per_page(10);
        p.set_total_pages_from_items(100);
        p.set_page(10);
        p.set_total_pages_from_items(15);
        assert_eq!(p.page(), 2);
    }

    #[test]
    fn test_window_small_total_lists_all() {
        let p = Paginator::new().total_pages(3);
        assert_eq!(
            p.window(),
            vec![PageItem::Page(1), PageItem::Page(2), PageItem::Page(3)]
        );
        assert!(Paginator::new().window().is_empty());
    }

    #[test]
    fn test_window_middle() {
        let mut p = Paginator::new().total_pages(20);
        p.set_page(10);
        assert_eq!(
            pages(&p.window()),
            vec!["1", "...", "8", "9", "10", "11", "12", "...", "20"]
        );
    }

    #[test]
    fn test_window_edges() {
        let mut p = Paginator::new().total_pages(20);
        assert_eq!(pages(&p.window()), vec!["1", "2", "3", "4", "5", "...", "20"]);

        p.set_page(4);
        assert_eq!(pages(&p.window()), vec!["1", "2", "3", "4", "5", "6", "...", "20"]);

        p.set_page(20);
        assert_eq!(pages(&p.window()), vec!["1", "...", "18", "19", "20"]);

        p.set_page(17);
        assert_eq!(pages(&p.window()), vec!["1", "...", "15", "16", "17", "18", "19", "20"]);
    }

    #[test]
    fn test_window_six_pages() {
        let mut p = Paginator::new().total_pages(6);
        p.set_page(4);
        assert_eq!(pages(&p.window()), vec!["1", "2", "3", "4", "5", "6"]);
    }

    #[test]
    fn test_views() {
        let mut p = Paginator::new().total_pages(20);
        p.set_page(10);
        assert_eq!(p.view(), "Page 10 of 20");
        assert_eq!(p.window_view(), "1 ... 8 9 [10] 11 12 ... 20");
        assert_eq!(Paginator::new().view(), "Page 1 of 1");
    }
}
