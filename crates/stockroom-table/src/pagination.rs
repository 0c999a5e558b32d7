//! Pagination state for the row model
//!
//! Page navigation is always clamped against the current filtered row
//! count: `0 <= page_index <= last_page_index(total)` holds after every
//! operation, and an empty table still has one (empty) page.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Page sizes offered by page-size selectors
pub const DEFAULT_PAGE_SIZE_OPTIONS: &[usize] = &[10, 20, 30, 40, 50];

/// Pagination state for a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredPagination")]
pub struct PaginationState {
    /// Current page (0-indexed)
    page_index: usize,
    /// Rows per page, never zero
    page_size: usize,
    /// Available page size options
    page_size_options: Vec<usize>,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE_OPTIONS[0])
    }
}

/// Persisted form; goes through the same checks as [`PaginationState::new`]
#[derive(Deserialize)]
#[serde(default)]
struct StoredPagination {
    page_index: usize,
    page_size: usize,
    page_size_options: Vec<usize>,
}

impl Default for StoredPagination {
    fn default() -> Self {
        Self {
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE_OPTIONS[0],
            page_size_options: DEFAULT_PAGE_SIZE_OPTIONS.to_vec(),
        }
    }
}

impl From<StoredPagination> for PaginationState {
    fn from(stored: StoredPagination) -> Self {
        let mut state =
            Self::new(stored.page_size).with_page_size_options(stored.page_size_options);
        // Clamped against the row count by the owning table
        state.page_index = stored.page_index;
        state
    }
}

impl PaginationState {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_index: 0,
            page_size: page_size.max(1),
            page_size_options: DEFAULT_PAGE_SIZE_OPTIONS.to_vec(),
        }
    }

    pub fn with_page_size_options(mut self, options: Vec<usize>) -> Self {
        self.page_size_options = options.into_iter().filter(|&n| n > 0).collect();
        self
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_size_options(&self) -> &[usize] {
        &self.page_size_options
    }

    /// Number of pages for `total_rows`; at least one
    pub fn page_count(&self, total_rows: usize) -> usize {
        total_rows.div_ceil(self.page_size).max(1)
    }

    pub fn last_page_index(&self, total_rows: usize) -> usize {
        self.page_count(total_rows) - 1
    }

    pub fn can_previous_page(&self) -> bool {
        self.page_index > 0
    }

    pub fn can_next_page(&self, total_rows: usize) -> bool {
        self.page_index < self.last_page_index(total_rows)
    }

    pub fn first_page(&mut self) {
        self.page_index = 0;
    }

    pub fn previous_page(&mut self) {
        self.page_index = self.page_index.saturating_sub(1);
    }

    pub fn next_page(&mut self, total_rows: usize) {
        if self.can_next_page(total_rows) {
            self.page_index += 1;
        }
    }

    pub fn last_page(&mut self, total_rows: usize) {
        self.page_index = self.last_page_index(total_rows);
    }

    /// Navigate to a specific page, clamped into range
    pub fn go_to_page(&mut self, page_index: usize, total_rows: usize) {
        self.page_index = page_index.min(self.last_page_index(total_rows));
    }

    /// Change the page size and re-clamp the page index. Zero is ignored.
    pub fn set_page_size(&mut self, page_size: usize, total_rows: usize) -> bool {
        if page_size == 0 {
            tracing::trace!("ignoring zero page size");
            return false;
        }
        self.page_size = page_size;
        self.clamp(total_rows);
        true
    }

    /// Pull the page index back inside `[0, last_page_index]`
    pub fn clamp(&mut self, total_rows: usize) {
        let last = self.last_page_index(total_rows);
        if self.page_index > last {
            tracing::debug!(from = self.page_index, to = last, "clamping page index");
            self.page_index = last;
        }
    }

    /// Row range of the current page within `total_rows`
    pub fn page_range(&self, total_rows: usize) -> Range<usize> {
        let start = (self.page_index * self.page_size).min(total_rows);
        let end = (start + self.page_size).min(total_rows);
        start..end
    }

    /// Status text, e.g. "Page 2 of 5 (42 rows)"
    pub fn status_text(&self, total_rows: usize) -> String {
        format!(
            "Page {} of {} ({} {})",
            self.page_index + 1,
            self.page_count(total_rows),
            total_rows,
            if total_rows == 1 { "row" } else { "rows" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_count_never_zero() {
        let state = PaginationState::new(10);
        assert_eq!(state.page_count(0), 1);
        assert_eq!(state.page_count(10), 1);
        assert_eq!(state.page_count(11), 2);
        assert_eq!(state.last_page_index(0), 0);
    }

    #[test]
    fn test_navigation_is_clamped() {
        let mut state = PaginationState::new(10);
        let total = 25;

        state.previous_page();
        assert_eq!(state.page_index(), 0);

        state.next_page(total);
        state.next_page(total);
        state.next_page(total);
        assert_eq!(state.page_index(), 2);
        assert!(!state.can_next_page(total));

        state.first_page();
        assert_eq!(state.page_index(), 0);

        state.last_page(total);
        assert_eq!(state.page_index(), 2);
        assert_eq!(state.page_range(total), 20..25);

        state.go_to_page(99, total);
        assert_eq!(state.page_index(), 2);
    }

    #[test]
    fn test_last_page_slice_length() {
        for total in 0..40usize {
            for size in 1..12usize {
                let mut state = PaginationState::new(size);
                state.last_page(total);
                state.next_page(total);
                assert_eq!(state.page_index(), state.last_page_index(total));

                let expected = total
                    .saturating_sub(state.page_index() * size)
                    .min(size);
                assert_eq!(state.page_range(total).len(), expected, "total={total} size={size}");
            }
        }
    }

    #[test]
    fn test_set_page_size_reclamps() {
        let mut state = PaginationState::new(10);
        state.last_page(95);
        assert_eq!(state.page_index(), 9);

        assert!(state.set_page_size(50, 95));
        assert_eq!(state.page_index(), 1);

        assert!(!state.set_page_size(0, 95));
        assert_eq!(state.page_size(), 50);
    }

    #[test]
    fn test_status_text() {
        let mut state = PaginationState::new(20);
        state.next_page(42);
        assert_eq!(state.status_text(42), "Page 2 of 3 (42 rows)");
        assert_eq!(PaginationState::new(20).status_text(1), "Page 1 of 1 (1 row)");
    }

    #[test]
    fn test_deserialized_state_keeps_page_size_positive() {
        let state: PaginationState = serde_json::from_str(
            r#"{"page_index": 3, "page_size": 0, "page_size_options": [0, 25]}"#,
        )
        .unwrap();

        assert_eq!(state.page_size(), 1);
        assert_eq!(state.page_size_options(), &[25]);
        assert_eq!(state.page_count(0), 1);
        assert_eq!(state.page_count(5), 5);
    }

    #[test]
    fn test_deserialized_state_fills_missing_fields() {
        let state: PaginationState = serde_json::from_str(r#"{"page_size": 20}"#).unwrap();
        assert_eq!(state.page_index(), 0);
        assert_eq!(state.page_size(), 20);
        assert_eq!(state.page_size_options(), DEFAULT_PAGE_SIZE_OPTIONS);

        let saved = serde_json::to_string(&state).unwrap();
        assert_eq!(serde_json::from_str::<PaginationState>(&saved).unwrap(), state);
    }
}
