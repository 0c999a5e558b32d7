//! The row model
//!
//! `DataTable` owns the source rows, the column definitions and every piece
//! of view state. Each mutation of filter, sort or pagination state re-runs
//! the whole pipeline (filter → sort → clamp → slice) from the source rows;
//! no intermediate stage output survives a change to an earlier stage.

use std::collections::{HashMap, HashSet};
use std::ops::Range;
use std::sync::Arc;

use stockroom_core::{Result, RowId, StockroomError};

use crate::column::ColumnDef;
use crate::debounce::{FilterCommit, FilterField};
use crate::expansion::ExpansionState;
use crate::filter::{FilterState, FilterValue};
use crate::pagination::PaginationState;
use crate::sorting::{MultiColumnSort, SortColumn};
use crate::view::TableView;

type RowIdFn<T> = Arc<dyn Fn(&T, usize) -> RowId + Send + Sync>;

/// In-memory table with filter, sort, pagination and expansion state
pub struct DataTable<T> {
    rows: Vec<T>,
    columns: Vec<ColumnDef<T>>,
    row_id: RowIdFn<T>,
    /// `ids[i]` identifies `rows[i]`
    ids: Vec<RowId>,
    index_by_id: HashMap<RowId, usize>,
    hidden_columns: HashSet<String>,
    filters: FilterState,
    sorting: MultiColumnSort,
    pagination: PaginationState,
    expansion: ExpansionState,
    /// Source indices that passed the filter, in sorted order
    ordered: Vec<usize>,
    /// Slice of `ordered` shown on the current page
    page: Range<usize>,
}

impl<T> DataTable<T> {
    /// Create a table over `rows`. Column ids must be unique.
    ///
    /// Rows are identified by their source index until [`Self::with_row_id`]
    /// supplies a stable identity.
    pub fn new(rows: Vec<T>, columns: Vec<ColumnDef<T>>) -> Result<Self> {
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.id()) {
                return Err(StockroomError::DuplicateColumn(column.id().to_string()));
            }
        }

        let mut table = Self {
            rows,
            columns,
            row_id: Arc::new(|_, index| RowId::from(index)),
            ids: Vec::new(),
            index_by_id: HashMap::new(),
            hidden_columns: HashSet::new(),
            filters: FilterState::new(),
            sorting: MultiColumnSort::new(),
            pagination: PaginationState::default(),
            expansion: ExpansionState::new(),
            ordered: Vec::new(),
            page: 0..0,
        };
        table.reindex();
        table.recompute();
        Ok(table)
    }

    /// Identify rows by a key derived from the row itself
    pub fn with_row_id<F>(mut self, row_id: F) -> Self
    where
        F: Fn(&T) -> RowId + Send + Sync + 'static,
    {
        self.row_id = Arc::new(move |row, _| row_id(row));
        self.reindex();
        self.expansion.retain(|id| self.index_by_id.contains_key(id));
        self
    }

    pub fn with_pagination(mut self, pagination: PaginationState) -> Self {
        self.pagination = pagination;
        self.recompute();
        self
    }

    // -------------------------------------------------------------------------
    // Source rows and columns
    // -------------------------------------------------------------------------

    /// Replace the source rows.
    ///
    /// Expanded flags survive for every identity still present.
    pub fn set_rows(&mut self, rows: Vec<T>) {
        self.rows = rows;
        self.reindex();
        let index = &self.index_by_id;
        let dropped = self.expansion.retain(|id| index.contains_key(id));
        if dropped > 0 {
            tracing::debug!(dropped, "pruned expansion state for removed rows");
        }
        self.recompute();
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn columns(&self) -> &[ColumnDef<T>] {
        &self.columns
    }

    pub fn column(&self, column_id: &str) -> Option<&ColumnDef<T>> {
        self.columns.iter().find(|c| c.id() == column_id)
    }

    /// Look up a source row by identity
    pub fn row(&self, row_id: &RowId) -> Option<&T> {
        self.index_by_id.get(row_id).map(|&ix| &self.rows[ix])
    }

    pub fn row_id_at(&self, source_index: usize) -> Option<&RowId> {
        self.ids.get(source_index)
    }

    pub fn total_row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn filtered_row_count(&self) -> usize {
        self.ordered.len()
    }

    // -------------------------------------------------------------------------
    // Column visibility
    // -------------------------------------------------------------------------

    /// Show or hide a column. Columns that are not hideable are left alone.
    pub fn set_column_visible(&mut self, column_id: &str, visible: bool) {
        let Some(column) = self.column(column_id) else {
            tracing::trace!(column_id, "visibility change for unknown column ignored");
            return;
        };
        if !column.can_hide() {
            return;
        }
        if visible {
            self.hidden_columns.remove(column_id);
        } else {
            self.hidden_columns.insert(column_id.to_string());
        }
    }

    pub fn is_column_visible(&self, column_id: &str) -> bool {
        !self.hidden_columns.contains(column_id)
    }

    /// Visible columns in definition order
    pub fn visible_columns(&self) -> Vec<&ColumnDef<T>> {
        self.columns
            .iter()
            .filter(|c| self.is_column_visible(c.id()))
            .collect()
    }

    // -------------------------------------------------------------------------
    // Filtering
    // -------------------------------------------------------------------------

    /// Replace one column's filter; `None` or an inactive value clears it.
    ///
    /// Unknown or non-filterable columns are a no-op.
    pub fn set_column_filter(&mut self, column_id: &str, value: Option<FilterValue>) {
        if !self.column(column_id).is_some_and(|c| c.can_filter()) {
            tracing::trace!(column_id, "filter on unknown column ignored");
            return;
        }
        if self.filters.set_column(column_id, value) {
            self.recompute();
        }
    }

    /// Replace the cross-column text filter; `None` or empty clears it
    pub fn set_global_filter(&mut self, value: Option<String>) {
        if self.filters.set_global(value) {
            self.recompute();
        }
    }

    pub fn clear_filters(&mut self) {
        if self.filters.clear() {
            self.recompute();
        }
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// Apply a settled value from a [`crate::FilterDebouncer`]
    pub fn apply_filter_commit(&mut self, commit: FilterCommit) {
        match commit.field {
            FilterField::Global => self.set_global_filter(commit.value),
            FilterField::Column(column_id) => {
                self.set_column_filter(&column_id, commit.value.map(FilterValue::Text))
            }
        }
    }

    // -------------------------------------------------------------------------
    // Sorting
    // -------------------------------------------------------------------------

    /// Cycle a column ascending → descending → unsorted as the only sort key
    pub fn toggle_sort(&mut self, column_id: &str) {
        if self.is_sortable(column_id) {
            self.sorting.toggle(column_id);
            self.recompute();
        }
    }

    /// Cycle a column while keeping the other sort keys
    pub fn toggle_sort_multi(&mut self, column_id: &str) {
        if self.is_sortable(column_id) {
            self.sorting.toggle_multi(column_id);
            self.recompute();
        }
    }

    /// Replace the sort keys; keys for unknown columns are dropped
    pub fn set_sorting(&mut self, columns: Vec<SortColumn>) {
        self.sorting.clear();
        for column in columns {
            if self.is_sortable(&column.column_id) {
                self.sorting.add_column(column);
            }
        }
        self.recompute();
    }

    pub fn clear_sorting(&mut self) {
        if !self.sorting.is_empty() {
            self.sorting.clear();
            self.recompute();
        }
    }

    pub fn sorting(&self) -> &MultiColumnSort {
        &self.sorting
    }

    fn is_sortable(&self, column_id: &str) -> bool {
        let sortable = self.column(column_id).is_some_and(|c| c.can_sort());
        if !sortable {
            tracing::trace!(column_id, "sort on unknown or unsortable column ignored");
        }
        sortable
    }

    // -------------------------------------------------------------------------
    // Pagination
    // -------------------------------------------------------------------------

    pub fn first_page(&mut self) {
        self.pagination.first_page();
        self.recompute();
    }

    pub fn previous_page(&mut self) {
        self.pagination.previous_page();
        self.recompute();
    }

    pub fn next_page(&mut self) {
        self.pagination.next_page(self.ordered.len());
        self.recompute();
    }

    pub fn last_page(&mut self) {
        self.pagination.last_page(self.ordered.len());
        self.recompute();
    }

    pub fn go_to_page(&mut self, page_index: usize) {
        self.pagination.go_to_page(page_index, self.ordered.len());
        self.recompute();
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        if self.pagination.set_page_size(page_size, self.ordered.len()) {
            self.recompute();
        }
    }

    pub fn pagination(&self) -> &PaginationState {
        &self.pagination
    }

    pub fn can_previous_page(&self) -> bool {
        self.pagination.can_previous_page()
    }

    pub fn can_next_page(&self) -> bool {
        self.pagination.can_next_page(self.ordered.len())
    }

    // -------------------------------------------------------------------------
    // Expansion
    // -------------------------------------------------------------------------

    /// Flip a row's expanded flag. Unknown ids are a no-op returning false.
    pub fn toggle_expanded(&mut self, row_id: &RowId) -> bool {
        if !self.index_by_id.contains_key(row_id) {
            tracing::trace!(%row_id, "expansion toggle for unknown row ignored");
            return false;
        }
        self.expansion.toggle(row_id)
    }

    pub fn set_expanded(&mut self, row_id: &RowId, expanded: bool) {
        if self.index_by_id.contains_key(row_id) {
            self.expansion.set_expanded(row_id, expanded);
        }
    }

    pub fn is_expanded(&self, row_id: &RowId) -> bool {
        self.expansion.is_expanded(row_id)
    }

    pub fn collapse_all(&mut self) {
        self.expansion.collapse_all();
    }

    pub fn expansion(&self) -> &ExpansionState {
        &self.expansion
    }

    // -------------------------------------------------------------------------
    // View
    // -------------------------------------------------------------------------

    /// Snapshot of the current page
    pub fn view(&self) -> TableView<'_, T> {
        TableView::new(self)
    }

    /// Source indices in filtered and sorted order
    pub(crate) fn ordered_indices(&self) -> &[usize] {
        &self.ordered
    }

    /// Source indices on the current page
    pub(crate) fn page_indices(&self) -> &[usize] {
        &self.ordered[self.page.clone()]
    }

    fn reindex(&mut self) {
        self.ids = self
            .rows
            .iter()
            .enumerate()
            .map(|(index, row)| (self.row_id)(row, index))
            .collect();
        self.index_by_id = self
            .ids
            .iter()
            .enumerate()
            .map(|(index, id)| (id.clone(), index))
            .collect();
        if self.index_by_id.len() != self.ids.len() {
            tracing::warn!(
                rows = self.ids.len(),
                unique = self.index_by_id.len(),
                "row id function produced duplicate ids"
            );
        }
    }

    /// Re-run filter → sort → clamp → slice from the source rows
    fn recompute(&mut self) {
        let mut ordered: Vec<usize> = (0..self.rows.len())
            .filter(|&ix| self.filters.row_matches(&self.rows[ix], &self.columns))
            .collect();
        self.sorting.sort_indices(&mut ordered, &self.rows, &self.columns);

        self.pagination.clamp(ordered.len());
        self.page = self.pagination.page_range(ordered.len());
        self.ordered = ordered;

        tracing::debug!(
            total = self.rows.len(),
            filtered = self.ordered.len(),
            page_index = self.pagination.page_index(),
            page_rows = self.page.len(),
            "recomputed table view"
        );
    }
}

impl<T> std::fmt::Debug for DataTable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataTable")
            .field("rows", &self.rows.len())
            .field("columns", &self.columns)
            .field("filters", &self.filters)
            .field("sorting", &self.sorting)
            .field("pagination", &self.pagination)
            .field("expanded", &self.expansion.len())
            .finish()
    }
}
