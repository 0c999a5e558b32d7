//! Read-only snapshot of the current page

use stockroom_core::{RowId, Value};

use crate::column::ColumnDef;
use crate::expansion::{SubRow, SubRowRenderer};
use crate::model::DataTable;

/// One row on the current page
#[derive(Debug)]
pub struct VisibleRow<'a, T> {
    pub id: &'a RowId,
    pub row: &'a T,
    /// Position in the source row set
    pub source_index: usize,
    /// Position on the current page
    pub visual_index: usize,
    pub expanded: bool,
}

impl<T> Clone for VisibleRow<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for VisibleRow<'_, T> {}

/// The rows and paging status a renderer needs for one frame
#[derive(Debug)]
pub struct TableView<'a, T> {
    table: &'a DataTable<T>,
    rows: Vec<VisibleRow<'a, T>>,
}

impl<'a, T> TableView<'a, T> {
    pub(crate) fn new(table: &'a DataTable<T>) -> Self {
        let rows = table
            .page_indices()
            .iter()
            .enumerate()
            .filter_map(|(visual_index, &source_index)| {
                let id = table.row_id_at(source_index)?;
                Some(VisibleRow {
                    id,
                    row: &table.rows()[source_index],
                    source_index,
                    visual_index,
                    expanded: table.is_expanded(id),
                })
            })
            .collect();
        Self { table, rows }
    }

    pub fn rows(&self) -> &[VisibleRow<'a, T>] {
        &self.rows
    }

    pub fn columns(&self) -> Vec<&'a ColumnDef<T>> {
        self.table.visible_columns()
    }

    pub fn total_rows(&self) -> usize {
        self.table.total_row_count()
    }

    pub fn filtered_rows(&self) -> usize {
        self.table.filtered_row_count()
    }

    pub fn page_index(&self) -> usize {
        self.table.pagination().page_index()
    }

    pub fn page_size(&self) -> usize {
        self.table.pagination().page_size()
    }

    pub fn page_count(&self) -> usize {
        self.table.pagination().page_count(self.filtered_rows())
    }

    pub fn can_previous_page(&self) -> bool {
        self.table.can_previous_page()
    }

    pub fn can_next_page(&self) -> bool {
        self.table.can_next_page()
    }

    pub fn status_text(&self) -> String {
        self.table.pagination().status_text(self.filtered_rows())
    }

    /// Cell value for a row; `None` for unknown columns
    pub fn cell(&self, row: &VisibleRow<'a, T>, column_id: &str) -> Option<Value> {
        self.table.column(column_id).map(|column| column.value(row.row))
    }

    /// Sub-row for a visible row.
    ///
    /// Content is only produced when a renderer is supplied and the row is
    /// expanded. It spans every visible column.
    pub fn sub_row<R>(&self, row: &VisibleRow<'a, T>, renderer: Option<&R>) -> SubRow<R::Output>
    where
        R: SubRowRenderer<T>,
    {
        match renderer {
            None => SubRow::NotConfigured,
            Some(_) if !row.expanded => SubRow::Collapsed,
            Some(renderer) => SubRow::Expanded {
                col_span: self.table.visible_columns().len(),
                content: renderer.render(row.row, row.visual_index),
            },
        }
    }
}
