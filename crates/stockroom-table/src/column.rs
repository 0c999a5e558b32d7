//! Column definitions
//!
//! A column either maps a row to a [`Value`] or carries a static label
//! (action columns, spacers). Only accessor columns take part in
//! filtering and sorting.

use std::sync::Arc;

use stockroom_core::Value;

/// Row-to-value mapping function
pub type Accessor<T> = Arc<dyn Fn(&T) -> Value + Send + Sync>;

/// Where a column's cell content comes from
pub enum CellSource<T> {
    /// Same literal for every row
    Static(String),
    /// Pure mapping from the row
    Accessor(Accessor<T>),
}

impl<T> CellSource<T> {
    /// Resolve the cell content for a row
    pub fn value(&self, row: &T) -> Value {
        match self {
            Self::Static(label) => Value::String(label.clone()),
            Self::Accessor(accessor) => accessor(row),
        }
    }

    pub fn is_accessor(&self) -> bool {
        matches!(self, Self::Accessor(_))
    }
}

impl<T> Clone for CellSource<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Static(label) => Self::Static(label.clone()),
            Self::Accessor(accessor) => Self::Accessor(Arc::clone(accessor)),
        }
    }
}

impl<T> std::fmt::Debug for CellSource<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Static(label) => f.debug_tuple("Static").field(label).finish(),
            Self::Accessor(_) => f.write_str("Accessor(..)"),
        }
    }
}

/// Semantic kind of a column, used by filter UIs to pick an input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnKind {
    #[default]
    Text,
    Number,
    Date,
    /// Closed set of values, filtered with a multi-select
    Enum,
}

/// Presentation metadata carried alongside a column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMeta {
    /// Name shown in filter inputs; falls back to the header
    pub filter_label: Option<String>,
    pub resizable: bool,
    pub hideable: bool,
    /// Fixed width in pixels
    pub size: Option<u16>,
    pub min_size: Option<u16>,
}

impl Default for ColumnMeta {
    fn default() -> Self {
        Self {
            filter_label: None,
            resizable: true,
            hideable: true,
            size: None,
            min_size: None,
        }
    }
}

/// A column definition for [`crate::DataTable`]
pub struct ColumnDef<T> {
    id: String,
    header: String,
    source: CellSource<T>,
    kind: ColumnKind,
    meta: ColumnMeta,
    sortable: bool,
    filterable: bool,
}

// No `T: Clone` / `T: Debug` bounds on the row type.
impl<T> Clone for ColumnDef<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            header: self.header.clone(),
            source: self.source.clone(),
            kind: self.kind,
            meta: self.meta.clone(),
            sortable: self.sortable,
            filterable: self.filterable,
        }
    }
}

impl<T> std::fmt::Debug for ColumnDef<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColumnDef")
            .field("id", &self.id)
            .field("header", &self.header)
            .field("source", &self.source)
            .field("kind", &self.kind)
            .field("sortable", &self.sortable)
            .field("filterable", &self.filterable)
            .finish()
    }
}

impl<T> ColumnDef<T> {
    /// Create a data column backed by an accessor
    pub fn accessor<F>(id: impl Into<String>, header: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&T) -> Value + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            header: header.into(),
            source: CellSource::Accessor(Arc::new(accessor)),
            kind: ColumnKind::Text,
            meta: ColumnMeta::default(),
            sortable: true,
            filterable: true,
        }
    }

    /// Create a display-only column with a static label
    pub fn display(
        id: impl Into<String>,
        header: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            header: header.into(),
            source: CellSource::Static(label.into()),
            kind: ColumnKind::Text,
            meta: ColumnMeta {
                hideable: false,
                ..ColumnMeta::default()
            },
            sortable: false,
            filterable: false,
        }
    }

    pub fn kind(mut self, kind: ColumnKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    pub fn filterable(mut self, filterable: bool) -> Self {
        self.filterable = filterable;
        self
    }

    pub fn hideable(mut self, hideable: bool) -> Self {
        self.meta.hideable = hideable;
        self
    }

    pub fn resizable(mut self, resizable: bool) -> Self {
        self.meta.resizable = resizable;
        self
    }

    pub fn size(mut self, size: u16) -> Self {
        self.meta.size = Some(size);
        self
    }

    pub fn min_size(mut self, min_size: u16) -> Self {
        self.meta.min_size = Some(min_size);
        self
    }

    pub fn filter_label(mut self, label: impl Into<String>) -> Self {
        self.meta.filter_label = Some(label.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn source(&self) -> &CellSource<T> {
        &self.source
    }

    pub fn column_kind(&self) -> ColumnKind {
        self.kind
    }

    pub fn meta(&self) -> &ColumnMeta {
        &self.meta
    }

    /// Label for filter inputs
    pub fn display_name(&self) -> &str {
        self.meta.filter_label.as_deref().unwrap_or(&self.header)
    }

    pub fn can_sort(&self) -> bool {
        self.sortable && self.source.is_accessor()
    }

    pub fn can_filter(&self) -> bool {
        self.filterable && self.source.is_accessor()
    }

    pub fn can_hide(&self) -> bool {
        self.meta.hideable
    }

    /// Resolve this column's value for a row
    pub fn value(&self, row: &T) -> Value {
        self.source.value(row)
    }
}
