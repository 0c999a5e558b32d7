//! Client-side tabular data engine
//!
//! A [`DataTable`] owns an in-memory row set plus the state of every
//! transformation pass and recomputes its view in a fixed order:
//!
//! ```text
//! source rows → filter → sort → paginate → visible rows
//!                                              ↑
//!                          expansion (overlay keyed by RowId)
//! ```
//!
//! ## Module Structure
//!
//! - `column` - Column definitions and cell accessors
//! - `filter` - Per-column and global predicates
//! - `sorting` - Stable multi-column comparator
//! - `pagination` - Page index/size state machine with clamping
//! - `expansion` - Expanded-row set and sub-row rendering
//! - `debounce` - Cancel-and-restart commit timers for text filter inputs
//! - `model` - The `DataTable` orchestrator
//! - `view` - Read-only snapshot of the current page

mod column;
mod debounce;
mod expansion;
mod filter;
mod model;
mod pagination;
mod sorting;
mod view;

pub use column::{CellSource, ColumnDef, ColumnKind, ColumnMeta};
pub use debounce::{DEFAULT_DEBOUNCE, FilterCommit, FilterDebouncer, FilterField};
pub use expansion::{ExpansionState, SubRow, SubRowRenderer};
pub use filter::{DateRange, FilterState, FilterValue, NumberRange};
pub use model::DataTable;
pub use pagination::{DEFAULT_PAGE_SIZE_OPTIONS, PaginationState};
pub use sorting::{MultiColumnSort, NullPosition, SortColumn, SortDirection};
pub use view::{TableView, VisibleRow};

pub use stockroom_core::{RowId, Value};
