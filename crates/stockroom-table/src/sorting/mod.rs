//! Sorting module for the row model
//!
//! Provides stable multi-column sorting with configurable null handling.

mod multi_sort;

pub use multi_sort::{MultiColumnSort, NullPosition, SortColumn, SortDirection};
