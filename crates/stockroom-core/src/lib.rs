//! Stockroom Core - shared value and error types
//!
//! This crate provides the fundamental types that every other stockroom
//! crate depends on:
//!
//! - `Value` - Dynamic cell value produced by column accessors
//! - `RowId` - Stable row identity used by expansion and selection state
//! - `StockroomError` - Error type for table construction

mod error;
mod types;

pub use error::*;
pub use types::*;
