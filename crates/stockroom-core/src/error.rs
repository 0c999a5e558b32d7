//! Error types for stockroom

use thiserror::Error;

/// Errors raised while building a table
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StockroomError {
    /// Two column definitions share an id
    #[error("Duplicate column id: {0}")]
    DuplicateColumn(String),
}

/// Result type alias for stockroom operations
pub type Result<T> = std::result::Result<T, StockroomError>;
