//! Error types for the data model.

use thiserror::Error;

/// Errors raised while building model collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// Two columns of one table share a name.
    #[error("duplicate column name: {column}")]
    DuplicateColumn { column: String },

    /// A column referenced by name is not part of the table.
    #[error("column not found: {column}")]
    UnknownColumn { column: String },
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
