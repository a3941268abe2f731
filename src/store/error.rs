//! Error types for the descriptor store.

use thiserror::Error;

/// Errors that can occur while persisting or querying descriptors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The table schema was already declared.
    #[error("descriptor table '{table}' already exists")]
    SchemaExists {
        /// The table name.
        table: String,
    },

    /// A column with this name already exists.
    #[error("column '{column}' already exists")]
    ColumnExists {
        /// The colliding column name.
        column: String,
    },

    /// A requested column is not part of the schema.
    #[error("no such column: '{column}'")]
    UnknownColumn {
        /// The unknown column name.
        column: String,
    },

    /// A row's value count disagrees with the declared schema.
    ///
    /// The whole batch is aborted; no rows are written.
    #[error("row {row} has {got} values, expected {expected}")]
    RowWidthMismatch {
        /// Index of the offending row in the batch.
        row: usize,
        /// Declared value count.
        expected: usize,
        /// Observed value count.
        got: usize,
    },

    /// No row carries the given identifier.
    #[error("no descriptor row with unique id '{unique_id}'")]
    RowNotFound {
        /// The missing identifier.
        unique_id: String,
    },

    /// A table or column name is not a valid identifier.
    #[error("invalid identifier: '{name}' (use letters, digits, and underscores)")]
    InvalidName {
        /// The rejected name.
        name: String,
    },

    /// The underlying SQLite operation failed.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}
