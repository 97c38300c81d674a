use std::io;
use thiserror::Error;

use crate::sql_type::SqlType;

/// Error type for CSV loading operations.
#[derive(Error, Debug)]
pub enum LoadError {
    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// CSV parsing error.
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// A record contains bytes that are not valid UTF-8.
    #[error("Record {record} is not valid UTF-8")]
    Encoding { record: u64 },

    /// Empty file, no header row to build a schema from.
    #[error("Empty file or no header row")]
    EmptyData,

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The header and the inferred type vector disagree on the column count.
    #[error("Header has {header} columns but {types} column types were inferred")]
    ColumnCountMismatch { header: usize, types: usize },

    /// The header has no `id` column and the id policy requires one.
    #[error("CSV header has no `id` column to use as primary key")]
    MissingIdColumn,

    /// The CSV's `id` column was inferred as a type MySQL cannot use as a key.
    #[error("Column `id` was inferred as {0}, which cannot be a primary key")]
    UnkeyableId(SqlType),

    /// The secondary index already exists on the target table.
    #[error("Index already exists: {0}")]
    IndexExists(String),

    /// Any other failure reported by the database.
    #[error("Database error: {0}")]
    Database(String),
}

/// Result type alias for loading operations.
pub type Result<T> = std::result::Result<T, LoadError>;
