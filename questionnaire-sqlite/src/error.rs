use questionnaire::{RecordId, Table};
use thiserror::Error;

/// Error type for SqliteStorage.
#[derive(Error, Debug)]
pub enum SqliteStorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown column '{column}' in {table}")]
    UnknownColumn { table: Table, column: String },

    #[error("No row with id {id} in {table}")]
    MissingRow { table: Table, id: RecordId },

    #[error("Blob value in column '{column}' of {table}")]
    UnsupportedValue { table: Table, column: String },
}
