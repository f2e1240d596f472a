use crate::{RecordId, Table};

/// Error type for reading typed values out of a stored row.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Type mismatch in column '{column}': expected {expected}, got {actual}")]
    TypeMismatch {
        column: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Invalid value in column '{column}': {value}")]
    InvalidValue { column: String, value: String },
}

/// Error type for questionnaire operations.
#[derive(Debug, thiserror::Error)]
pub enum QuestionnaireError {
    /// The type code has no registered question type.
    #[error("Unknown question type code: {0}")]
    UnknownType(u32),

    /// The requested row does not exist.
    #[error("No record with id {id} in {table}")]
    NotFound { table: Table, id: RecordId },

    /// A stored row could not be read into its typed shape.
    #[error("Malformed record: {0}")]
    Record(#[from] RecordError),

    /// Storage collaborator failure (I/O, SQL, constraint violation, etc.)
    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl QuestionnaireError {
    /// Create a storage error from any error type.
    pub fn storage(err: impl Into<anyhow::Error>) -> Self {
        Self::Storage(err.into())
    }

    pub fn is_unknown_type(&self) -> bool {
        matches!(self, Self::UnknownType(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
