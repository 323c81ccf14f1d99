//! Error types for the UFC data CLI.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, UfcError>;

#[derive(Error, Debug)]
pub enum UfcError {
    /// A CSV row or caller-supplied value is malformed. Recovered locally
    /// during migration (the row is logged and skipped).
    #[error("input format error: {0}")]
    InputFormat(String),

    /// A foreign key could not be resolved. Batch-fatal: the enclosing
    /// transaction is rolled back.
    #[error("referential integrity violation: {0}")]
    Referential(String),

    /// The storage engine is unreachable or a write failed. Fatal.
    #[error("database error: {0}")]
    Storage(rusqlite::Error),

    /// An analytics query was given an id or name that does not exist.
    /// Plain reads return `None`/empty instead of this.
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<rusqlite::Error> for UfcError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(code, _)
                if code.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY =>
            {
                UfcError::Referential(err.to_string())
            }
            _ => UfcError::Storage(err),
        }
    }
}
