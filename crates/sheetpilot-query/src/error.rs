//! Error types for sheetpilot-query

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using [`QueryError`]
pub type Result<T> = std::result::Result<T, QueryError>;

/// Errors that can occur while querying a tabular document.
///
/// The two kinds call for different operator responses: `DataSourceUnavailable`
/// means the document itself could not be reached (check the path or a lock),
/// `Statement` means the document was reached but the requested statement
/// failed against it (check the statement's preconditions, such as a sheet
/// name that does not exist).
#[derive(Debug, Error)]
pub enum QueryError {
    /// The connection to the tabular document could not be opened
    #[error("data source unavailable: {path}: {reason}")]
    DataSourceUnavailable { path: PathBuf, reason: String },

    /// The statement failed while running against an open connection
    #[error("statement execution failed: {0}")]
    Statement(String),
}

impl From<sheetpilot_core::Error> for QueryError {
    fn from(err: sheetpilot_core::Error) -> Self {
        QueryError::Statement(err.to_string())
    }
}
