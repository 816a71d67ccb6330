//! Error types for sheetpilot-automation

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using the automation [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised across an automation transaction.
///
/// Each variant names the phase that failed, so a caller can tell a document
/// that never opened apart from a mutation that failed halfway through. A
/// `Cleanup` failure is only surfaced when the transaction itself succeeded;
/// otherwise the original failure wins and cleanup problems are logged.
#[derive(Debug, Error)]
pub enum Error {
    /// The editing application could not be started
    #[error("failed to launch application: {0}")]
    Launch(String),

    /// The application started but the document could not be opened
    #[error("failed to open document {path}: {reason}")]
    DocumentOpen { path: PathBuf, reason: String },

    /// A request named a sheet the document does not have
    #[error("sheet not found: {0}")]
    SheetNotFound(String),

    /// An in-place mutation failed against the open document
    #[error("mutation failed: {0}")]
    Mutation(String),

    /// A save or export step failed
    #[error("save or export failed: {0}")]
    SaveOrExport(String),

    /// A cleanup step failed after the transaction body completed
    #[error("cleanup failed while trying to {step}: {reason}")]
    Cleanup { step: &'static str, reason: String },
}

impl From<sheetpilot_core::Error> for Error {
    fn from(err: sheetpilot_core::Error) -> Self {
        match err {
            sheetpilot_core::Error::SheetNotFound(name) => Error::SheetNotFound(name),
            other => Error::Mutation(other.to_string()),
        }
    }
}
