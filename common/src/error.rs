//! Error types shared by the roster pipeline.
//!
//! Row and header problems are *not* errors: they are reported as
//! [`Issue`](crate::model::roster::Issue)s inside a preview or an import result.
//! The types below cover the cases where no preview or result can be produced
//! at all.

use crate::model::roster::Issue;
use thiserror::Error;

/// Whole-file failures of the roster pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    /// The bytes could not be read as roster text (not UTF-8, or binary content).
    #[error("the file could not be read as CSV text: {0}")]
    Unreadable(String),
    #[error("could not write CSV: {0}")]
    Export(String),
}

impl From<csv::Error> for RosterError {
    fn from(err: csv::Error) -> Self {
        Self::Export(err.to_string())
    }
}

/// Failures talking to the authoritative importer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    #[error("network error: {0}")]
    Network(String),
    /// The importer refused the whole file (HTTP 422), e.g. because of missing headers.
    #[error("the importer rejected the file ({} issue(s))", .0.len())]
    Rejected(Vec<Issue>),
    #[error("importer answered HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("unexpected importer response: {0}")]
    InvalidResponse(String),
}

/// Illegal transitions of the import session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("no previewed file to import")]
    NothingToImport,
    #[error("required headers are missing: {0}")]
    HeadersMissing(String),
    #[error("an import is already running")]
    ImportInProgress,
}
