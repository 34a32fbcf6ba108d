//! Roster CSV pipeline: tokenize, resolve headers, validate, preview,
//! reconcile with the authoritative importer, export corrections.
//!
//! Everything here is pure and synchronous except the [`RosterImporter`]
//! seam, so the same code runs in the browser preview and in the backend
//! importer.

pub mod export;
pub mod headers;
pub mod invite;
pub mod preview;
pub mod reconcile;
pub mod tokenizer;
pub mod validator;

pub use export::{correction_skeleton, issue_report, unified_issues};
pub use headers::HeaderMap;
pub use invite::{validate_single_invite, InviteFormError};
pub use preview::build_preview;
pub use reconcile::{
    Completion, Displayed, Failure, ImportPhase, ImportRequest, ImportSession, ImportTicket,
    LoadedFile, RosterImporter, SelectionToken,
};
pub use tokenizer::{parse_line, tokenize, Line};
