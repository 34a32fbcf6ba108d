//! Import session: file selection, preview, authoritative import.
//!
//! The session is a small state machine (`ImportPhase`) instead of a set of
//! independent flags, so combinations such as "importing a stale preview"
//! cannot be represented.
//!
//! ```text
//!            select_file             file_loaded            begin_import
//!   Idle ───────────────► Previewing ───────────► Previewed ────────────► Importing
//!                              │                                              │
//!                              │ unreadable                   complete_import │
//!                              ▼                                              ▼
//!                           Failed ◄──────────── import error ──────── Imported
//! ```
//!
//! Every file selection takes a new, strictly increasing `SelectionToken`.
//! File reads and import responses carry the token they were started with and
//! are dropped when it is no longer the current one, so a slow answer for an
//! old file can never overwrite the preview or result of a newer one.

use super::export::unified_issues;
use super::preview::build_preview;
use crate::error::{ImportError, RosterError, SessionError};
use crate::model::roster::{ImportResult, Issue, PreviewResult};

/// Identifies one file selection. Later selections compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SelectionToken(u64);

/// Request sent to the authoritative importer: the original bytes, untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRequest {
    pub course_id: String,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// The authoritative bulk importer, as seen from the client.
#[allow(async_fn_in_trait)]
pub trait RosterImporter {
    async fn import(&self, request: &ImportRequest) -> Result<ImportResult, ImportError>;
}

/// Handed out by [`ImportSession::begin_import`]; return its token with the outcome.
#[derive(Debug, Clone)]
pub struct ImportTicket {
    pub token: SelectionToken,
    pub request: ImportRequest,
}

impl ImportTicket {
    /// Sends the request to `importer`. The session is not borrowed while the
    /// request is in flight; hand the returned token and outcome to
    /// [`ImportSession::complete_import`].
    pub async fn submit<I: RosterImporter>(
        self,
        importer: &I,
    ) -> (SelectionToken, Result<ImportResult, ImportError>) {
        let outcome = importer.import(&self.request).await;
        (self.token, outcome)
    }
}

/// A selected file that has been read and previewed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedFile {
    pub token: SelectionToken,
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub preview: PreviewResult,
}

/// What stays on screen while another file is read or after it failed:
/// the last previewed file and, if it was imported, the importer's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Displayed {
    pub file: LoadedFile,
    pub result: Option<ImportResult>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// The selected file could not be read or parsed at all.
    Unreadable { file_name: String, error: RosterError },
    /// The importer could not be reached or answered with an error.
    Import(ImportError),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ImportPhase {
    #[default]
    Idle,
    /// A file was chosen and is being read. The previous preview stays visible.
    Previewing {
        token: SelectionToken,
        file_name: String,
        previous: Option<Displayed>,
    },
    Previewed(LoadedFile),
    Importing(LoadedFile),
    Imported {
        file: LoadedFile,
        result: ImportResult,
    },
    /// `previous` is what is still on screen, if anything.
    Failed {
        failure: Failure,
        previous: Option<Displayed>,
    },
}

/// What happened to a file read or import response handed back to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// The selection it belongs to has been superseded; nothing changed.
    Stale,
}

#[derive(Debug, Default)]
pub struct ImportSession {
    last_token: u64,
    phase: ImportPhase,
}

impl ImportSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &ImportPhase {
        &self.phase
    }

    pub fn current_token(&self) -> Option<SelectionToken> {
        (self.last_token > 0).then_some(SelectionToken(self.last_token))
    }

    /// Starts a new selection. Anything still in flight for older selections becomes stale.
    pub fn select_file(&mut self, file_name: &str) -> SelectionToken {
        self.last_token += 1;
        let token = SelectionToken(self.last_token);
        let previous = self.take_displayed();
        self.phase = ImportPhase::Previewing {
            token,
            file_name: file_name.to_string(),
            previous,
        };
        token
    }

    /// Hands over the bytes read for `token` and builds the preview.
    ///
    /// Unreadable files move the session to `Failed` but keep the previous
    /// preview on screen.
    pub fn file_loaded(&mut self, token: SelectionToken, bytes: Vec<u8>) -> Completion {
        let ImportPhase::Previewing { token: current, .. } = &self.phase else {
            return Completion::Stale;
        };
        if *current != token {
            return Completion::Stale;
        }
        let ImportPhase::Previewing {
            file_name,
            previous,
            ..
        } = std::mem::take(&mut self.phase)
        else {
            return Completion::Stale;
        };

        self.phase = match build_preview(&file_name, &bytes) {
            Ok(preview) => ImportPhase::Previewed(LoadedFile {
                token,
                file_name,
                bytes,
                preview,
            }),
            Err(error) => {
                log::debug!("{file_name} could not be previewed: {error}");
                ImportPhase::Failed {
                    failure: Failure::Unreadable { file_name, error },
                    previous,
                }
            }
        };
        Completion::Applied
    }

    /// Records that reading the file for `token` failed before any bytes arrived.
    pub fn file_read_failed(&mut self, token: SelectionToken, message: &str) -> Completion {
        match &self.phase {
            ImportPhase::Previewing { token: current, .. } if *current == token => {}
            _ => return Completion::Stale,
        }
        if let ImportPhase::Previewing {
            file_name,
            previous,
            ..
        } = std::mem::take(&mut self.phase)
        {
            self.phase = ImportPhase::Failed {
                failure: Failure::Unreadable {
                    file_name,
                    error: RosterError::Unreadable(message.to_string()),
                },
                previous,
            };
        }
        Completion::Applied
    }

    /// Selects and previews a file whose bytes are already in memory.
    pub fn load(&mut self, file_name: &str, bytes: Vec<u8>) -> SelectionToken {
        let token = self.select_file(file_name);
        self.file_loaded(token, bytes);
        token
    }

    /// Moves to `Importing` and returns what must be sent to the importer.
    ///
    /// Only the header check gates the import; row issues are left to the
    /// importer, which reports them back. A failed import can be retried, and
    /// a preview still on screen after an unreadable pick can be imported.
    pub fn begin_import(&mut self, course_id: &str) -> Result<ImportTicket, SessionError> {
        let file = match &self.phase {
            ImportPhase::Importing(_) => return Err(SessionError::ImportInProgress),
            _ => self.importable_file().ok_or(SessionError::NothingToImport)?,
        };
        if !file.preview.can_import() {
            let missing: Vec<&str> = file
                .preview
                .missing_headers
                .iter()
                .map(|column| column.key())
                .collect();
            return Err(SessionError::HeadersMissing(missing.join(", ")));
        }

        let ticket = ImportTicket {
            token: file.token,
            request: ImportRequest {
                course_id: course_id.to_string(),
                file_name: file.file_name.clone(),
                bytes: file.bytes.clone(),
            },
        };
        if let Some(displayed) = self.take_displayed() {
            self.phase = ImportPhase::Importing(displayed.file);
        }
        Ok(ticket)
    }

    /// Applies the importer's answer for `token`, unless a newer selection exists.
    ///
    /// A whole-file rejection (`ImportError::Rejected`) carries authoritative
    /// issues, so it is recorded as a result rather than a failure.
    pub fn complete_import(
        &mut self,
        token: SelectionToken,
        outcome: Result<ImportResult, ImportError>,
    ) -> Completion {
        match &self.phase {
            ImportPhase::Importing(file) if file.token == token => {}
            _ => {
                log::debug!("discarding import response for superseded selection {token:?}");
                return Completion::Stale;
            }
        }
        let ImportPhase::Importing(file) = std::mem::take(&mut self.phase) else {
            return Completion::Stale;
        };

        self.phase = match outcome {
            Ok(result) => ImportPhase::Imported { file, result },
            Err(ImportError::Rejected(issues)) => ImportPhase::Imported {
                file,
                result: ImportResult {
                    issues,
                    ..ImportResult::default()
                },
            },
            Err(error) => ImportPhase::Failed {
                failure: Failure::Import(error),
                previous: Some(Displayed { file, result: None }),
            },
        };
        Completion::Applied
    }

    /// The preview currently on screen.
    pub fn preview(&self) -> Option<&PreviewResult> {
        self.loaded_file().map(|file| &file.preview)
    }

    /// The importer's answer for the preview on screen, if it was imported.
    pub fn import_result(&self) -> Option<&ImportResult> {
        match &self.phase {
            ImportPhase::Imported { result, .. } => Some(result),
            ImportPhase::Previewing { previous, .. } | ImportPhase::Failed { previous, .. } => {
                previous.as_ref().and_then(|shown| shown.result.as_ref())
            }
            _ => None,
        }
    }

    /// Issues to show and export: the importer's when present, else the preview's.
    pub fn issues(&self) -> &[Issue] {
        unified_issues(self.preview(), self.import_result())
    }

    pub fn can_import(&self) -> bool {
        self.importable_file()
            .is_some_and(|file| file.preview.can_import())
    }

    pub fn is_busy(&self) -> bool {
        matches!(
            self.phase,
            ImportPhase::Previewing { .. } | ImportPhase::Importing(_)
        )
    }

    pub fn failure(&self) -> Option<&Failure> {
        match &self.phase {
            ImportPhase::Failed { failure, .. } => Some(failure),
            _ => None,
        }
    }

    /// A previewed file that has not been imported yet and is not being read over.
    fn importable_file(&self) -> Option<&LoadedFile> {
        match &self.phase {
            ImportPhase::Previewed(file) => Some(file),
            ImportPhase::Failed {
                previous: Some(Displayed { file, result: None }),
                ..
            } => Some(file),
            _ => None,
        }
    }

    fn loaded_file(&self) -> Option<&LoadedFile> {
        match &self.phase {
            ImportPhase::Idle => None,
            ImportPhase::Previewing { previous, .. } | ImportPhase::Failed { previous, .. } => {
                previous.as_ref().map(|shown| &shown.file)
            }
            ImportPhase::Previewed(file)
            | ImportPhase::Importing(file)
            | ImportPhase::Imported { file, .. } => Some(file),
        }
    }

    fn take_displayed(&mut self) -> Option<Displayed> {
        match std::mem::take(&mut self.phase) {
            ImportPhase::Idle => None,
            ImportPhase::Previewing { previous, .. } | ImportPhase::Failed { previous, .. } => {
                previous
            }
            ImportPhase::Previewed(file) | ImportPhase::Importing(file) => {
                Some(Displayed { file, result: None })
            }
            ImportPhase::Imported { file, result } => Some(Displayed {
                file,
                result: Some(result),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::roster::ReasonCode;
    use std::cell::RefCell;

    const VALID: &[u8] = b"email,name,student_number,programme\na@b.com,A B,123,CS\n";
    const OTHER: &[u8] = b"email,name,student_number,programme\nc@d.com,C D,456,SE\n";

    fn ok_result() -> ImportResult {
        ImportResult {
            created_invites: 1,
            auto_enrolled: 0,
            issues: vec![],
            invite_links: vec!["http://localhost/invite/x".into()],
        }
    }

    #[test]
    fn tokens_increase_with_each_selection() {
        let mut session = ImportSession::new();
        assert_eq!(session.current_token(), None);
        let first = session.select_file("a.csv");
        let second = session.select_file("b.csv");
        assert!(second > first);
        assert_eq!(session.current_token(), Some(second));
    }

    #[test]
    fn happy_path() {
        let mut session = ImportSession::new();
        session.load("a.csv", VALID.to_vec());
        assert!(matches!(session.phase(), ImportPhase::Previewed(_)));
        assert!(session.can_import());

        let ticket = session.begin_import("course-1").unwrap();
        assert_eq!(ticket.request.bytes, VALID);
        assert_eq!(ticket.request.course_id, "course-1");
        assert!(session.is_busy());
        assert_eq!(
            session.begin_import("course-1").unwrap_err(),
            SessionError::ImportInProgress
        );

        assert_eq!(session.complete_import(ticket.token, Ok(ok_result())), Completion::Applied);
        assert_eq!(session.import_result(), Some(&ok_result()));
        assert!(session.issues().is_empty());
        assert!(!session.can_import());
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut session = ImportSession::new();
        session.load("a.csv", VALID.to_vec());
        let ticket = session.begin_import("c").unwrap();

        session.load("b.csv", OTHER.to_vec());
        assert_eq!(session.complete_import(ticket.token, Ok(ok_result())), Completion::Stale);
        assert!(matches!(session.phase(), ImportPhase::Previewed(file) if file.file_name == "b.csv"));
        assert!(session.import_result().is_none());
    }

    #[test]
    fn stale_file_read_is_discarded() {
        let mut session = ImportSession::new();
        let old = session.select_file("a.csv");
        let new = session.select_file("b.csv");
        assert_eq!(session.file_loaded(old, VALID.to_vec()), Completion::Stale);
        assert_eq!(session.file_loaded(new, OTHER.to_vec()), Completion::Applied);
        assert_eq!(session.preview().unwrap().file_name, "b.csv");
    }

    #[test]
    fn unreadable_file_keeps_previous_preview() {
        let mut session = ImportSession::new();
        session.load("good.csv", VALID.to_vec());
        session.load("garbage.csv", vec![0xff, 0x00, 0xfe]);

        assert!(matches!(
            session.failure(),
            Some(Failure::Unreadable { file_name, .. }) if file_name == "garbage.csv"
        ));
        assert_eq!(session.preview().unwrap().file_name, "good.csv");
        assert!(session.can_import());
        let ticket = session.begin_import("c").unwrap();
        assert_eq!(ticket.request.file_name, "good.csv");
    }

    #[test]
    fn unreadable_file_keeps_previous_import_result() {
        let mut session = ImportSession::new();
        session.load("a.csv", VALID.to_vec());
        let ticket = session.begin_import("c").unwrap();
        let taken = Issue::for_row(
            &session.preview().unwrap().rows[0],
            ReasonCode::StudentNumberTakenInCourse,
        );
        let result = ImportResult {
            issues: vec![taken.clone()],
            ..ImportResult::default()
        };
        session.complete_import(ticket.token, Ok(result.clone()));

        let next = session.select_file("garbage.csv");
        assert_eq!(session.import_result(), Some(&result));
        session.file_loaded(next, vec![0xff, 0x00]);

        assert!(matches!(session.failure(), Some(Failure::Unreadable { .. })));
        assert_eq!(session.preview().unwrap().file_name, "a.csv");
        assert_eq!(session.import_result(), Some(&result));
        assert_eq!(session.issues(), &[taken]);
        assert!(!session.can_import());
    }

    #[test]
    fn previous_preview_visible_while_reading() {
        let mut session = ImportSession::new();
        session.load("good.csv", VALID.to_vec());
        let token = session.select_file("next.csv");
        assert!(session.is_busy());
        assert_eq!(session.preview().unwrap().file_name, "good.csv");
        session.file_read_failed(token, "permission denied");
        assert_eq!(session.preview().unwrap().file_name, "good.csv");
    }

    #[test]
    fn missing_headers_block_import() {
        let mut session = ImportSession::new();
        session.load("a.csv", b"email,name\na@b.com,A\n".to_vec());
        assert!(!session.can_import());
        assert_eq!(
            session.begin_import("c").unwrap_err(),
            SessionError::HeadersMissing("student_number, programme".into())
        );
        assert!(matches!(session.phase(), ImportPhase::Previewed(_)));
    }

    #[test]
    fn row_issues_do_not_block_import() {
        let mut session = ImportSession::new();
        session.load(
            "a.csv",
            b"email,name,student_number,programme\nbad,A,1,CS\na@b.com,B,2,CS\n".to_vec(),
        );
        assert_eq!(session.issues().len(), 1);
        assert!(session.begin_import("c").is_ok());
    }

    #[test]
    fn import_issues_supersede_preview_issues() {
        let mut session = ImportSession::new();
        session.load("a.csv", b"email,name,student_number,programme\nbad,A,1,CS\n".to_vec());
        let ticket = session.begin_import("c").unwrap();
        let issue = Issue {
            row_number: Some(2),
            reason_code: ReasonCode::StudentNumberTakenInCourse,
            reason_label: ReasonCode::StudentNumberTakenInCourse.label().into(),
            email: "bad".into(),
            full_name: "A".into(),
            student_number: "1".into(),
            programme: "CS".into(),
        };
        let result = ImportResult {
            issues: vec![issue],
            ..ImportResult::default()
        };
        session.complete_import(ticket.token, Ok(result));
        let codes: Vec<ReasonCode> = session.issues().iter().map(|i| i.reason_code).collect();
        assert_eq!(codes, vec![ReasonCode::StudentNumberTakenInCourse]);
    }

    #[test]
    fn rejection_becomes_authoritative_issues() {
        let mut session = ImportSession::new();
        session.load("a.csv", VALID.to_vec());
        let ticket = session.begin_import("c").unwrap();
        let header = Issue::missing_headers(&[crate::model::roster::RosterColumn::Programme]);
        session.complete_import(ticket.token, Err(ImportError::Rejected(vec![header.clone()])));
        assert_eq!(session.issues(), &[header]);
    }

    #[test]
    fn failed_import_can_be_retried() {
        let mut session = ImportSession::new();
        session.load("a.csv", VALID.to_vec());
        let ticket = session.begin_import("c").unwrap();
        session.complete_import(ticket.token, Err(ImportError::Network("offline".into())));
        assert!(matches!(session.failure(), Some(Failure::Import(_))));
        assert_eq!(session.preview().unwrap().file_name, "a.csv");
        assert!(session.can_import());

        let retry = session.begin_import("c").unwrap();
        assert_eq!(retry.token, ticket.token);
        assert_eq!(session.complete_import(retry.token, Ok(ok_result())), Completion::Applied);
    }

    #[test]
    fn nothing_to_import_when_idle() {
        let mut session = ImportSession::new();
        assert_eq!(session.begin_import("c").unwrap_err(), SessionError::NothingToImport);
    }

    struct FakeImporter {
        result: ImportResult,
    }

    impl RosterImporter for FakeImporter {
        async fn import(&self, request: &ImportRequest) -> Result<ImportResult, ImportError> {
            assert_eq!(request.file_name, "a.csv");
            Ok(self.result.clone())
        }
    }

    /// Simulates the instructor picking another file while the request is in flight.
    struct ReselectingImporter<'a> {
        session: &'a RefCell<ImportSession>,
    }

    impl RosterImporter for ReselectingImporter<'_> {
        async fn import(&self, _request: &ImportRequest) -> Result<ImportResult, ImportError> {
            self.session.borrow_mut().load("newer.csv", OTHER.to_vec());
            Ok(ok_result())
        }
    }

    #[test]
    fn submitted_ticket_applies_result() {
        let mut session = ImportSession::new();
        session.load("a.csv", VALID.to_vec());
        let importer = FakeImporter { result: ok_result() };
        let ticket = session.begin_import("c").unwrap();
        let (token, outcome) = futures::executor::block_on(ticket.submit(&importer));
        assert_eq!(session.complete_import(token, outcome), Completion::Applied);
        assert_eq!(session.import_result().map(|r| r.processed_rows()), Some(1));
    }

    #[test]
    fn submitted_ticket_is_dropped_after_reselection() {
        let session = RefCell::new(ImportSession::new());
        session.borrow_mut().load("a.csv", VALID.to_vec());
        let importer = ReselectingImporter { session: &session };
        let ticket = session.borrow_mut().begin_import("c").unwrap();
        let (token, outcome) = futures::executor::block_on(ticket.submit(&importer));
        assert_eq!(session.borrow_mut().complete_import(token, outcome), Completion::Stale);
        let session = session.borrow();
        assert_eq!(session.preview().unwrap().file_name, "newer.csv");
        assert!(session.import_result().is_none());
    }
}
