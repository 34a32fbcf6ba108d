//! Shared roster data model.
//!
//! These types travel between the browser preview, the backend importer and the
//! correction export. Field names are serialized in snake_case so the JSON
//! returned by `/api/courses/{course_id}/roster/*` maps one-to-one onto them.
//!
//! - `RosterRow`: one non-blank data line of the uploaded CSV.
//! - `Issue`: one problem found in the file, either at header level
//!   (`row_number == None`) or for a specific physical line.
//! - `PreviewResult`: everything the client learns from a file without a network call.
//! - `ImportResult`: what the authoritative importer reports back.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical roster columns, in the order they are required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RosterColumn {
    Email,
    Name,
    StudentNumber,
    Programme,
}

impl RosterColumn {
    /// Every required column, in reporting order.
    pub const REQUIRED: [RosterColumn; 4] = [
        RosterColumn::Email,
        RosterColumn::Name,
        RosterColumn::StudentNumber,
        RosterColumn::Programme,
    ];

    /// Lower-case header key matched against the trimmed header cell.
    pub fn key(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Name => "name",
            Self::StudentNumber => "student_number",
            Self::Programme => "programme",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::REQUIRED.into_iter().find(|column| column.key() == key)
    }
}

impl fmt::Display for RosterColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Closed taxonomy of problems, shared by the preview and the authoritative import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    MissingRequiredHeaders,
    InvalidEmail,
    MissingName,
    MissingStudentNumber,
    MissingProgramme,
    /// Same student number seen earlier in the same file.
    DuplicateStudentNumberInCsv,
    /// Student number already used in the course. Only the server can know this.
    StudentNumberTakenInCourse,
}

impl ReasonCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingRequiredHeaders => "missing_required_headers",
            Self::InvalidEmail => "invalid_email",
            Self::MissingName => "missing_name",
            Self::MissingStudentNumber => "missing_student_number",
            Self::MissingProgramme => "missing_programme",
            Self::DuplicateStudentNumberInCsv => "duplicate_student_number_in_csv",
            Self::StudentNumberTakenInCourse => "student_number_taken_in_course",
        }
    }

    /// Human-readable label shown in the preview table and the issue report.
    pub fn label(self) -> &'static str {
        match self {
            Self::MissingRequiredHeaders => "Missing required headers",
            Self::InvalidEmail => "Invalid email address",
            Self::MissingName => "Name is required",
            Self::MissingStudentNumber => "Student number is required",
            Self::MissingProgramme => "Programme is required",
            Self::DuplicateStudentNumberInCsv => "Student number appears earlier in this file",
            Self::StudentNumberTakenInCourse => "Student number already used in this course",
        }
    }

    pub fn is_header_level(self) -> bool {
        matches!(self, Self::MissingRequiredHeaders)
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One non-blank data line of the roster file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterRow {
    /// Physical 1-based line number in the uploaded file (the header is line 1).
    pub row_number: u32,
    pub email: String,
    pub full_name: String,
    pub student_number: String,
    pub programme: String,
    /// No row issues and no missing headers.
    pub is_valid: bool,
}

/// A single problem found in a roster file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// `None` for header-level issues.
    pub row_number: Option<u32>,
    pub reason_code: ReasonCode,
    pub reason_label: String,
    pub email: String,
    pub full_name: String,
    pub student_number: String,
    pub programme: String,
}

impl Issue {
    pub fn for_row(row: &RosterRow, reason_code: ReasonCode) -> Self {
        Self {
            row_number: Some(row.row_number),
            reason_code,
            reason_label: reason_code.label().to_string(),
            email: row.email.clone(),
            full_name: row.full_name.clone(),
            student_number: row.student_number.clone(),
            programme: row.programme.clone(),
        }
    }

    /// The single header-level issue naming every missing column.
    pub fn missing_headers(missing: &[RosterColumn]) -> Self {
        let names: Vec<&str> = missing.iter().map(|column| column.key()).collect();
        Self {
            row_number: None,
            reason_code: ReasonCode::MissingRequiredHeaders,
            reason_label: format!(
                "{}: {}",
                ReasonCode::MissingRequiredHeaders.label(),
                names.join(", ")
            ),
            email: String::new(),
            full_name: String::new(),
            student_number: String::new(),
            programme: String::new(),
        }
    }

    pub fn is_header_level(&self) -> bool {
        self.row_number.is_none()
    }
}

/// Issue as received from the authoritative importer.
///
/// Only the reason code is mandatory. Missing labels are re-derived from the
/// code and missing field values become empty strings when the issue is
/// converted into the shared [`Issue`] model.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WireIssue {
    #[serde(default)]
    pub row_number: Option<u32>,
    pub reason_code: ReasonCode,
    #[serde(default)]
    pub reason_label: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, alias = "name")]
    pub full_name: Option<String>,
    #[serde(default)]
    pub student_number: Option<String>,
    #[serde(default)]
    pub programme: Option<String>,
}

impl From<WireIssue> for Issue {
    fn from(wire: WireIssue) -> Self {
        let reason_label = wire
            .reason_label
            .filter(|label| !label.trim().is_empty())
            .unwrap_or_else(|| wire.reason_code.label().to_string());
        Self {
            // Header-level codes never point at a row, whatever the server sent.
            row_number: if wire.reason_code.is_header_level() {
                None
            } else {
                wire.row_number
            },
            reason_code: wire.reason_code,
            reason_label,
            email: wire.email.unwrap_or_default(),
            full_name: wire.full_name.unwrap_or_default(),
            student_number: wire.student_number.unwrap_or_default(),
            programme: wire.programme.unwrap_or_default(),
        }
    }
}

/// Client-side, advisory view of a roster file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewResult {
    pub file_name: String,
    /// Header cells exactly as written (untrimmed).
    pub header_row: Vec<String>,
    pub missing_headers: Vec<RosterColumn>,
    pub rows: Vec<RosterRow>,
    pub issues: Vec<Issue>,
}

impl PreviewResult {
    /// Missing headers block the authoritative import. Row issues do not.
    pub fn can_import(&self) -> bool {
        self.missing_headers.is_empty()
    }

    pub fn valid_row_count(&self) -> usize {
        self.rows.iter().filter(|row| row.is_valid).count()
    }

    pub fn issues_for_row(&self, row_number: u32) -> impl Iterator<Item = &Issue> {
        self.issues
            .iter()
            .filter(move |issue| issue.row_number == Some(row_number))
    }
}

/// Outcome of the authoritative import. A non-empty `issues` list is a
/// partial success: every row without an issue was still enrolled or invited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportResult {
    pub created_invites: u32,
    pub auto_enrolled: u32,
    pub issues: Vec<Issue>,
    pub invite_links: Vec<String>,
}

impl ImportResult {
    /// Rows that were enrolled or invited.
    pub fn processed_rows(&self) -> u32 {
        self.created_invites + self.auto_enrolled
    }

    pub fn summary(&self) -> String {
        format!(
            "{} invited, {} auto-enrolled, {} issue(s)",
            self.created_invites,
            self.auto_enrolled,
            self.issues.len()
        )
    }
}

/// Import response as it arrives on the wire, before issue re-mapping.
#[derive(Debug, Clone, Deserialize)]
pub struct WireImportResult {
    #[serde(default)]
    pub created_invites: u32,
    #[serde(default)]
    pub auto_enrolled: u32,
    #[serde(default)]
    pub issues: Vec<WireIssue>,
    #[serde(default)]
    pub invite_links: Vec<String>,
}

impl From<WireImportResult> for ImportResult {
    fn from(wire: WireImportResult) -> Self {
        Self {
            created_invites: wire.created_invites,
            auto_enrolled: wire.auto_enrolled,
            issues: wire.issues.into_iter().map(Issue::from).collect(),
            invite_links: wire.invite_links,
        }
    }
}

/// Body of a 422 answer from the importer (currently only header-level issues).
#[derive(Debug, Clone, Deserialize)]
pub struct WireRejection {
    pub issues: Vec<WireIssue>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reason_codes_serialize_as_snake_case() {
        let json = serde_json::to_string(&ReasonCode::DuplicateStudentNumberInCsv).unwrap();
        assert_eq!(json, "\"duplicate_student_number_in_csv\"");
        let code: ReasonCode = serde_json::from_str("\"student_number_taken_in_course\"").unwrap();
        assert_eq!(code, ReasonCode::StudentNumberTakenInCourse);
        assert_eq!(code.as_str(), "student_number_taken_in_course");
    }

    #[test]
    fn unknown_reason_code_is_rejected() {
        let parsed = serde_json::from_str::<WireIssue>(r#"{"reason_code":"banana"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn wire_issue_fills_label_and_blank_fields() {
        let wire: WireIssue = serde_json::from_str(
            r#"{"row_number":4,"reason_code":"student_number_taken_in_course","email":"a@b.com","name":"A B"}"#,
        )
        .unwrap();
        let issue = Issue::from(wire);
        assert_eq!(issue.row_number, Some(4));
        assert_eq!(issue.reason_label, "Student number already used in this course");
        assert_eq!(issue.full_name, "A B");
        assert_eq!(issue.student_number, "");
    }

    #[test]
    fn header_level_wire_issue_drops_row_number() {
        let wire: WireIssue =
            serde_json::from_str(r#"{"row_number":1,"reason_code":"missing_required_headers"}"#)
                .unwrap();
        assert!(Issue::from(wire).is_header_level());
    }

    #[test]
    fn wire_import_result_tolerates_missing_fields() {
        let wire: WireImportResult = serde_json::from_str(r#"{"created_invites":2}"#).unwrap();
        let result = ImportResult::from(wire);
        assert_eq!(result.processed_rows(), 2);
        assert!(result.issues.is_empty());
        assert_eq!(result.summary(), "2 invited, 0 auto-enrolled, 0 issue(s)");
    }

    #[test]
    fn missing_headers_issue_names_columns() {
        let issue = Issue::missing_headers(&[RosterColumn::Name, RosterColumn::Programme]);
        assert_eq!(issue.reason_label, "Missing required headers: name, programme");
        assert!(issue.is_header_level());
    }
}
