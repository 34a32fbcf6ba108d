//! Correction downloads built from the unified issue list.
//!
//! Both documents are UTF-8, comma separated, LF terminated, and quote every
//! cell (doubling inner quotes), so each written line parses back to the same
//! cells with [`parse_line`](super::tokenizer::parse_line).

use std::collections::HashSet;

use csv::{QuoteStyle, Terminator, WriterBuilder};

use super::validator::is_valid_email;
use crate::error::RosterError;
use crate::model::roster::{ImportResult, Issue, PreviewResult};

pub const ISSUE_REPORT_HEADER: [&str; 7] = [
    "row_number",
    "email",
    "name",
    "student_number",
    "programme",
    "reason_code",
    "reason",
];

pub const CORRECTION_HEADER: [&str; 4] = ["email", "name", "student_number", "programme"];

/// Issues to export: the importer's once it has answered, otherwise the preview's.
///
/// The two lists are never merged, since only the importer knows about
/// conflicts with students already in the course.
pub fn unified_issues<'a>(
    preview: Option<&'a PreviewResult>,
    import: Option<&'a ImportResult>,
) -> &'a [Issue] {
    match (import, preview) {
        (Some(result), _) => &result.issues,
        (None, Some(preview)) => &preview.issues,
        (None, None) => &[],
    }
}

/// Writes `rows` as a fully quoted CSV document.
pub fn write_csv<I, R, S>(rows: I) -> Result<String, RosterError>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator<Item = S>,
    S: AsRef<[u8]>,
{
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .flexible(true)
        .from_writer(Vec::new());
    for row in rows {
        writer.write_record(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| RosterError::Export(err.to_string()))?;
    String::from_utf8(bytes).map_err(|err| RosterError::Export(err.to_string()))
}

/// One line per issue. Header-level issues have an empty `row_number`.
pub fn issue_report(issues: &[Issue]) -> Result<String, RosterError> {
    let header = ISSUE_REPORT_HEADER.map(str::to_string).to_vec();
    let lines = issues.iter().map(|issue| {
        vec![
            issue.row_number.map(|n| n.to_string()).unwrap_or_default(),
            issue.email.clone(),
            issue.full_name.clone(),
            issue.student_number.clone(),
            issue.programme.clone(),
            issue.reason_code.as_str().to_string(),
            issue.reason_label.clone(),
        ]
    });
    write_csv(std::iter::once(header).chain(lines))
}

/// One line per input row that carries at least one issue, ready to be fixed
/// and uploaded again. Emails that do not look like an email are left blank.
pub fn correction_skeleton(issues: &[Issue]) -> Result<String, RosterError> {
    let header = CORRECTION_HEADER.map(str::to_string).to_vec();
    let mut seen_rows = HashSet::new();
    let lines = issues
        .iter()
        .filter(|issue| match issue.row_number {
            Some(row_number) => seen_rows.insert(row_number),
            None => false,
        })
        .map(|issue| {
            let email = if is_valid_email(&issue.email) {
                issue.email.clone()
            } else {
                String::new()
            };
            vec![
                email,
                issue.full_name.clone(),
                issue.student_number.clone(),
                issue.programme.clone(),
            ]
        })
        .collect::<Vec<_>>();
    write_csv(std::iter::once(header).chain(lines))
}

/// `roster.csv` -> `roster-<suffix>.csv`.
pub fn download_name(file_name: &str, suffix: &str) -> String {
    let stem = file_name
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .filter(|stem| !stem.is_empty())
        .unwrap_or(file_name);
    let stem = if stem.is_empty() { "roster" } else { stem };
    format!("{stem}-{suffix}.csv")
}
