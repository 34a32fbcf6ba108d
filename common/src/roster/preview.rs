//! Builds the advisory preview of a roster file.

use super::headers::HeaderMap;
use super::tokenizer::{decode, tokenize};
use super::validator::validate_lines;
use crate::error::RosterError;
use crate::model::roster::{Issue, PreviewResult};

/// Decodes, tokenizes and validates `bytes`.
///
/// Pure and deterministic: identical input always yields an equal result, so it
/// can run again on every file selection. Missing headers do not stop the data
/// rows from being parsed; they add one header-level issue (listed first) and
/// mark every row invalid.
pub fn build_preview(file_name: &str, bytes: &[u8]) -> Result<PreviewResult, RosterError> {
    let text = decode(bytes)?;
    let mut lines = tokenize(text);

    let header_row = if lines.is_empty() {
        Vec::new()
    } else {
        lines.remove(0).cells
    };
    let headers = HeaderMap::resolve(&header_row);
    let missing_headers = headers.missing();

    let (rows, row_issues) = validate_lines(&headers, &lines);

    let mut issues = Vec::with_capacity(row_issues.len() + 1);
    if !missing_headers.is_empty() {
        issues.push(Issue::missing_headers(&missing_headers));
    }
    issues.extend(row_issues);

    log::debug!(
        "preview of {file_name}: {} row(s), {} issue(s), {} missing header(s)",
        rows.len(),
        issues.len(),
        missing_headers.len()
    );

    Ok(PreviewResult {
        file_name: file_name.to_string(),
        header_row,
        missing_headers,
        rows,
        issues,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::roster::{ReasonCode, RosterColumn};
    use proptest::prelude::*;

    const HEADER: &str = "email,name,student_number,programme";

    #[test]
    fn single_valid_row() {
        let preview = build_preview("r.csv", format!("{HEADER}\na@b.com,A B,123,CS\n").as_bytes())
            .unwrap();
        assert_eq!(preview.rows.len(), 1);
        assert!(preview.rows[0].is_valid);
        assert!(preview.issues.is_empty());
        assert!(preview.can_import());
    }

    #[test]
    fn missing_programme_header_blocks_import() {
        let preview = build_preview(
            "r.csv",
            b"email,name,student_number\na@b.com,A B,123\nc@d.com,C D,456\n",
        )
        .unwrap();
        assert_eq!(preview.missing_headers, vec![RosterColumn::Programme]);
        let header_issues: Vec<_> = preview.issues.iter().filter(|i| i.is_header_level()).collect();
        assert_eq!(header_issues.len(), 1);
        assert_eq!(header_issues[0].reason_code, ReasonCode::MissingRequiredHeaders);
        assert!(preview.issues[0].is_header_level());
        assert_eq!(preview.rows.len(), 2);
        assert!(preview.rows.iter().all(|row| !row.is_valid));
        assert!(!preview.can_import());
    }

    #[test]
    fn duplicate_student_number() {
        let preview = build_preview(
            "r.csv",
            format!("{HEADER}\na@b.com,A,123,CS\nc@d.com,C,123,CS\n").as_bytes(),
        )
        .unwrap();
        assert!(preview.rows[0].is_valid);
        assert_eq!(preview.issues_for_row(2).count(), 0);
        let second: Vec<_> = preview.issues_for_row(3).map(|i| i.reason_code).collect();
        assert_eq!(second, vec![ReasonCode::DuplicateStudentNumberInCsv]);
    }

    #[test]
    fn invalid_email() {
        let preview =
            build_preview("r.csv", format!("{HEADER}\nnot-an-email,A,1,CS\n").as_bytes()).unwrap();
        assert!(!preview.rows[0].is_valid);
        assert_eq!(preview.issues[0].reason_code, ReasonCode::InvalidEmail);
        assert_eq!(preview.issues[0].email, "not-an-email");
    }

    #[test]
    fn header_order_and_case_do_not_matter() {
        let a = build_preview(
            "r.csv",
            b"email,name,student_number,programme\na@b.com,A,1,CS\nbad,,1,\n",
        )
        .unwrap();
        let b = build_preview(
            "r.csv",
            b"PROGRAMME,Student_Number,Name,Email\nCS,1,A,a@b.com\n,1,,bad\n",
        )
        .unwrap();
        assert_eq!(a.rows, b.rows);
        assert_eq!(a.issues, b.issues);
    }

    #[test]
    fn blank_line_does_not_shift_row_numbers() {
        let preview = build_preview(
            "r.csv",
            format!("{HEADER}\na@b.com,A,1,CS\n\nbroken,B,2,CS\n").as_bytes(),
        )
        .unwrap();
        assert_eq!(preview.rows.len(), 2);
        assert_eq!(preview.issues[0].row_number, Some(4));
    }

    #[test]
    fn empty_file_reports_every_header() {
        let preview = build_preview("empty.csv", b"").unwrap();
        assert_eq!(preview.missing_headers, RosterColumn::REQUIRED.to_vec());
        assert!(preview.rows.is_empty());
        assert_eq!(preview.issues.len(), 1);
    }

    #[test]
    fn garbage_is_a_parse_failure() {
        assert!(build_preview("x.csv", &[0x00, 0x9f, 0x92, 0x96]).is_err());
    }

    proptest! {
        #[test]
        fn preview_is_idempotent(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
            let first = build_preview("p.csv", &bytes);
            let second = build_preview("p.csv", &bytes);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn text_preview_is_idempotent(body in "[a-z@.,\" \n0-9]{0,120}") {
            let text = format!("{HEADER}\n{body}");
            let first = build_preview("p.csv", text.as_bytes()).unwrap();
            let second = build_preview("p.csv", text.as_bytes()).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
