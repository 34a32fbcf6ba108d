//! Per-row and cross-row validation rules for roster files.
//!
//! This is the single implementation of the rules: the browser preview and the
//! backend importer both run it through [`build_preview`](super::preview::build_preview).

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::headers::HeaderMap;
use super::tokenizer::Line;
use crate::model::roster::{Issue, ReasonCode, RosterColumn, RosterRow};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// Field-level rules, in reporting order. Cross-row rules are not included.
pub fn field_issues(
    email: &str,
    full_name: &str,
    student_number: &str,
    programme: &str,
) -> Vec<ReasonCode> {
    let mut codes = Vec::new();
    if !is_valid_email(email) {
        codes.push(ReasonCode::InvalidEmail);
    }
    if full_name.trim().is_empty() {
        codes.push(ReasonCode::MissingName);
    }
    if student_number.trim().is_empty() {
        codes.push(ReasonCode::MissingStudentNumber);
    }
    if programme.trim().is_empty() {
        codes.push(ReasonCode::MissingProgramme);
    }
    codes
}

/// Validates data lines one after the other, remembering student numbers seen so far.
pub struct RowValidator<'a> {
    headers: &'a HeaderMap,
    headers_complete: bool,
    seen_student_numbers: HashSet<String>,
}

impl<'a> RowValidator<'a> {
    pub fn new(headers: &'a HeaderMap) -> Self {
        Self {
            headers,
            headers_complete: headers.missing().is_empty(),
            seen_student_numbers: HashSet::new(),
        }
    }

    /// Validates one physical line. Blank lines yield `None` and leave no trace.
    pub fn validate(&mut self, line: &Line) -> Option<(RosterRow, Vec<Issue>)> {
        if line.is_blank() {
            return None;
        }

        let mut row = RosterRow {
            row_number: line.number,
            email: self.headers.field(&line.cells, RosterColumn::Email),
            full_name: self.headers.field(&line.cells, RosterColumn::Name),
            student_number: self.headers.field(&line.cells, RosterColumn::StudentNumber),
            programme: self.headers.field(&line.cells, RosterColumn::Programme),
            is_valid: false,
        };

        let mut codes = field_issues(
            &row.email,
            &row.full_name,
            &row.student_number,
            &row.programme,
        );
        // insert() is false for every repeat after the first occurrence.
        if !row.student_number.is_empty()
            && !self.seen_student_numbers.insert(row.student_number.clone())
        {
            codes.push(ReasonCode::DuplicateStudentNumberInCsv);
        }

        row.is_valid = codes.is_empty() && self.headers_complete;
        let issues = codes
            .into_iter()
            .map(|code| Issue::for_row(&row, code))
            .collect();
        Some((row, issues))
    }
}

/// Validates every data line (the header line must already be removed).
pub fn validate_lines(headers: &HeaderMap, lines: &[Line]) -> (Vec<RosterRow>, Vec<Issue>) {
    let mut validator = RowValidator::new(headers);
    let mut rows = Vec::new();
    let mut issues = Vec::new();
    for line in lines {
        if let Some((row, row_issues)) = validator.validate(line) {
            rows.push(row);
            issues.extend(row_issues);
        }
    }
    (rows, issues)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::tokenizer::tokenize;

    fn run(text: &str) -> (Vec<RosterRow>, Vec<Issue>) {
        let lines = tokenize(text);
        let headers = HeaderMap::resolve(&lines[0].cells);
        validate_lines(&headers, &lines[1..])
    }

    fn codes(issues: &[Issue]) -> Vec<ReasonCode> {
        issues.iter().map(|issue| issue.reason_code).collect()
    }

    #[test]
    fn email_pattern() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("first.last+tag@uni.example.ac.uk"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("a@@b.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn valid_row_has_no_issues() {
        let (rows, issues) = run("email,name,student_number,programme\na@b.com,A B,123,CS\n");
        assert_eq!(rows.len(), 1);
        assert!(rows[0].is_valid);
        assert!(issues.is_empty());
    }

    #[test]
    fn row_accumulates_every_field_issue() {
        let (rows, issues) = run("email,name,student_number,programme\nnope, , ,\n");
        assert!(!rows[0].is_valid);
        assert_eq!(
            codes(&issues),
            vec![
                ReasonCode::InvalidEmail,
                ReasonCode::MissingName,
                ReasonCode::MissingStudentNumber,
                ReasonCode::MissingProgramme,
            ]
        );
        assert!(issues.iter().all(|issue| issue.row_number == Some(2)));
    }

    #[test]
    fn only_repeats_of_a_student_number_are_flagged() {
        let (rows, issues) = run(
            "email,name,student_number,programme\n\
             a@b.com,A,123,CS\n\
             c@d.com,C,123,CS\n\
             e@f.com,E,123,CS\n",
        );
        assert!(rows[0].is_valid);
        assert_eq!(codes(&issues), vec![ReasonCode::DuplicateStudentNumberInCsv; 2]);
        let flagged: Vec<Option<u32>> = issues.iter().map(|issue| issue.row_number).collect();
        assert_eq!(flagged, vec![Some(3), Some(4)]);
    }

    #[test]
    fn empty_student_numbers_are_not_duplicates() {
        let (_, issues) = run("email,name,student_number,programme\na@b.com,A,,CS\nc@d.com,C,,CS\n");
        assert_eq!(codes(&issues), vec![ReasonCode::MissingStudentNumber; 2]);
    }

    #[test]
    fn blank_lines_keep_physical_numbers() {
        let (rows, issues) =
            run("email,name,student_number,programme\na@b.com,A,1,CS\n\n,,,\nbad,B,2,CS\n");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].row_number, 5);
        assert_eq!(issues[0].row_number, Some(5));
    }

    #[test]
    fn missing_header_makes_rows_invalid() {
        let (rows, issues) = run("email,name,student_number\na@b.com,A,1\n");
        assert_eq!(codes(&issues), vec![ReasonCode::MissingProgramme]);
        assert!(!rows[0].is_valid);
        assert_eq!(rows[0].programme, "");
    }
}
