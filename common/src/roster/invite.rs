//! Validation of manually typed single-student invites.
//!
//! Uses the same field rules as CSV rows, plus one rule CSV rows do not get:
//! the programme must belong to the course's controlled vocabulary.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::validator::field_issues;
use crate::model::invite::Student;
use crate::model::roster::{ReasonCode, RosterColumn};
use crate::requests::SingleInviteRequest;

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{field}: {message}")]
pub struct InviteFormError {
    pub field: RosterColumn,
    pub message: String,
}

impl InviteFormError {
    fn from_code(code: ReasonCode) -> Self {
        let field = match code {
            ReasonCode::InvalidEmail => RosterColumn::Email,
            ReasonCode::MissingName => RosterColumn::Name,
            ReasonCode::MissingProgramme => RosterColumn::Programme,
            _ => RosterColumn::StudentNumber,
        };
        Self {
            field,
            message: code.label().to_string(),
        }
    }
}

/// Validates a single invite and returns the trimmed student, with the
/// programme spelled as in `vocabulary` (matching is case-insensitive).
pub fn validate_single_invite(
    request: &SingleInviteRequest,
    vocabulary: &[String],
) -> Result<Student, Vec<InviteFormError>> {
    let email = request.email.trim();
    let full_name = request.full_name.trim();
    let student_number = request.student_number.trim();
    let programme = request.programme.trim();

    let mut errors: Vec<InviteFormError> =
        field_issues(email, full_name, student_number, programme)
            .into_iter()
            .map(InviteFormError::from_code)
            .collect();

    let canonical = vocabulary
        .iter()
        .find(|known| known.eq_ignore_ascii_case(programme));
    if canonical.is_none() && !programme.is_empty() {
        errors.push(InviteFormError {
            field: RosterColumn::Programme,
            message: format!(
                "Unknown programme '{programme}'; expected one of: {}",
                vocabulary.join(", ")
            ),
        });
    }

    match canonical {
        Some(canonical) if errors.is_empty() => Ok(Student {
            email: email.to_string(),
            full_name: full_name.to_string(),
            student_number: student_number.to_string(),
            programme: canonical.clone(),
        }),
        _ => Err(errors),
    }
}
