use serde::{Deserialize, Serialize};

use crate::model::roster::RosterRow;

/// Invite links are advertised with this validity. Expiry is enforced elsewhere.
pub const INVITE_VALIDITY_DAYS: u32 = 7;

/// A student as handed to the course directory for enrollment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub email: String,
    pub full_name: String,
    pub student_number: String,
    pub programme: String,
}

impl From<&RosterRow> for Student {
    fn from(row: &RosterRow) -> Self {
        Self {
            email: row.email.clone(),
            full_name: row.full_name.clone(),
            student_number: row.student_number.clone(),
            programme: row.programme.clone(),
        }
    }
}

/// Answer of `POST /api/courses/{course_id}/roster/invite`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleInviteResult {
    /// True when the email already had an account and was enrolled directly.
    pub auto_enrolled: bool,
    pub invite_link: Option<String>,
    pub expires_in_days: u32,
}

impl SingleInviteResult {
    pub fn auto_enrolled() -> Self {
        Self {
            auto_enrolled: true,
            invite_link: None,
            expires_in_days: INVITE_VALIDITY_DAYS,
        }
    }

    pub fn invited(link: String) -> Self {
        Self {
            auto_enrolled: false,
            invite_link: Some(link),
            expires_in_days: INVITE_VALIDITY_DAYS,
        }
    }
}

/// Text shown next to invite links.
pub fn invite_validity_notice() -> String {
    format!("Invite links are valid for {INVITE_VALIDITY_DAYS} days.")
}
