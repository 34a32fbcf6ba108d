//! Course directory: the enrollment collaborator behind the roster endpoints.
//!
//! The importer only decides *which* rows to hand over; whether a student is
//! enrolled directly, invited, or refused because the student number is
//! already used in the course is answered by a `CourseDirectory`.
//!
//! `InMemoryDirectory` is the implementation wired in `main.rs`. It keeps its
//! state behind an `Arc<RwLock>` so it can be shared across Actix workers as
//! `web::Data<dyn CourseDirectory>`. Nothing is persisted.

use async_trait::async_trait;
use common::model::invite::Student;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Result of handing one student to the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrollOutcome {
    /// The email already has an account; the student was added to the course.
    AutoEnrolled,
    /// No account yet; a new invite was created.
    Invited { link: String },
    /// No account yet and an invite for this email is already pending in the course.
    AlreadyInvited { link: String },
    /// Another student already uses this student number in the course.
    StudentNumberTaken,
}

#[async_trait]
pub trait CourseDirectory: Send + Sync {
    async fn enroll(&self, course_id: &str, student: &Student) -> EnrollOutcome;
}

/// Per-course bookkeeping.
#[derive(Debug, Default)]
struct CourseRoster {
    /// Student number -> lower-cased email of the student holding it.
    student_numbers: HashMap<String, String>,
    /// Lower-cased email -> pending invite link.
    pending_invites: HashMap<String, String>,
}

#[derive(Debug, Default)]
struct DirectoryState {
    /// Lower-cased emails that already have an account.
    accounts: HashSet<String>,
    courses: HashMap<String, CourseRoster>,
}

#[derive(Clone)]
pub struct InMemoryDirectory {
    invite_base_url: String,
    state: Arc<RwLock<DirectoryState>>,
}

impl InMemoryDirectory {
    pub fn new(invite_base_url: &str, known_accounts: &[String]) -> Self {
        let accounts = known_accounts
            .iter()
            .map(|email| email.trim().to_lowercase())
            .collect();
        Self {
            invite_base_url: invite_base_url.trim_end_matches('/').to_string(),
            state: Arc::new(RwLock::new(DirectoryState {
                accounts,
                courses: HashMap::new(),
            })),
        }
    }

    fn new_invite_link(&self) -> String {
        format!("{}/{}", self.invite_base_url, Uuid::new_v4())
    }
}

#[async_trait]
impl CourseDirectory for InMemoryDirectory {
    async fn enroll(&self, course_id: &str, student: &Student) -> EnrollOutcome {
        let email = student.email.trim().to_lowercase();
        let mut state = self.state.write().await;
        let has_account = state.accounts.contains(&email);
        let course = state.courses.entry(course_id.to_string()).or_default();

        let holder = course
            .student_numbers
            .entry(student.student_number.clone())
            .or_insert_with(|| email.clone());
        if *holder != email {
            return EnrollOutcome::StudentNumberTaken;
        }

        if has_account {
            course.pending_invites.remove(&email);
            return EnrollOutcome::AutoEnrolled;
        }

        if let Some(link) = course.pending_invites.get(&email) {
            return EnrollOutcome::AlreadyInvited { link: link.clone() };
        }
        let link = self.new_invite_link();
        course.pending_invites.insert(email, link.clone());
        EnrollOutcome::Invited { link }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(email: &str, number: &str) -> Student {
        Student {
            email: email.into(),
            full_name: "Test Student".into(),
            student_number: number.into(),
            programme: "CS".into(),
        }
    }

    #[actix_web::test]
    async fn known_accounts_are_auto_enrolled() {
        let directory = InMemoryDirectory::new("http://x/invite", &["Ana@Uni.edu".to_string()]);
        let outcome = directory.enroll("c1", &student("ana@uni.edu", "1")).await;
        assert_eq!(outcome, EnrollOutcome::AutoEnrolled);
    }

    #[actix_web::test]
    async fn unknown_emails_get_a_stable_invite_link() {
        let directory = InMemoryDirectory::new("http://x/invite/", &[]);
        let first = directory.enroll("c1", &student("bo@uni.edu", "2")).await;
        let again = directory.enroll("c1", &student("Bo@uni.edu", "2")).await;
        match (&first, &again) {
            (EnrollOutcome::Invited { link }, EnrollOutcome::AlreadyInvited { link: same }) => {
                assert!(link.starts_with("http://x/invite/"));
                assert_eq!(link, same);
            }
            other => panic!("expected invites, got {other:?}"),
        }
    }

    #[actix_web::test]
    async fn student_number_is_unique_per_course() {
        let directory = InMemoryDirectory::new("http://x/invite", &[]);
        directory.enroll("c1", &student("a@uni.edu", "7")).await;
        let clash = directory.enroll("c1", &student("b@uni.edu", "7")).await;
        assert_eq!(clash, EnrollOutcome::StudentNumberTaken);
        let other_course = directory.enroll("c2", &student("b@uni.edu", "7")).await;
        assert!(matches!(other_course, EnrollOutcome::Invited { .. }));
    }
}
