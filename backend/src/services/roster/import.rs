//! # Authoritative roster import
//!
//! `POST /api/courses/{course_id}/roster/import`
//!
//! 1. The multipart upload is read by `upload::read_roster_upload`.
//! 2. The file goes through `common::roster::build_preview`, the same parser
//!    and validator the browser runs, so both sides apply identical rules.
//! 3. Missing headers refuse the whole file with `422` and the header issue.
//! 4. Every valid row is handed to the `CourseDirectory`, which enrolls the
//!    student directly (existing account), creates an invite, or reports the
//!    student number as already used in the course.
//! 5. The answer is an `ImportResult`. Rows with issues never block their
//!    siblings: the response is a partial success whenever `issues` is non-empty.

use actix_multipart::Multipart;
use actix_web::{web, HttpResponse, Responder};
use common::model::invite::Student;
use common::model::roster::{ImportResult, Issue, PreviewResult, ReasonCode};
use common::roster::build_preview;
use log::{info, warn};
use serde_json::json;

use super::upload::read_roster_upload;
use crate::config::AppConfig;
use crate::directory::{CourseDirectory, EnrollOutcome};

pub(crate) async fn process(
    course_id: web::Path<String>,
    payload: Multipart,
    config: web::Data<AppConfig>,
    directory: web::Data<dyn CourseDirectory>,
) -> impl Responder {
    let course_id = course_id.into_inner();
    let upload = match read_roster_upload(payload, config.max_upload_bytes).await {
        Ok(upload) => upload,
        Err(e) => {
            warn!("import into {}: rejected upload: {}", course_id, e);
            return e.to_response();
        }
    };
    info!(
        "import into {}: {} ({} bytes, md5 {})",
        course_id,
        upload.file_name,
        upload.bytes.len(),
        upload.md5
    );

    let preview = match build_preview(&upload.file_name, &upload.bytes) {
        Ok(preview) => preview,
        Err(e) => {
            warn!("import into {}: {}", course_id, e);
            return HttpResponse::BadRequest().body(format!("Error: {}", e));
        }
    };

    if !preview.can_import() {
        let header_issues: Vec<&Issue> = preview
            .issues
            .iter()
            .filter(|issue| issue.is_header_level())
            .collect();
        warn!(
            "import into {}: missing headers {:?}",
            course_id, preview.missing_headers
        );
        return HttpResponse::UnprocessableEntity().json(json!({ "issues": header_issues }));
    }

    let result = import_rows(&course_id, &preview, directory.get_ref()).await;
    info!("import into {}: {}", course_id, result.summary());
    HttpResponse::Ok().json(result)
}

/// Enrolls every valid row of `preview` and folds the directory's answers
/// into an `ImportResult`.
///
/// Preview issues are carried over as-is. Issues are ordered by row number;
/// issues of the same row keep their relative order.
pub async fn import_rows(
    course_id: &str,
    preview: &PreviewResult,
    directory: &dyn CourseDirectory,
) -> ImportResult {
    let mut result = ImportResult {
        issues: preview.issues.clone(),
        ..ImportResult::default()
    };

    for row in preview.rows.iter().filter(|row| row.is_valid) {
        match directory.enroll(course_id, &Student::from(row)).await {
            EnrollOutcome::AutoEnrolled => result.auto_enrolled += 1,
            EnrollOutcome::Invited { link } => {
                result.created_invites += 1;
                result.invite_links.push(link);
            }
            EnrollOutcome::AlreadyInvited { link } => {
                if !result.invite_links.contains(&link) {
                    result.invite_links.push(link);
                }
            }
            EnrollOutcome::StudentNumberTaken => result
                .issues
                .push(Issue::for_row(row, ReasonCode::StudentNumberTakenInCourse)),
        }
    }

    result.issues.sort_by_key(|issue| issue.row_number);
    result
}
