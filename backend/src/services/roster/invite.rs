//! `POST /api/courses/{course_id}/roster/invite`
//!
//! Invites (or directly enrolls) one student typed in by hand. Unlike CSV
//! rows, the programme must belong to the configured vocabulary.
//!
//! - `200 OK` with a `SingleInviteResult`.
//! - `409 Conflict` when the student number is already used in the course.
//! - `422 Unprocessable Entity` with `{ "errors": [...] }` for invalid fields.

use actix_web::{web, HttpResponse, Responder};
use common::model::invite::SingleInviteResult;
use common::model::roster::ReasonCode;
use common::requests::SingleInviteRequest;
use common::roster::validate_single_invite;
use log::info;
use serde_json::json;

use crate::config::AppConfig;
use crate::directory::{CourseDirectory, EnrollOutcome};

pub(crate) async fn process(
    course_id: web::Path<String>,
    payload: web::Json<SingleInviteRequest>,
    config: web::Data<AppConfig>,
    directory: web::Data<dyn CourseDirectory>,
) -> impl Responder {
    let student = match validate_single_invite(&payload, &config.programmes) {
        Ok(student) => student,
        Err(errors) => {
            return HttpResponse::UnprocessableEntity().json(json!({ "errors": errors }));
        }
    };

    match directory.enroll(&course_id, &student).await {
        EnrollOutcome::AutoEnrolled => {
            info!("invite into {}: {} auto-enrolled", course_id, student.email);
            HttpResponse::Ok().json(SingleInviteResult::auto_enrolled())
        }
        EnrollOutcome::Invited { link } | EnrollOutcome::AlreadyInvited { link } => {
            info!("invite into {}: {} invited", course_id, student.email);
            HttpResponse::Ok().json(SingleInviteResult::invited(link))
        }
        EnrollOutcome::StudentNumberTaken => HttpResponse::Conflict().json(json!({
            "reason_code": ReasonCode::StudentNumberTakenInCourse,
            "reason_label": ReasonCode::StudentNumberTakenInCourse.label(),
        })),
    }
}
