//! `POST /api/courses/{course_id}/roster/validate`
//!
//! Dry run of the import: parses and validates the uploaded file with the
//! shared pipeline and returns the `PreviewResult` without touching the course
//! directory. Course-level conflicts are not checked here.

use actix_multipart::Multipart;
use actix_web::{web, HttpResponse, Responder};
use common::roster::build_preview;
use log::{debug, warn};

use super::upload::read_roster_upload;
use crate::config::AppConfig;

pub(crate) async fn process(
    course_id: web::Path<String>,
    payload: Multipart,
    config: web::Data<AppConfig>,
) -> impl Responder {
    let upload = match read_roster_upload(payload, config.max_upload_bytes).await {
        Ok(upload) => upload,
        Err(e) => return e.to_response(),
    };

    match build_preview(&upload.file_name, &upload.bytes) {
        Ok(preview) => {
            debug!(
                "validate for {}: {} ({} row(s), {} issue(s))",
                course_id,
                upload.file_name,
                preview.rows.len(),
                preview.issues.len()
            );
            HttpResponse::Ok().json(preview)
        }
        Err(e) => {
            warn!("validate for {}: {}", course_id, e);
            HttpResponse::BadRequest().body(format!("Error: {}", e))
        }
    }
}
