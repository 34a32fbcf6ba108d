//! Roster import endpoints for a course.
//!
//! All routes live under `/api/courses/{course_id}/roster`:
//! - `POST /import`: authoritative bulk import of a CSV upload (`import`).
//! - `POST /validate`: dry run returning the server-side preview (`validate`).
//! - `POST /invite`: single-student invite from a JSON body (`invite`).
//!
//! Uploads are `multipart/form-data` with the CSV in a field named `file`.
//! The handlers expect `web::Data<AppConfig>` and `web::Data<dyn CourseDirectory>`
//! to be registered on the app (see `main.rs`).

use actix_web::web::{post, scope};
use actix_web::Scope;

mod import;
mod invite;
mod upload;
mod validate;

const API_PATH: &str = "/api/courses/{course_id}/roster";

/// Configures and returns the Actix scope for roster routes.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/import", post().to(import::process))
        .route("/validate", post().to(validate::process))
        .route("/invite", post().to(invite::process))
}
