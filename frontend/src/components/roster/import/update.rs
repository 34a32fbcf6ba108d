//! Update function for the roster import component (Elm-style).
//!
//! Asynchronous work (reading the file, the import request) is spawned with
//! `spawn_local` and reports back through a message carrying the selection
//! token it was started with. The session decides whether that answer still
//! applies.

use common::model::roster::Issue;
use common::roster::export::download_name;
use common::roster::{correction_skeleton, issue_report, Completion, Failure};
use gloo_console::{debug, error, info};
use gloo_file::{futures::read_as_bytes, Blob};
use yew::platform::spawn_local;
use yew::prelude::*;

use super::helpers::{download_csv, show_toast};
use super::importer::HttpImporter;
use super::messages::Msg;
use super::state::RosterImportComponent;

/// Central update function for the component.
///
/// Returns `true` when the view must re-render. Answers for superseded
/// selections change nothing and return `false`.
pub fn update(
    component: &mut RosterImportComponent,
    ctx: &Context<RosterImportComponent>,
    msg: Msg,
) -> bool {
    match msg {
        Msg::FileChosen(file) => {
            let token = component.session.select_file(&file.name());
            let link = ctx.link().clone();
            spawn_local(async move {
                let blob = Blob::from(file);
                let bytes = read_as_bytes(&blob).await.map_err(|e| format!("{:?}", e));
                link.send_message(Msg::FileRead { token, bytes });
            });
            true
        }
        Msg::FileRead { token, bytes } => {
            let completion = match bytes {
                Ok(bytes) => component.session.file_loaded(token, bytes),
                Err(message) => component.session.file_read_failed(token, &message),
            };
            if completion == Completion::Stale {
                debug!("dropping file read for an older selection");
                return false;
            }
            if let Some(Failure::Unreadable { file_name, error }) = component.session.failure() {
                show_toast(&format!("{} could not be read: {}", file_name, error));
            }
            true
        }
        Msg::Import => {
            let ticket = match component.session.begin_import(&ctx.props().course_id) {
                Ok(ticket) => ticket,
                Err(e) => {
                    show_toast(&e.to_string());
                    return false;
                }
            };
            info!(format!(
                "importing {} into {}",
                ticket.request.file_name, ticket.request.course_id
            ));
            let link = ctx.link().clone();
            spawn_local(async move {
                let (token, outcome) = ticket.submit(&HttpImporter).await;
                link.send_message(Msg::ImportFinished { token, outcome });
            });
            true
        }
        Msg::ImportFinished { token, outcome } => {
            if component.session.complete_import(token, outcome) == Completion::Stale {
                debug!("dropping import response for an older selection");
                return false;
            }
            if let Some(result) = component.session.import_result() {
                show_toast(&result.summary());
            } else if let Some(Failure::Import(e)) = component.session.failure() {
                error!(format!("import failed: {}", e));
                show_toast(&format!("Import failed: {}", e));
            }
            true
        }
        Msg::DownloadIssueReport => {
            download(component, "issues", issue_report);
            false
        }
        Msg::DownloadCorrections => {
            download(component, "corrections", correction_skeleton);
            false
        }
    }
}

fn download<F, E>(component: &RosterImportComponent, suffix: &str, render: F)
where
    F: Fn(&[Issue]) -> Result<String, E>,
    E: std::fmt::Display,
{
    let Some(preview) = component.session.preview() else {
        return;
    };
    let file_name = download_name(&preview.file_name, suffix);
    let result = render(component.session.issues())
        .map_err(|e| e.to_string())
        .and_then(|content| download_csv(&file_name, &content));
    if let Err(e) = result {
        error!(format!("could not export {}: {}", file_name, e));
        show_toast(&format!("Could not export {}: {}", file_name, e));
    }
}
