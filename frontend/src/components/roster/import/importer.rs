//! Browser implementation of `RosterImporter`.
//!
//! The selected file is posted untouched as `multipart/form-data` (field
//! `file`) to `/api/courses/{course_id}/roster/import`.
//!
//! | status | meaning                                   | mapped to                   |
//! |--------|-------------------------------------------|-----------------------------|
//! | 200    | `ImportResult`, possibly with issues      | `Ok(ImportResult)`          |
//! | 422    | `{ "issues": [...] }`, whole file refused | `ImportError::Rejected`     |
//! | other  | plain-text error                          | `ImportError::Status`       |

use common::error::ImportError;
use common::model::roster::{ImportResult, Issue, WireImportResult, WireRejection};
use common::roster::{ImportRequest, RosterImporter};
use gloo_net::http::Request;
use wasm_bindgen::JsValue;
use web_sys::{BlobPropertyBag, FormData};

use super::helpers::js_error;

pub struct HttpImporter;

impl RosterImporter for HttpImporter {
    async fn import(&self, request: &ImportRequest) -> Result<ImportResult, ImportError> {
        let form = upload_form(&request.file_name, &request.bytes)
            .map_err(|e| ImportError::Network(js_error(e)))?;
        let response = Request::post(&import_url(&request.course_id))
            .body(form)
            .map_err(|e| ImportError::Network(e.to_string()))?
            .send()
            .await
            .map_err(|e| ImportError::Network(e.to_string()))?;

        match response.status() {
            200 => response
                .json::<WireImportResult>()
                .await
                .map(ImportResult::from)
                .map_err(|e| ImportError::InvalidResponse(e.to_string())),
            422 => {
                let rejection = response
                    .json::<WireRejection>()
                    .await
                    .map_err(|e| ImportError::InvalidResponse(e.to_string()))?;
                Err(ImportError::Rejected(
                    rejection.issues.into_iter().map(Issue::from).collect(),
                ))
            }
            status => Err(ImportError::Status {
                status,
                message: response.text().await.unwrap_or_default(),
            }),
        }
    }
}

pub fn import_url(course_id: &str) -> String {
    format!("/api/courses/{}/roster/import", course_id)
}

fn upload_form(file_name: &str, bytes: &[u8]) -> Result<FormData, JsValue> {
    let parts = js_sys::Array::new();
    parts.push(&js_sys::Uint8Array::from(bytes));
    let options = BlobPropertyBag::new();
    options.set_type("text/csv");
    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;

    let form = FormData::new()?;
    form.append_with_blob_and_filename("file", &blob, file_name)?;
    Ok(form)
}
