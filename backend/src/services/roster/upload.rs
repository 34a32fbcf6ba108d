//! Reads a roster CSV out of a `multipart/form-data` request.
//!
//! The client sends the file untouched in a field named `file`. Bytes are
//! buffered in memory (bounded by `ROSTER_MAX_UPLOAD_BYTES`) and hashed with
//! MD5 while streaming so every import can be traced back to the exact upload
//! in the logs. Other fields are ignored.

use actix_multipart::Multipart;
use actix_web::HttpResponse;
use futures_util::StreamExt;
use md5::Context;
use thiserror::Error;

/// The uploaded roster file.
pub struct RosterUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    /// Hex MD5 digest of `bytes`.
    pub md5: String,
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("malformed multipart payload: {0}")]
    Multipart(String),
    #[error("the request has no `file` field")]
    MissingFile,
    #[error("the file must end with .csv (got '{0}')")]
    NotCsv(String),
    #[error("the file is larger than {limit} bytes")]
    TooLarge { limit: usize },
}

impl UploadError {
    pub fn to_response(&self) -> HttpResponse {
        match self {
            UploadError::TooLarge { .. } => HttpResponse::PayloadTooLarge(),
            _ => HttpResponse::BadRequest(),
        }
        .body(format!("Error: {}", self))
    }
}

/// Collects the `file` field of `payload`, refusing anything that is not a
/// `.csv` file or exceeds `max_bytes`.
pub async fn read_roster_upload(
    mut payload: Multipart,
    max_bytes: usize,
) -> Result<RosterUpload, UploadError> {
    let mut upload: Option<RosterUpload> = None;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| UploadError::Multipart(e.to_string()))?;
        let field_name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));
        if field_name.as_deref() != Some("file") || upload.is_some() {
            continue;
        }

        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename().map(|f| f.to_string()))
            .unwrap_or_default();
        if !file_name.to_lowercase().ends_with(".csv") {
            return Err(UploadError::NotCsv(file_name));
        }

        let mut hasher = Context::new();
        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| UploadError::Multipart(e.to_string()))?;
            if bytes.len() + chunk.len() > max_bytes {
                return Err(UploadError::TooLarge { limit: max_bytes });
            }
            hasher.consume(&chunk);
            bytes.extend_from_slice(&chunk);
        }

        upload = Some(RosterUpload {
            file_name,
            bytes,
            md5: format!("{:x}", hasher.finalize()),
        });
    }

    upload.ok_or(UploadError::MissingFile)
}
