//! # Upload Handler
//!
//! `POST /api/upload` (multipart form, file under the field name `file`)
//!
//! ```text
//! 200:      { "fileId": "file-abc123" }
//! 400:      { "error": "No file uploaded." }
//! 413:      { "error": "File too large." }
//! 500:      { "error": "An error occurred while uploading the file." }
//! ```
//!
//! The file is streamed to a staging file chunk by chunk, never buffered whole
//! in memory. The staging file is gone once the handler returns.

use crate::services::RelayService;
use axum::extract::multipart::{Field, MultipartError, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use lib_assistant::StagedUpload;
use lib_core::error::{NO_FILE_MESSAGE, UPLOAD_FAILURE_MESSAGE, UPLOAD_TOO_LARGE_MESSAGE};
use lib_core::{AppError, Result};
use shared::dto::upload::UploadResponse;
use std::sync::Arc;
use tracing::debug;

/// Name of the multipart field carrying the file.
pub const FILE_FIELD: &str = "file";

/// Stage the uploaded file and forward it to the assistant.
pub async fn upload(
    State(relay): State<Arc<RelayService>>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Response {
    let result = async {
        let mut multipart = multipart.map_err(|rejection| {
            debug!("[UPLOAD] Not a multipart request: {}", rejection.body_text());
            AppError::Validation(NO_FILE_MESSAGE.to_string())
        })?;
        let staged = receive_file(&relay, &mut multipart).await?;
        relay.submit_file(staged).await
    }
    .await;

    match result {
        Ok(file_id) => Json(UploadResponse { file_id }).into_response(),
        Err(e) => e.into_boundary_response(UPLOAD_FAILURE_MESSAGE),
    }
}

/// Find the `file` field and stream it into a staging file.
///
/// Returns `None` when the form has no such field.
async fn receive_file(relay: &RelayService, multipart: &mut Multipart) -> Result<Option<StagedUpload>> {
    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        if field.name() != Some(FILE_FIELD) {
            debug!("[UPLOAD] Skipping field {:?}", field.name());
            continue;
        }
        let upload = relay.stage_upload(field.file_name())?;
        return stream_field(field, upload).await.map(Some);
    }
    Ok(None)
}

async fn stream_field(mut field: Field<'_>, mut upload: StagedUpload) -> Result<StagedUpload> {
    while let Some(chunk) = field.chunk().await.map_err(malformed)? {
        upload.write_chunk(&chunk).await?;
    }
    upload.finish().await?;
    debug!("[UPLOAD] Staged {} bytes at {:?}", upload.len(), upload.path());
    Ok(upload)
}

/// Oversized bodies keep their 413; any other parse failure counts as no file.
fn malformed(e: MultipartError) -> AppError {
    debug!("[UPLOAD] Multipart error ({}): {}", e.status(), e.body_text());
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(UPLOAD_TOO_LARGE_MESSAGE.to_string())
    } else {
        AppError::Validation(NO_FILE_MESSAGE.to_string())
    }
}
