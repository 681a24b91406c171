//! Multipart form helpers shared by the upload and new-version endpoints.

use axum::extract::multipart::{Field, MultipartError};
use axum::http::StatusCode;

use sehetak_core::error::AppError;
use sehetak_service::UploadFile;

/// MIME type assumed when a file part carries none.
const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// Map a multipart read failure. Bodies cut off by the request size cap
/// surface as 413 rather than a malformed form.
pub fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::payload_too_large("Request body exceeds the upload size limit")
    } else {
        AppError::validation(format!("Multipart error: {}", err.body_text()))
    }
}

/// Read a text field.
pub async fn read_text(field: Field<'_>) -> Result<String, AppError> {
    field.text().await.map_err(multipart_error)
}

/// Read a file part. A part with neither a file name nor content is what
/// browsers send when no file was chosen, and counts as absent.
pub async fn read_file(field: Field<'_>) -> Result<Option<UploadFile>, AppError> {
    let name = field.file_name().unwrap_or_default().to_string();
    let mime_type = field
        .content_type()
        .unwrap_or(FALLBACK_MIME_TYPE)
        .to_string();
    let data = field.bytes().await.map_err(multipart_error)?;

    if name.is_empty() && data.is_empty() {
        return Ok(None);
    }
    Ok(Some(UploadFile {
        name,
        mime_type,
        data,
    }))
}

/// Treat blank optional text fields as absent.
pub fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
