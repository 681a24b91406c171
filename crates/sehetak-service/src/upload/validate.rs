//! Payload checks shared by uploads and new versions.

use sehetak_core::config::DocumentsConfig;

use super::rejection::UploadRejection;
use super::UploadFile;

/// Size limit, then MIME allow-list.
pub fn check_payload(config: &DocumentsConfig, file: &UploadFile) -> Result<(), UploadRejection> {
    let size = file.data.len() as u64;
    if size > config.max_upload_size_bytes {
        return Err(UploadRejection::PayloadTooLarge {
            size,
            limit: config.max_upload_size_bytes,
        });
    }
    if !config.is_allowed(&file.mime_type) {
        return Err(UploadRejection::UnsupportedMediaType(file.mime_type.clone()));
    }
    Ok(())
}

/// The stored name must be non-empty after trimming.
pub fn check_file_name(file: &UploadFile) -> Result<(), UploadRejection> {
    if file.name.trim().is_empty() {
        return Err(UploadRejection::MissingFileName);
    }
    Ok(())
}
