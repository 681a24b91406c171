//! Stable reasons an upload or new version is refused.

use thiserror::Error;

use sehetak_core::error::{AppError, ErrorKind};
use sehetak_core::types::{CategoryId, UserId};

/// Why an upload was refused, in the order the checks run.
///
/// Carried as the `source` of the returned [`AppError`]; recover it with
/// [`UploadRejection::of`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadRejection {
    #[error("User with ID {0} not found")]
    UserNotFound(UserId),
    #[error("No file uploaded")]
    MissingFile,
    #[error("Document type is required")]
    MissingType,
    #[error("File size {size} bytes exceeds the {limit} byte limit")]
    PayloadTooLarge { size: u64, limit: u64 },
    #[error("Unsupported file type '{0}'. Only PDF, images, and Office documents are allowed")]
    UnsupportedMediaType(String),
    #[error("Document category {0} does not exist")]
    UnknownCategory(CategoryId),
    #[error("Uploaded file has no name")]
    MissingFileName,
}

impl UploadRejection {
    /// The error kind this rejection maps to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UserNotFound(_) => ErrorKind::NotFound,
            Self::PayloadTooLarge { .. } => ErrorKind::PayloadTooLarge,
            Self::UnsupportedMediaType(_) => ErrorKind::UnsupportedMediaType,
            Self::MissingFile | Self::MissingType | Self::UnknownCategory(_) | Self::MissingFileName => {
                ErrorKind::Validation
            }
        }
    }

    /// Recover the rejection from an error produced by the upload path.
    pub fn of(err: &AppError) -> Option<&UploadRejection> {
        err.source
            .as_deref()
            .and_then(|source| source.downcast_ref::<UploadRejection>())
    }
}

impl From<UploadRejection> for AppError {
    fn from(rejection: UploadRejection) -> Self {
        let message = rejection.to_string();
        AppError::with_source(rejection.kind(), message, rejection)
    }
}
