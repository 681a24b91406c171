//! Document version entity model.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use sehetak_core::types::{DocumentId, UserId, VersionId};

use super::model::DocumentPayload;

/// Change description recorded on the first version of every document.
pub const INITIAL_VERSION_DESCRIPTION: &str = "Initial version";

/// One immutable entry in a document's version history.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DocumentVersion {
    /// Version row identifier.
    pub id: VersionId,
    /// Owning document.
    pub document_id: DocumentId,
    /// 1-based, gap-free version number.
    pub version_number: i32,
    /// File name of this version.
    pub file_name: String,
    /// MIME type of this version.
    pub mime_type: String,
    /// Raw bytes of this version.
    #[serde(skip)]
    pub file_data: Vec<u8>,
    /// User who uploaded this version.
    pub uploaded_by: UserId,
    /// Optional note describing the change.
    pub change_description: Option<String>,
    /// When the version was stored.
    pub created_at: DateTime<Utc>,
}

impl DocumentVersion {
    /// Copy out this version's payload for download.
    pub fn payload(&self) -> DocumentPayload {
        DocumentPayload {
            file_name: self.file_name.clone(),
            mime_type: self.mime_type.clone(),
            data: Bytes::copy_from_slice(&self.file_data),
        }
    }
}

/// Data required to append a version to an existing document.
#[derive(Debug, Clone)]
pub struct CreateVersion {
    /// Target document.
    pub document_id: DocumentId,
    /// Uploading user.
    pub uploaded_by: UserId,
    /// File name.
    pub file_name: String,
    /// MIME type.
    pub mime_type: String,
    /// File contents.
    pub data: Bytes,
    /// Optional change note.
    pub change_description: Option<String>,
}

/// Version metadata without the payload, as returned by listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct VersionSummary {
    /// Version row identifier.
    pub id: VersionId,
    /// Owning document.
    pub document_id: DocumentId,
    /// Version number.
    pub version_number: i32,
    /// File name of this version.
    pub file_name: String,
    /// MIME type of this version.
    pub mime_type: String,
    /// Size of the payload in bytes.
    pub file_size: i64,
    /// Uploading user.
    pub uploaded_by: UserId,
    /// Uploading user's name.
    pub uploaded_by_username: String,
    /// Optional change note.
    pub change_description: Option<String>,
    /// When the version was stored.
    pub created_at: DateTime<Utc>,
}
