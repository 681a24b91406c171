//! Document entity model.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use sehetak_core::types::{CategoryId, DocumentId, UserId};

/// A stored medical document.
///
/// The payload columns always mirror the latest version.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Document {
    /// Document identifier.
    pub id: DocumentId,
    /// Owning user.
    pub owner_id: UserId,
    /// Optional category.
    pub category_id: Option<CategoryId>,
    /// Free-form document type label (e.g. "Lab Report").
    #[serde(rename = "type")]
    pub doc_type: String,
    /// Optional description.
    pub description: Option<String>,
    /// Original file name of the latest version.
    pub file_name: String,
    /// MIME type of the latest version.
    pub mime_type: String,
    /// Raw bytes of the latest version.
    #[serde(skip)]
    pub file_data: Vec<u8>,
    /// Size of `file_data` in bytes.
    pub file_size: i64,
    /// Number of the latest version (starts at 1).
    pub current_version: i32,
    /// When the document was first uploaded.
    pub upload_date: DateTime<Utc>,
}

impl Document {
    /// Copy out the latest payload for download.
    pub fn payload(&self) -> DocumentPayload {
        DocumentPayload {
            file_name: self.file_name.clone(),
            mime_type: self.mime_type.clone(),
            data: Bytes::copy_from_slice(&self.file_data),
        }
    }
}

/// Data required to create a document together with its first version.
#[derive(Debug, Clone)]
pub struct CreateDocument {
    /// Owning user.
    pub owner_id: UserId,
    /// Optional category.
    pub category_id: Option<CategoryId>,
    /// Document type label.
    pub doc_type: String,
    /// Optional description.
    pub description: Option<String>,
    /// Original file name.
    pub file_name: String,
    /// MIME type.
    pub mime_type: String,
    /// File contents.
    pub data: Bytes,
}

/// Bytes and metadata returned by a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPayload {
    /// File name for the `Content-Disposition` header.
    pub file_name: String,
    /// Stored MIME type.
    pub mime_type: String,
    /// Exact stored bytes.
    pub data: Bytes,
}
