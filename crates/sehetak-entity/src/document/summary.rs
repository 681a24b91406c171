//! Listing projections of documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use sehetak_core::types::{CategoryId, DocumentId, UserId};

use crate::sharing::{AccessLevel, PermissionLevel};

/// A document visible to some user, as read from the store.
///
/// `best_grant` is the most permissive active grant the user holds on the
/// document, if any. Turning it into an [`AccessLevel`] is left to the
/// access rules in the service layer.
#[derive(Debug, Clone, FromRow)]
pub struct VisibleDocument {
    pub id: DocumentId,
    pub owner_id: UserId,
    pub owner_username: String,
    pub category_id: Option<CategoryId>,
    pub category_name: Option<String>,
    pub doc_type: String,
    pub description: Option<String>,
    pub file_name: String,
    pub mime_type: String,
    pub file_size: i64,
    pub current_version: i32,
    pub upload_date: DateTime<Utc>,
    pub best_grant: Option<PermissionLevel>,
}

impl VisibleDocument {
    /// Attach the computed access level, producing the listing row.
    pub fn into_summary(self, access_level: AccessLevel) -> DocumentSummary {
        DocumentSummary {
            id: self.id,
            owner_id: self.owner_id,
            owner_username: self.owner_username,
            category_id: self.category_id,
            category_name: self.category_name,
            doc_type: self.doc_type,
            description: self.description,
            file_name: self.file_name,
            mime_type: self.mime_type,
            file_size: self.file_size,
            current_version: self.current_version,
            upload_date: self.upload_date,
            access_level,
        }
    }
}

/// Document metadata (no payload) annotated with the viewer's access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    /// Document identifier.
    pub id: DocumentId,
    /// Owning user.
    pub owner_id: UserId,
    /// Owner's user name.
    pub owner_username: String,
    /// Optional category.
    pub category_id: Option<CategoryId>,
    /// Category display name.
    pub category_name: Option<String>,
    /// Document type label.
    #[serde(rename = "type")]
    pub doc_type: String,
    /// Optional description.
    pub description: Option<String>,
    /// File name of the latest version.
    pub file_name: String,
    /// MIME type of the latest version.
    pub mime_type: String,
    /// Size of the latest version in bytes.
    pub file_size: i64,
    /// Latest version number.
    pub current_version: i32,
    /// When the document was first uploaded.
    pub upload_date: DateTime<Utc>,
    /// How the viewer reaches this document.
    pub access_level: AccessLevel,
}
