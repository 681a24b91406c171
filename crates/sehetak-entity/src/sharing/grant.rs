//! Sharing grant entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use sehetak_core::types::{DocumentId, GrantId, UserId};

use super::permission::PermissionLevel;

/// A grant giving one user access to one document.
///
/// At most one row exists per `(document_id, shared_with)` pair; revoking
/// clears `is_active` rather than deleting the row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct SharingGrant {
    /// Grant identifier.
    pub id: GrantId,
    /// The shared document.
    pub document_id: DocumentId,
    /// The user receiving access.
    pub shared_with: UserId,
    /// Level of access granted.
    pub permission: PermissionLevel,
    /// Inactive grants confer nothing.
    pub is_active: bool,
    /// The owner who issued the grant.
    pub granted_by: UserId,
    /// When the grant was first created.
    pub created_at: DateTime<Utc>,
    /// When the grant was last changed.
    pub updated_at: DateTime<Utc>,
}
