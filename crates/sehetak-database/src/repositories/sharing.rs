//! Sharing grant repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use sehetak_core::error::{AppError, ErrorKind};
use sehetak_core::result::AppResult;
use sehetak_core::types::{DocumentId, UserId};
use sehetak_entity::{PermissionLevel, SharingGrant};

use super::violated_constraint;
use crate::store::SharingRegistry;

const GRANT_COLUMNS: &str =
    "id, document_id, shared_with, permission, is_active, granted_by, created_at, updated_at";

/// Repository for per-document sharing grants.
#[derive(Debug, Clone)]
pub struct SharingRepository {
    pool: PgPool,
}

impl SharingRepository {
    /// Create a new sharing repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SharingRegistry for SharingRepository {
    async fn grants_for(
        &self,
        document_id: DocumentId,
        user_id: UserId,
    ) -> AppResult<Vec<SharingGrant>> {
        sqlx::query_as::<_, SharingGrant>(&format!(
            "SELECT {GRANT_COLUMNS} FROM document_sharing \
             WHERE document_id = $1 AND shared_with = $2 AND is_active"
        ))
        .bind(document_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load grants", e))
    }

    async fn list_for_document(&self, document_id: DocumentId) -> AppResult<Vec<SharingGrant>> {
        sqlx::query_as::<_, SharingGrant>(&format!(
            "SELECT {GRANT_COLUMNS} FROM document_sharing \
             WHERE document_id = $1 ORDER BY created_at, id"
        ))
        .bind(document_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list grants", e))
    }

    async fn upsert(
        &self,
        document_id: DocumentId,
        shared_with: UserId,
        permission: PermissionLevel,
        granted_by: UserId,
    ) -> AppResult<SharingGrant> {
        sqlx::query_as::<_, SharingGrant>(&format!(
            "INSERT INTO document_sharing (document_id, shared_with, permission, granted_by) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (document_id, shared_with) DO UPDATE SET \
                 permission = EXCLUDED.permission, \
                 granted_by = EXCLUDED.granted_by, \
                 is_active = TRUE, \
                 updated_at = NOW() \
             RETURNING {GRANT_COLUMNS}"
        ))
        .bind(document_id)
        .bind(shared_with)
        .bind(permission)
        .bind(granted_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            let constraint = violated_constraint(&e).map(str::to_owned);
            match constraint.as_deref() {
                Some("document_sharing_document_id_fkey") => {
                    AppError::not_found("Document not found")
                }
                Some("document_sharing_shared_with_fkey")
                | Some("document_sharing_granted_by_fkey") => AppError::not_found("User not found"),
                _ => AppError::with_source(ErrorKind::Database, "Failed to save grant", e),
            }
        })
    }

    async fn deactivate(&self, document_id: DocumentId, shared_with: UserId) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE document_sharing SET is_active = FALSE, updated_at = NOW() \
             WHERE document_id = $1 AND shared_with = $2 AND is_active",
        )
        .bind(document_id)
        .bind(shared_with)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to revoke grant", e))?;
        Ok(result.rows_affected() > 0)
    }
}
