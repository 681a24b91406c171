//! Document and version repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use tracing::warn;

use sehetak_core::error::{AppError, ErrorKind};
use sehetak_core::result::AppResult;
use sehetak_core::types::{DocumentId, UserId, VersionId};
use sehetak_entity::document::version::INITIAL_VERSION_DESCRIPTION;
use sehetak_entity::{
    CreateDocument, CreateVersion, Document, DocumentVersion, VersionSummary, VisibleDocument,
};

use super::violated_constraint;
use crate::store::DocumentStore;

const DOCUMENT_COLUMNS: &str = "id, owner_id, category_id, doc_type, description, file_name, \
     mime_type, file_data, file_size, current_version, upload_date";

const VERSION_COLUMNS: &str = "id, document_id, version_number, file_name, mime_type, \
     file_data, uploaded_by, change_description, created_at";

/// Repository for documents and their version history.
#[derive(Debug, Clone)]
pub struct DocumentRepository {
    pool: PgPool,
}

impl DocumentRepository {
    /// Create a new document repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn begin(&self) -> AppResult<Transaction<'static, Postgres>> {
        self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })
    }
}

/// Commit on success, roll back on failure. A transaction dropped before
/// reaching here (cancelled request) is rolled back by sqlx.
async fn finish<T>(tx: Transaction<'static, Postgres>, outcome: AppResult<T>) -> AppResult<T> {
    match outcome {
        Ok(value) => {
            tx.commit().await.map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
            })?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!(error = %rollback_err, "Failed to roll back transaction");
            }
            Err(err)
        }
    }
}

fn map_reference_error(e: sqlx::Error, context: &'static str) -> AppError {
    let constraint = violated_constraint(&e).map(str::to_owned);
    match constraint.as_deref() {
        Some("documents_owner_id_fkey") | Some("document_versions_uploaded_by_fkey") => {
            AppError::not_found("User not found")
        }
        Some("documents_category_id_fkey") => AppError::validation("Unknown document category"),
        Some("document_versions_number_key") => AppError::with_source(
            ErrorKind::Database,
            "Concurrent version append detected",
            e,
        ),
        _ => AppError::with_source(ErrorKind::Database, context, e),
    }
}

async fn insert_document(
    tx: &mut Transaction<'static, Postgres>,
    data: &CreateDocument,
) -> AppResult<DocumentId> {
    let size = data.data.len() as i64;

    let document_id: DocumentId = sqlx::query_scalar(
        "INSERT INTO documents (owner_id, category_id, doc_type, description, file_name, \
         mime_type, file_data, file_size, current_version) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 1) RETURNING id",
    )
    .bind(data.owner_id)
    .bind(data.category_id)
    .bind(&data.doc_type)
    .bind(&data.description)
    .bind(&data.file_name)
    .bind(&data.mime_type)
    .bind(&data.data[..])
    .bind(size)
    .fetch_one(&mut **tx)
    .await
    .map_err(|e| map_reference_error(e, "Failed to insert document"))?;

    sqlx::query(
        "INSERT INTO document_versions (document_id, version_number, file_name, mime_type, \
         file_data, file_size, uploaded_by, change_description) \
         VALUES ($1, 1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(document_id)
    .bind(&data.file_name)
    .bind(&data.mime_type)
    .bind(&data.data[..])
    .bind(size)
    .bind(data.owner_id)
    .bind(INITIAL_VERSION_DESCRIPTION)
    .execute(&mut **tx)
    .await
    .map_err(|e| map_reference_error(e, "Failed to insert initial version"))?;

    Ok(document_id)
}

async fn insert_next_version(
    tx: &mut Transaction<'static, Postgres>,
    data: &CreateVersion,
) -> AppResult<VersionSummary> {
    let current: Option<i32> =
        sqlx::query_scalar("SELECT current_version FROM documents WHERE id = $1 FOR UPDATE")
            .bind(data.document_id)
            .fetch_optional(&mut **tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to lock document", e))?;

    let Some(current) = current else {
        return Err(AppError::not_found("Document not found"));
    };
    let next = current + 1;
    let size = data.data.len() as i64;

    let (version_id, created_at): (VersionId, DateTime<Utc>) = sqlx::query_as(
        "INSERT INTO document_versions (document_id, version_number, file_name, mime_type, \
         file_data, file_size, uploaded_by, change_description) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING id, created_at",
    )
    .bind(data.document_id)
    .bind(next)
    .bind(&data.file_name)
    .bind(&data.mime_type)
    .bind(&data.data[..])
    .bind(size)
    .bind(data.uploaded_by)
    .bind(&data.change_description)
    .fetch_one(&mut **tx)
    .await
    .map_err(|e| map_reference_error(e, "Failed to insert version"))?;

    sqlx::query(
        "UPDATE documents SET file_name = $2, mime_type = $3, file_data = $4, file_size = $5, \
         current_version = $6 WHERE id = $1",
    )
    .bind(data.document_id)
    .bind(&data.file_name)
    .bind(&data.mime_type)
    .bind(&data.data[..])
    .bind(size)
    .bind(next)
    .execute(&mut **tx)
    .await
    .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update document", e))?;

    let uploaded_by_username: String =
        sqlx::query_scalar("SELECT username FROM users WHERE id = $1")
            .bind(data.uploaded_by)
            .fetch_one(&mut **tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find uploader", e))?;

    Ok(VersionSummary {
        id: version_id,
        document_id: data.document_id,
        version_number: next,
        file_name: data.file_name.clone(),
        mime_type: data.mime_type.clone(),
        file_size: size,
        uploaded_by: data.uploaded_by,
        uploaded_by_username,
        change_description: data.change_description.clone(),
        created_at,
    })
}

#[async_trait]
impl DocumentStore for DocumentRepository {
    async fn create_with_initial_version(&self, data: &CreateDocument) -> AppResult<DocumentId> {
        let mut tx = self.begin().await?;
        let outcome = insert_document(&mut tx, data).await;
        finish(tx, outcome).await
    }

    async fn find(&self, id: DocumentId) -> AppResult<Option<Document>> {
        sqlx::query_as::<_, Document>(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find document", e))
    }

    async fn list_visible_to(&self, user_id: UserId) -> AppResult<Vec<VisibleDocument>> {
        sqlx::query_as::<_, VisibleDocument>(
            "SELECT d.id, d.owner_id, u.username AS owner_username, d.category_id, \
                    c.name AS category_name, d.doc_type, d.description, d.file_name, \
                    d.mime_type, d.file_size, d.current_version, d.upload_date, g.best_grant \
             FROM documents d \
             JOIN users u ON u.id = d.owner_id \
             LEFT JOIN document_categories c ON c.id = d.category_id \
             LEFT JOIN ( \
                 SELECT document_id, MAX(permission) AS best_grant \
                 FROM document_sharing \
                 WHERE shared_with = $1 AND is_active \
                 GROUP BY document_id \
             ) g ON g.document_id = d.id \
             WHERE d.owner_id = $1 OR g.best_grant IS NOT NULL \
             ORDER BY d.upload_date DESC, d.id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list documents", e))
    }

    async fn list_versions(&self, document_id: DocumentId) -> AppResult<Vec<VersionSummary>> {
        sqlx::query_as::<_, VersionSummary>(
            "SELECT v.id, v.document_id, v.version_number, v.file_name, v.mime_type, \
                    v.file_size, v.uploaded_by, u.username AS uploaded_by_username, \
                    v.change_description, v.created_at \
             FROM document_versions v \
             JOIN users u ON u.id = v.uploaded_by \
             WHERE v.document_id = $1 \
             ORDER BY v.version_number DESC",
        )
        .bind(document_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list versions", e))
    }

    async fn find_version(
        &self,
        document_id: DocumentId,
        version_number: i32,
    ) -> AppResult<Option<DocumentVersion>> {
        sqlx::query_as::<_, DocumentVersion>(&format!(
            "SELECT {VERSION_COLUMNS} FROM document_versions \
             WHERE document_id = $1 AND version_number = $2"
        ))
        .bind(document_id)
        .bind(version_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find version", e))
    }

    async fn append_version(&self, data: &CreateVersion) -> AppResult<VersionSummary> {
        let mut tx = self.begin().await?;
        let outcome = insert_next_version(&mut tx, data).await;
        finish(tx, outcome).await
    }

    async fn delete(&self, id: DocumentId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete document", e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}
