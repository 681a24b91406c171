//! Category repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use sehetak_core::error::{AppError, ErrorKind};
use sehetak_core::result::AppResult;
use sehetak_core::types::CategoryId;
use sehetak_entity::Category;

use crate::store::CategoryCatalog;

/// Repository for document categories.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: PgPool,
}

impl CategoryRepository {
    /// Create a new category repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryCatalog for CategoryRepository {
    async fn list(&self) -> AppResult<Vec<Category>> {
        sqlx::query_as::<_, Category>("SELECT id, name FROM document_categories ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list categories", e)
            })
    }

    async fn find(&self, id: CategoryId) -> AppResult<Option<Category>> {
        sqlx::query_as::<_, Category>("SELECT id, name FROM document_categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find category", e))
    }
}
