//! Document category lookup.

use std::sync::Arc;

use sehetak_core::error::AppError;
use sehetak_database::CategoryCatalog;
use sehetak_entity::Category;

/// Read-only access to document categories.
#[derive(Debug, Clone)]
pub struct CategoryService {
    categories: Arc<dyn CategoryCatalog>,
}

impl CategoryService {
    /// Creates a new category service.
    pub fn new(categories: Arc<dyn CategoryCatalog>) -> Self {
        Self { categories }
    }

    /// All categories ordered by name.
    pub async fn list(&self) -> Result<Vec<Category>, AppError> {
        self.categories.list().await
    }
}
