//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use sehetak_core::config::AppConfig;
use sehetak_database::Stores;
use sehetak_service::{CategoryService, DocumentService, SharingService, UploadService};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are cheap to clone across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Persistent-store handles
    pub stores: Stores,
    /// Document upload
    pub upload_service: Arc<UploadService>,
    /// Listing, download, delete, and versioning
    pub document_service: Arc<DocumentService>,
    /// Grant management
    pub sharing_service: Arc<SharingService>,
    /// Category lookup
    pub category_service: Arc<CategoryService>,
    /// Process start, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    /// Wire every service onto the given stores.
    pub fn new(config: AppConfig, stores: Stores) -> Self {
        let documents_config = config.documents.clone();
        Self {
            upload_service: Arc::new(UploadService::new(
                stores.users.clone(),
                stores.categories.clone(),
                stores.documents.clone(),
                documents_config.clone(),
            )),
            document_service: Arc::new(DocumentService::new(
                stores.users.clone(),
                stores.documents.clone(),
                stores.sharing.clone(),
                documents_config,
            )),
            sharing_service: Arc::new(SharingService::new(
                stores.users.clone(),
                stores.documents.clone(),
                stores.sharing.clone(),
            )),
            category_service: Arc::new(CategoryService::new(stores.categories.clone())),
            config: Arc::new(config),
            stores,
            started_at: Instant::now(),
        }
    }
}
