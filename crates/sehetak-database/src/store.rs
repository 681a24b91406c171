//! Persistent-store traits and the bundle handed to the service layer.
//!
//! Each trait is object safe so services hold `Arc<dyn Trait>` and never
//! know which backend answers them. [`Stores::open`] picks the backend
//! from configuration.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use sehetak_core::config::{DatabaseBackend, DatabaseConfig};
use sehetak_core::result::AppResult;
use sehetak_core::types::{CategoryId, DocumentId, UserId};
use sehetak_entity::{
    Category, CreateDocument, CreateUser, CreateVersion, Document, DocumentVersion,
    PermissionLevel, SharingGrant, User, VersionSummary, VisibleDocument,
};

use crate::connection::DatabasePool;
use crate::memory::MemoryStore;
use crate::migration::run_migrations;
use crate::repositories::{
    CategoryRepository, DocumentRepository, SharingRepository, UserRepository,
};

/// Lookup and creation of portal users.
#[async_trait]
pub trait UserDirectory: Send + Sync + std::fmt::Debug + 'static {
    /// Find a user by id.
    async fn find(&self, id: UserId) -> AppResult<Option<User>>;

    /// Find a user by username.
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Create a user. Fails with a validation error on a duplicate username.
    async fn create(&self, data: &CreateUser) -> AppResult<User>;

    /// List all users ordered by id.
    async fn list(&self) -> AppResult<Vec<User>>;
}

/// Read-only category reference data.
#[async_trait]
pub trait CategoryCatalog: Send + Sync + std::fmt::Debug + 'static {
    /// All categories ordered by name.
    async fn list(&self) -> AppResult<Vec<Category>>;

    /// Find a category by id.
    async fn find(&self, id: CategoryId) -> AppResult<Option<Category>>;
}

/// Documents and their version history.
#[async_trait]
pub trait DocumentStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a document and its version 1 atomically.
    async fn create_with_initial_version(&self, data: &CreateDocument) -> AppResult<DocumentId>;

    /// Find a document, payload included.
    async fn find(&self, id: DocumentId) -> AppResult<Option<Document>>;

    /// Documents owned by the user or shared with them through an active
    /// grant, newest upload first.
    async fn list_visible_to(&self, user_id: UserId) -> AppResult<Vec<VisibleDocument>>;

    /// Version metadata for a document, highest version number first.
    async fn list_versions(&self, document_id: DocumentId) -> AppResult<Vec<VersionSummary>>;

    /// One version, payload included.
    async fn find_version(
        &self,
        document_id: DocumentId,
        version_number: i32,
    ) -> AppResult<Option<DocumentVersion>>;

    /// Append version `current_version + 1` and make it the document's
    /// current payload, atomically.
    async fn append_version(&self, data: &CreateVersion) -> AppResult<VersionSummary>;

    /// Delete a document with its versions and grants. Returns whether a
    /// row was removed.
    async fn delete(&self, id: DocumentId) -> AppResult<bool>;
}

/// Per-document sharing grants.
#[async_trait]
pub trait SharingRegistry: Send + Sync + std::fmt::Debug + 'static {
    /// Active grants the user holds on the document.
    async fn grants_for(
        &self,
        document_id: DocumentId,
        user_id: UserId,
    ) -> AppResult<Vec<SharingGrant>>;

    /// Every grant on the document, active or not.
    async fn list_for_document(&self, document_id: DocumentId) -> AppResult<Vec<SharingGrant>>;

    /// Create the grant for the pair, or reactivate and relevel the
    /// existing one.
    async fn upsert(
        &self,
        document_id: DocumentId,
        shared_with: UserId,
        permission: PermissionLevel,
        granted_by: UserId,
    ) -> AppResult<SharingGrant>;

    /// Mark the pair's grant inactive. Returns whether an active grant
    /// existed.
    async fn deactivate(&self, document_id: DocumentId, shared_with: UserId) -> AppResult<bool>;
}

/// The backend behind a [`Stores`] bundle.
#[derive(Debug, Clone)]
pub enum StoreBackend {
    /// PostgreSQL pool.
    Postgres(DatabasePool),
    /// Process-local store.
    Memory(MemoryStore),
}

/// All persistent-store handles, built once at start-up.
#[derive(Debug, Clone)]
pub struct Stores {
    pub users: Arc<dyn UserDirectory>,
    pub categories: Arc<dyn CategoryCatalog>,
    pub documents: Arc<dyn DocumentStore>,
    pub sharing: Arc<dyn SharingRegistry>,
    backend: StoreBackend,
}

impl Stores {
    /// Open the configured backend, applying migrations when asked to.
    pub async fn open(config: &DatabaseConfig) -> AppResult<Self> {
        match config.backend {
            DatabaseBackend::Postgres => {
                let db = DatabasePool::connect(config).await?;
                if config.run_migrations {
                    run_migrations(db.pool()).await?;
                }
                Ok(Self::postgres(db))
            }
            DatabaseBackend::Memory => {
                info!("Using in-memory document store; data is lost on exit");
                Ok(Self::memory(MemoryStore::seeded()))
            }
        }
    }

    /// Bundle PostgreSQL repositories sharing one pool.
    pub fn postgres(db: DatabasePool) -> Self {
        let pool = db.pool().clone();
        Self {
            users: Arc::new(UserRepository::new(pool.clone())),
            categories: Arc::new(CategoryRepository::new(pool.clone())),
            documents: Arc::new(DocumentRepository::new(pool.clone())),
            sharing: Arc::new(SharingRepository::new(pool)),
            backend: StoreBackend::Postgres(db),
        }
    }

    /// Bundle a single in-memory store behind every trait.
    pub fn memory(store: MemoryStore) -> Self {
        Self {
            users: Arc::new(store.clone()),
            categories: Arc::new(store.clone()),
            documents: Arc::new(store.clone()),
            sharing: Arc::new(store.clone()),
            backend: StoreBackend::Memory(store),
        }
    }

    /// The backend in use.
    pub fn backend(&self) -> &StoreBackend {
        &self.backend
    }

    /// Short backend name for health output.
    pub fn backend_name(&self) -> &'static str {
        match self.backend {
            StoreBackend::Postgres(_) => "postgres",
            StoreBackend::Memory(_) => "memory",
        }
    }

    /// Check that the backend answers.
    pub async fn health_check(&self) -> AppResult<bool> {
        match &self.backend {
            StoreBackend::Postgres(db) => db.health_check().await,
            StoreBackend::Memory(_) => Ok(true),
        }
    }

    /// Release backend resources.
    pub async fn close(&self) {
        if let StoreBackend::Postgres(db) = &self.backend {
            db.close().await;
        }
    }
}
