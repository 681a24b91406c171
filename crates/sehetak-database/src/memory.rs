//! In-memory store for single-process deployments and tests.
//!
//! One `tokio::sync::RwLock` guards all tables. Every multi-row write
//! (document plus first version, version append plus payload update,
//! cascading delete) happens under a single write-lock acquisition, so
//! readers never observe a half-applied change.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use sehetak_core::error::AppError;
use sehetak_core::result::AppResult;
use sehetak_core::types::{CategoryId, DocumentId, GrantId, UserId, VersionId};
use sehetak_entity::document::version::INITIAL_VERSION_DESCRIPTION;
use sehetak_entity::{
    Category, CreateDocument, CreateUser, CreateVersion, Document, DocumentVersion,
    PermissionLevel, SharingGrant, User, VersionSummary, VisibleDocument,
};

use crate::store::{CategoryCatalog, DocumentStore, SharingRegistry, UserDirectory};

/// Categories present in a fresh store.
pub const SEED_CATEGORIES: [&str; 6] = [
    "Lab Results",
    "Imaging",
    "Prescriptions",
    "Medical Reports",
    "Insurance",
    "Other",
];

#[derive(Debug, Default)]
struct Sequences {
    user: i64,
    category: i64,
    document: i64,
    version: i64,
    grant: i64,
}

fn next(seq: &mut i64) -> i64 {
    *seq += 1;
    *seq
}

#[derive(Debug, Default)]
struct InnerState {
    users: BTreeMap<UserId, User>,
    categories: BTreeMap<CategoryId, Category>,
    documents: BTreeMap<DocumentId, Document>,
    /// Versions per document, ascending by version number.
    versions: BTreeMap<DocumentId, Vec<DocumentVersion>>,
    grants: Vec<SharingGrant>,
    seq: Sequences,
    fail_next_write: bool,
}

impl InnerState {
    fn username(&self, id: UserId) -> String {
        self.users
            .get(&id)
            .map(|u| u.username.clone())
            .unwrap_or_default()
    }

    fn take_injected_failure(&mut self) -> AppResult<()> {
        if std::mem::take(&mut self.fail_next_write) {
            return Err(AppError::database("Injected store failure"));
        }
        Ok(())
    }

    fn summarize(&self, v: &DocumentVersion) -> VersionSummary {
        VersionSummary {
            id: v.id,
            document_id: v.document_id,
            version_number: v.version_number,
            file_name: v.file_name.clone(),
            mime_type: v.mime_type.clone(),
            file_size: v.file_data.len() as i64,
            uploaded_by: v.uploaded_by,
            uploaded_by_username: self.username(v.uploaded_by),
            change_description: v.change_description.clone(),
            created_at: v.created_at,
        }
    }
}

/// Process-local implementation of every store trait.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<InnerState>>,
}

impl MemoryStore {
    /// An empty store with no categories.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding the standard category list.
    pub fn seeded() -> Self {
        let mut inner = InnerState::default();
        for name in SEED_CATEGORIES {
            let id = CategoryId(next(&mut inner.seq.category));
            inner.categories.insert(
                id,
                Category {
                    id,
                    name: name.to_string(),
                },
            );
        }
        Self {
            state: Arc::new(RwLock::new(inner)),
        }
    }

    /// Make the next multi-row write fail before anything is applied.
    #[cfg(any(test, feature = "test-hooks"))]
    pub async fn fail_next_write(&self) {
        self.state.write().await.fail_next_write = true;
    }

    /// Total number of stored version rows across all documents.
    #[cfg(any(test, feature = "test-hooks"))]
    pub async fn version_count(&self) -> usize {
        self.state.read().await.versions.values().map(Vec::len).sum()
    }

    /// Total number of stored documents.
    #[cfg(any(test, feature = "test-hooks"))]
    pub async fn document_count(&self) -> usize {
        self.state.read().await.documents.len()
    }
}

#[async_trait]
impl UserDirectory for MemoryStore {
    async fn find(&self, id: UserId) -> AppResult<Option<User>> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.username == username).cloned())
    }

    async fn create(&self, data: &CreateUser) -> AppResult<User> {
        let mut state = self.state.write().await;
        if state.users.values().any(|u| u.username == data.username) {
            return Err(AppError::validation(format!(
                "Username '{}' already exists",
                data.username
            )));
        }
        let id = UserId(next(&mut state.seq.user));
        let user = User {
            id,
            username: data.username.clone(),
            role: data.role,
            created_at: Utc::now(),
        };
        state.users.insert(id, user.clone());
        Ok(user)
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        Ok(self.state.read().await.users.values().cloned().collect())
    }
}

#[async_trait]
impl CategoryCatalog for MemoryStore {
    async fn list(&self) -> AppResult<Vec<Category>> {
        let mut categories: Vec<Category> =
            self.state.read().await.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn find(&self, id: CategoryId) -> AppResult<Option<Category>> {
        Ok(self.state.read().await.categories.get(&id).cloned())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn create_with_initial_version(&self, data: &CreateDocument) -> AppResult<DocumentId> {
        let mut state = self.state.write().await;

        if !state.users.contains_key(&data.owner_id) {
            return Err(AppError::not_found("User not found"));
        }
        if let Some(category_id) = data.category_id {
            if !state.categories.contains_key(&category_id) {
                return Err(AppError::validation("Unknown document category"));
            }
        }
        state.take_injected_failure()?;

        let now = Utc::now();
        let document_id = DocumentId(next(&mut state.seq.document));
        let version_id = VersionId(next(&mut state.seq.version));

        state.documents.insert(
            document_id,
            Document {
                id: document_id,
                owner_id: data.owner_id,
                category_id: data.category_id,
                doc_type: data.doc_type.clone(),
                description: data.description.clone(),
                file_name: data.file_name.clone(),
                mime_type: data.mime_type.clone(),
                file_data: data.data.to_vec(),
                file_size: data.data.len() as i64,
                current_version: 1,
                upload_date: now,
            },
        );
        state.versions.insert(
            document_id,
            vec![DocumentVersion {
                id: version_id,
                document_id,
                version_number: 1,
                file_name: data.file_name.clone(),
                mime_type: data.mime_type.clone(),
                file_data: data.data.to_vec(),
                uploaded_by: data.owner_id,
                change_description: Some(INITIAL_VERSION_DESCRIPTION.to_string()),
                created_at: now,
            }],
        );

        debug!(document_id = %document_id, "Stored document in memory");
        Ok(document_id)
    }

    async fn find(&self, id: DocumentId) -> AppResult<Option<Document>> {
        Ok(self.state.read().await.documents.get(&id).cloned())
    }

    async fn list_visible_to(&self, user_id: UserId) -> AppResult<Vec<VisibleDocument>> {
        let state = self.state.read().await;
        let mut visible: Vec<VisibleDocument> = state
            .documents
            .values()
            .filter_map(|doc| {
                let best_grant = state
                    .grants
                    .iter()
                    .filter(|g| g.document_id == doc.id && g.shared_with == user_id && g.is_active)
                    .map(|g| g.permission)
                    .max();
                if doc.owner_id != user_id && best_grant.is_none() {
                    return None;
                }
                Some(VisibleDocument {
                    id: doc.id,
                    owner_id: doc.owner_id,
                    owner_username: state.username(doc.owner_id),
                    category_id: doc.category_id,
                    category_name: doc
                        .category_id
                        .and_then(|c| state.categories.get(&c))
                        .map(|c| c.name.clone()),
                    doc_type: doc.doc_type.clone(),
                    description: doc.description.clone(),
                    file_name: doc.file_name.clone(),
                    mime_type: doc.mime_type.clone(),
                    file_size: doc.file_size,
                    current_version: doc.current_version,
                    upload_date: doc.upload_date,
                    best_grant,
                })
            })
            .collect();
        visible.sort_by(|a, b| {
            b.upload_date
                .cmp(&a.upload_date)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(visible)
    }

    async fn list_versions(&self, document_id: DocumentId) -> AppResult<Vec<VersionSummary>> {
        let state = self.state.read().await;
        Ok(state
            .versions
            .get(&document_id)
            .map(|versions| versions.iter().rev().map(|v| state.summarize(v)).collect())
            .unwrap_or_default())
    }

    async fn find_version(
        &self,
        document_id: DocumentId,
        version_number: i32,
    ) -> AppResult<Option<DocumentVersion>> {
        let state = self.state.read().await;
        Ok(state
            .versions
            .get(&document_id)
            .and_then(|versions| versions.iter().find(|v| v.version_number == version_number))
            .cloned())
    }

    async fn append_version(&self, data: &CreateVersion) -> AppResult<VersionSummary> {
        let mut state = self.state.write().await;

        let Some(current) = state.documents.get(&data.document_id).map(|d| d.current_version)
        else {
            return Err(AppError::not_found("Document not found"));
        };
        if !state.users.contains_key(&data.uploaded_by) {
            return Err(AppError::not_found("User not found"));
        }
        state.take_injected_failure()?;

        let version = DocumentVersion {
            id: VersionId(next(&mut state.seq.version)),
            document_id: data.document_id,
            version_number: current + 1,
            file_name: data.file_name.clone(),
            mime_type: data.mime_type.clone(),
            file_data: data.data.to_vec(),
            uploaded_by: data.uploaded_by,
            change_description: data.change_description.clone(),
            created_at: Utc::now(),
        };
        let summary = state.summarize(&version);

        if let Some(doc) = state.documents.get_mut(&data.document_id) {
            doc.file_name = data.file_name.clone();
            doc.mime_type = data.mime_type.clone();
            doc.file_data = data.data.to_vec();
            doc.file_size = data.data.len() as i64;
            doc.current_version = version.version_number;
        }
        state
            .versions
            .entry(data.document_id)
            .or_default()
            .push(version);

        Ok(summary)
    }

    async fn delete(&self, id: DocumentId) -> AppResult<bool> {
        let mut state = self.state.write().await;
        if state.documents.remove(&id).is_none() {
            return Ok(false);
        }
        state.versions.remove(&id);
        state.grants.retain(|g| g.document_id != id);
        Ok(true)
    }
}

#[async_trait]
impl SharingRegistry for MemoryStore {
    async fn grants_for(
        &self,
        document_id: DocumentId,
        user_id: UserId,
    ) -> AppResult<Vec<SharingGrant>> {
        let state = self.state.read().await;
        Ok(state
            .grants
            .iter()
            .filter(|g| g.document_id == document_id && g.shared_with == user_id && g.is_active)
            .cloned()
            .collect())
    }

    async fn list_for_document(&self, document_id: DocumentId) -> AppResult<Vec<SharingGrant>> {
        let state = self.state.read().await;
        Ok(state
            .grants
            .iter()
            .filter(|g| g.document_id == document_id)
            .cloned()
            .collect())
    }

    async fn upsert(
        &self,
        document_id: DocumentId,
        shared_with: UserId,
        permission: PermissionLevel,
        granted_by: UserId,
    ) -> AppResult<SharingGrant> {
        let mut state = self.state.write().await;
        if !state.documents.contains_key(&document_id) {
            return Err(AppError::not_found("Document not found"));
        }
        if !state.users.contains_key(&shared_with) || !state.users.contains_key(&granted_by) {
            return Err(AppError::not_found("User not found"));
        }

        let now = Utc::now();
        if let Some(existing) = state
            .grants
            .iter_mut()
            .find(|g| g.document_id == document_id && g.shared_with == shared_with)
        {
            existing.permission = permission;
            existing.granted_by = granted_by;
            existing.is_active = true;
            existing.updated_at = now;
            return Ok(existing.clone());
        }

        let grant = SharingGrant {
            id: GrantId(next(&mut state.seq.grant)),
            document_id,
            shared_with,
            permission,
            is_active: true,
            granted_by,
            created_at: now,
            updated_at: now,
        };
        state.grants.push(grant.clone());
        Ok(grant)
    }

    async fn deactivate(&self, document_id: DocumentId, shared_with: UserId) -> AppResult<bool> {
        let mut state = self.state.write().await;
        match state
            .grants
            .iter_mut()
            .find(|g| g.document_id == document_id && g.shared_with == shared_with && g.is_active)
        {
            Some(grant) => {
                grant.is_active = false;
                grant.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
