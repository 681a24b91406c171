//! Upload coordination: validate a new document, then store it together
//! with its first version in one atomic write.

pub mod rejection;
pub mod validate;

use std::sync::Arc;

use bytes::Bytes;
use tracing::{info, warn};

use sehetak_core::config::DocumentsConfig;
use sehetak_core::error::AppError;
use sehetak_core::types::{CategoryId, DocumentId, UserId};
use sehetak_database::{CategoryCatalog, DocumentStore, UserDirectory};
use sehetak_entity::CreateDocument;

pub use rejection::UploadRejection;

/// An uploaded file as received from the client.
#[derive(Debug, Clone)]
pub struct UploadFile {
    /// Client-supplied file name.
    pub name: String,
    /// Client-declared MIME type.
    pub mime_type: String,
    /// File contents.
    pub data: Bytes,
}

/// Everything needed to create a document.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Owner of the new document.
    pub owner_id: UserId,
    /// Document type label.
    pub doc_type: String,
    /// Optional description.
    pub description: Option<String>,
    /// Optional category.
    pub category_id: Option<CategoryId>,
    /// The file, if one was sent.
    pub file: Option<UploadFile>,
}

/// Validates and stores new documents.
#[derive(Debug, Clone)]
pub struct UploadService {
    users: Arc<dyn UserDirectory>,
    categories: Arc<dyn CategoryCatalog>,
    documents: Arc<dyn DocumentStore>,
    config: DocumentsConfig,
}

impl UploadService {
    /// Creates a new upload service.
    pub fn new(
        users: Arc<dyn UserDirectory>,
        categories: Arc<dyn CategoryCatalog>,
        documents: Arc<dyn DocumentStore>,
        config: DocumentsConfig,
    ) -> Self {
        Self {
            users,
            categories,
            documents,
            config,
        }
    }

    /// Create a document and its version 1.
    ///
    /// Checks run in a fixed order and the first failure is returned as an
    /// [`UploadRejection`]. Nothing is written unless every check passes,
    /// and a store failure leaves neither row behind.
    pub async fn upload(&self, request: UploadRequest) -> Result<DocumentId, AppError> {
        let owner_id = request.owner_id;
        let outcome = self.store(request).await;
        if let Err(ref err) = outcome {
            match UploadRejection::of(err) {
                Some(rejection) => {
                    info!(owner_id = %owner_id, reason = %rejection, "Upload rejected")
                }
                None => warn!(owner_id = %owner_id, error = %err, "Upload failed"),
            }
        }
        outcome
    }

    async fn store(&self, request: UploadRequest) -> Result<DocumentId, AppError> {
        if self.users.find(request.owner_id).await?.is_none() {
            return Err(UploadRejection::UserNotFound(request.owner_id).into());
        }

        let Some(file) = request.file else {
            return Err(UploadRejection::MissingFile.into());
        };

        let doc_type = request.doc_type.trim();
        if doc_type.is_empty() {
            return Err(UploadRejection::MissingType.into());
        }

        validate::check_payload(&self.config, &file)?;

        if let Some(category_id) = request.category_id {
            if self.categories.find(category_id).await?.is_none() {
                return Err(UploadRejection::UnknownCategory(category_id).into());
            }
        }

        validate::check_file_name(&file)?;

        let size = file.data.len();
        let document_id = self
            .documents
            .create_with_initial_version(&CreateDocument {
                owner_id: request.owner_id,
                category_id: request.category_id,
                doc_type: doc_type.to_string(),
                description: request
                    .description
                    .map(|d| d.trim().to_string())
                    .filter(|d| !d.is_empty()),
                file_name: file.name,
                mime_type: file.mime_type,
                data: file.data,
            })
            .await?;

        info!(
            document_id = %document_id,
            owner_id = %request.owner_id,
            size,
            "Document uploaded"
        );
        Ok(document_id)
    }
}
