//! Document listing, download, deletion, and version history.

use std::sync::Arc;

use tracing::info;

use sehetak_core::config::DocumentsConfig;
use sehetak_core::error::AppError;
use sehetak_core::types::{DocumentId, UserId};
use sehetak_database::{DocumentStore, SharingRegistry, UserDirectory};
use sehetak_entity::{
    CreateVersion, Document, DocumentPayload, DocumentSummary, SharingGrant, User,
    VersionSummary,
};

use crate::access;
use crate::context::RequestContext;
use crate::upload::{validate, UploadFile, UploadRejection};

/// A new version submitted for an existing document.
#[derive(Debug, Clone)]
pub struct NewVersion {
    /// The file, if one was sent.
    pub file: Option<UploadFile>,
    /// Optional note describing the change.
    pub change_description: Option<String>,
}

/// Read and mutate stored documents on behalf of a requester.
#[derive(Debug, Clone)]
pub struct DocumentService {
    users: Arc<dyn UserDirectory>,
    documents: Arc<dyn DocumentStore>,
    sharing: Arc<dyn SharingRegistry>,
    config: DocumentsConfig,
}

impl DocumentService {
    /// Creates a new document service.
    pub fn new(
        users: Arc<dyn UserDirectory>,
        documents: Arc<dyn DocumentStore>,
        sharing: Arc<dyn SharingRegistry>,
        config: DocumentsConfig,
    ) -> Self {
        Self {
            users,
            documents,
            sharing,
            config,
        }
    }

    async fn require_user(&self, user_id: UserId) -> Result<User, AppError> {
        self.users
            .find(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User with ID {user_id} not found")))
    }

    /// Load a document and the requester's grants on it.
    async fn load_for(
        &self,
        ctx: &RequestContext,
        document_id: DocumentId,
    ) -> Result<(Document, Vec<SharingGrant>), AppError> {
        self.require_user(ctx.user_id).await?;
        let document = self
            .documents
            .find(document_id)
            .await?
            .ok_or_else(|| AppError::not_found("Document not found"))?;
        let grants = if document.owner_id == ctx.user_id {
            Vec::new()
        } else {
            self.sharing.grants_for(document_id, ctx.user_id).await?
        };
        Ok((document, grants))
    }

    /// Documents the user owns or holds an active grant on, newest first,
    /// each annotated with how the user reaches it.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<DocumentSummary>, AppError> {
        self.require_user(user_id).await?;
        let rows = self.documents.list_visible_to(user_id).await?;
        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let level = access::listing_access(row.owner_id, user_id, row.best_grant)?;
                Some(row.into_summary(level))
            })
            .collect())
    }

    /// Version history, highest version number first. An unknown document
    /// has an empty history.
    pub async fn list_versions(
        &self,
        document_id: DocumentId,
    ) -> Result<Vec<VersionSummary>, AppError> {
        self.documents.list_versions(document_id).await
    }

    /// The current payload, if the requester may view the document.
    pub async fn download(
        &self,
        ctx: &RequestContext,
        document_id: DocumentId,
    ) -> Result<DocumentPayload, AppError> {
        let (document, grants) = self.load_for(ctx, document_id).await?;
        if !access::can_view(document.owner_id, ctx.user_id, &grants) {
            return Err(AppError::access_denied("Access denied"));
        }
        Ok(document.payload())
    }

    /// A specific version's payload, if the requester may view the document.
    pub async fn download_version(
        &self,
        ctx: &RequestContext,
        document_id: DocumentId,
        version_number: i32,
    ) -> Result<DocumentPayload, AppError> {
        let (document, grants) = self.load_for(ctx, document_id).await?;
        if !access::can_view(document.owner_id, ctx.user_id, &grants) {
            return Err(AppError::access_denied("Access denied"));
        }
        let version = self
            .documents
            .find_version(document_id, version_number)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Version {version_number} of document {document_id} not found"))
            })?;
        Ok(version.payload())
    }

    /// Remove the document with its versions and grants.
    pub async fn delete(
        &self,
        ctx: &RequestContext,
        document_id: DocumentId,
    ) -> Result<(), AppError> {
        let (document, grants) = self.load_for(ctx, document_id).await?;
        if !access::can_delete(document.owner_id, ctx.user_id, &grants) {
            return Err(AppError::access_denied("Access denied"));
        }
        if !self.documents.delete(document_id).await? {
            return Err(AppError::not_found("Document not found"));
        }
        info!(
            document_id = %document_id,
            requester_id = %ctx.user_id,
            owner_id = %document.owner_id,
            "Document deleted"
        );
        Ok(())
    }

    /// Append a version and make it the current payload.
    pub async fn add_version(
        &self,
        ctx: &RequestContext,
        document_id: DocumentId,
        new_version: NewVersion,
    ) -> Result<VersionSummary, AppError> {
        let (document, grants) = self.load_for(ctx, document_id).await?;
        if !access::can_edit(document.owner_id, ctx.user_id, &grants) {
            return Err(AppError::access_denied("Access denied"));
        }

        let Some(file) = new_version.file else {
            return Err(UploadRejection::MissingFile.into());
        };
        validate::check_payload(&self.config, &file)?;
        validate::check_file_name(&file)?;

        let summary = self
            .documents
            .append_version(&CreateVersion {
                document_id,
                uploaded_by: ctx.user_id,
                file_name: file.name,
                mime_type: file.mime_type,
                data: file.data,
                change_description: new_version
                    .change_description
                    .map(|d| d.trim().to_string())
                    .filter(|d| !d.is_empty()),
            })
            .await?;

        info!(
            document_id = %document_id,
            version = summary.version_number,
            uploaded_by = %ctx.user_id,
            size = summary.file_size,
            "Document version added"
        );
        Ok(summary)
    }
}
