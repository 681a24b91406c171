//! Owner-managed sharing of documents with other users.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use sehetak_core::error::AppError;
use sehetak_core::types::{DocumentId, UserId};
use sehetak_database::{DocumentStore, SharingRegistry, UserDirectory};
use sehetak_entity::{Document, PermissionLevel, SharingGrant};

use crate::context::RequestContext;

/// Grant `user_id` access at `permission`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareRequest {
    /// The user receiving access.
    pub user_id: UserId,
    /// Level of access.
    pub permission: PermissionLevel,
}

/// Creates, revokes, and lists sharing grants.
#[derive(Debug, Clone)]
pub struct SharingService {
    users: Arc<dyn UserDirectory>,
    documents: Arc<dyn DocumentStore>,
    sharing: Arc<dyn SharingRegistry>,
}

impl SharingService {
    /// Creates a new sharing service.
    pub fn new(
        users: Arc<dyn UserDirectory>,
        documents: Arc<dyn DocumentStore>,
        sharing: Arc<dyn SharingRegistry>,
    ) -> Self {
        Self {
            users,
            documents,
            sharing,
        }
    }

    /// Only the owner manages a document's grants.
    async fn require_owner(
        &self,
        ctx: &RequestContext,
        document_id: DocumentId,
    ) -> Result<Document, AppError> {
        if self.users.find(ctx.user_id).await?.is_none() {
            return Err(AppError::not_found(format!(
                "User with ID {} not found",
                ctx.user_id
            )));
        }
        let document = self
            .documents
            .find(document_id)
            .await?
            .ok_or_else(|| AppError::not_found("Document not found"))?;
        if document.owner_id != ctx.user_id {
            return Err(AppError::access_denied(
                "Only the document owner can manage sharing",
            ));
        }
        Ok(document)
    }

    /// Share the document, or change the level of an existing grant.
    /// A revoked grant is reactivated rather than duplicated.
    pub async fn share(
        &self,
        ctx: &RequestContext,
        document_id: DocumentId,
        request: ShareRequest,
    ) -> Result<SharingGrant, AppError> {
        self.require_owner(ctx, document_id).await?;
        if request.user_id == ctx.user_id {
            return Err(AppError::validation(
                "A document cannot be shared with its owner",
            ));
        }
        if self.users.find(request.user_id).await?.is_none() {
            return Err(AppError::not_found(format!(
                "User with ID {} not found",
                request.user_id
            )));
        }

        let grant = self
            .sharing
            .upsert(document_id, request.user_id, request.permission, ctx.user_id)
            .await?;

        info!(
            document_id = %document_id,
            owner_id = %ctx.user_id,
            shared_with = %request.user_id,
            permission = %request.permission,
            "Document shared"
        );
        Ok(grant)
    }

    /// Revoke the target's grant.
    pub async fn revoke(
        &self,
        ctx: &RequestContext,
        document_id: DocumentId,
        target: UserId,
    ) -> Result<(), AppError> {
        self.require_owner(ctx, document_id).await?;
        if !self.sharing.deactivate(document_id, target).await? {
            return Err(AppError::not_found(format!(
                "No active grant for user {target} on document {document_id}"
            )));
        }
        info!(
            document_id = %document_id,
            owner_id = %ctx.user_id,
            shared_with = %target,
            "Document share revoked"
        );
        Ok(())
    }

    /// All grants on the document, revoked ones included.
    pub async fn list_grants(
        &self,
        ctx: &RequestContext,
        document_id: DocumentId,
    ) -> Result<Vec<SharingGrant>, AppError> {
        self.require_owner(ctx, document_id).await?;
        self.sharing.list_for_document(document_id).await
    }
}
