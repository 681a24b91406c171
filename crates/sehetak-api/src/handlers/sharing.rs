//! Sharing handlers. Only the document owner may call these.

use axum::Json;
use axum::extract::State;

use sehetak_core::types::{DocumentId, UserId};
use sehetak_entity::SharingGrant;

use crate::dto::request::ShareGrantRequest;
use crate::dto::response::MessageResponse;
use crate::error::ApiError;
use crate::extractors::{ApiPath, Requester};
use crate::state::AppState;

/// GET /api/documents/{document_id}/shares
pub async fn list_grants(
    State(state): State<AppState>,
    requester: Requester,
    ApiPath(document_id): ApiPath<DocumentId>,
) -> Result<Json<Vec<SharingGrant>>, ApiError> {
    let grants = state
        .sharing_service
        .list_grants(&requester, document_id)
        .await?;
    Ok(Json(grants))
}

/// POST /api/documents/{document_id}/shares
pub async fn share(
    State(state): State<AppState>,
    requester: Requester,
    ApiPath(document_id): ApiPath<DocumentId>,
    Json(body): Json<ShareGrantRequest>,
) -> Result<Json<SharingGrant>, ApiError> {
    let request = body.into_share_request()?;
    let grant = state
        .sharing_service
        .share(&requester, document_id, request)
        .await?;
    Ok(Json(grant))
}

/// DELETE /api/documents/{document_id}/shares/{user_id}
pub async fn revoke(
    State(state): State<AppState>,
    requester: Requester,
    ApiPath((document_id, user_id)): ApiPath<(DocumentId, UserId)>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .sharing_service
        .revoke(&requester, document_id, user_id)
        .await?;
    Ok(Json(MessageResponse::new("Access revoked")))
}
