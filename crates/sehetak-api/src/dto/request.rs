//! JSON request bodies.

use serde::Deserialize;
use validator::Validate;

use sehetak_core::error::AppError;
use sehetak_core::types::UserId;
use sehetak_entity::PermissionLevel;
use sehetak_service::ShareRequest;

/// Body of `POST /api/documents/{document_id}/shares`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ShareGrantRequest {
    /// User receiving access.
    #[serde(alias = "userId")]
    #[validate(range(min = 1, message = "user_id must be a positive integer"))]
    pub user_id: i64,
    /// `view`, `edit`, or `delete`.
    #[validate(length(min = 1, message = "permission is required"))]
    pub permission: String,
}

impl ShareGrantRequest {
    /// Validate and convert into the service request.
    pub fn into_share_request(self) -> Result<ShareRequest, AppError> {
        self.validate()
            .map_err(|e| AppError::validation(format!("Invalid share request: {e}")))?;
        let permission: PermissionLevel = self.permission.parse()?;
        Ok(ShareRequest {
            user_id: UserId(self.user_id),
            permission,
        })
    }
}
