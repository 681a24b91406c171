//! `Requester` extractor: identifies who is making the request.
//!
//! The identity is a plain user id taken from the `X-User-Id` header or,
//! failing that, the `userId` query parameter. Services verify the id
//! against the user directory.

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::Deserialize;

use sehetak_core::error::AppError;
use sehetak_core::types::UserId;
use sehetak_service::RequestContext;

use crate::error::ApiError;

/// Header naming the requesting user.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The requesting user's context.
#[derive(Debug, Clone)]
pub struct Requester(pub RequestContext);

impl std::ops::Deref for Requester {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(Debug, Deserialize)]
struct RequesterQuery {
    #[serde(rename = "userId")]
    user_id: Option<String>,
}

/// Parse a raw user id.
pub fn parse_user_id(raw: &str) -> Result<UserId, AppError> {
    let id: UserId = raw
        .parse()
        .map_err(|_| AppError::validation(format!("Invalid user ID '{}'", raw.trim())))?;
    if id.get() <= 0 {
        return Err(AppError::validation(format!("Invalid user ID '{id}'")));
    }
    Ok(id)
}

fn raw_user_id(parts: &Parts) -> Result<Option<String>, AppError> {
    if let Some(value) = parts.headers.get(USER_ID_HEADER) {
        let value = value
            .to_str()
            .map_err(|_| AppError::validation("Invalid X-User-Id header"))?;
        return Ok(Some(value.to_string()));
    }
    let query = Query::<RequesterQuery>::try_from_uri(&parts.uri)
        .map_err(|e| AppError::validation(format!("Invalid query string: {e}")))?;
    Ok(query.0.user_id)
}

impl<S> FromRequestParts<S> for Requester
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = raw_user_id(parts)?
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| AppError::validation("User ID is required"))?;
        let user_id = parse_user_id(&raw)?;
        Ok(Self(RequestContext::new(user_id)))
    }
}
