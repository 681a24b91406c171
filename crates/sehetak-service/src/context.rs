//! Request context carrying the requester's identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sehetak_core::types::UserId;

/// Context for the current request.
///
/// The requester id is taken from the request as given and checked
/// against the user directory by each service operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The user on whose behalf the request runs.
    pub user_id: UserId,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            request_time: Utc::now(),
        }
    }
}
