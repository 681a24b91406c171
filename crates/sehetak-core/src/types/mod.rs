//! Shared value types.

pub mod id;

pub use id::{CategoryId, DocumentId, GrantId, UserId, VersionId};
