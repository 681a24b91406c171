//! Sharing grants and permission levels.

pub mod grant;
pub mod permission;

pub use grant::SharingGrant;
pub use permission::{AccessLevel, PermissionLevel};
