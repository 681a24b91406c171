//! Permission level and access level enumerations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Permission conferred by a sharing grant.
///
/// Totally ordered: `View < Edit < Delete`. Each level implies the ones
/// below it. The derived `Ord` follows declaration order and matches the
/// ordering of the `permission_level` PostgreSQL enum.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "permission_level", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PermissionLevel {
    /// Read the document and its versions.
    View,
    /// Also append new versions.
    Edit,
    /// Also delete the document.
    Delete,
}

impl PermissionLevel {
    /// Return the level as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Edit => "edit",
            Self::Delete => "delete",
        }
    }

    /// Check if this level grants at least the given level.
    pub fn has_at_least(&self, required: PermissionLevel) -> bool {
        *self >= required
    }
}

impl fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PermissionLevel {
    type Err = sehetak_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "view" => Ok(Self::View),
            "edit" => Ok(Self::Edit),
            "delete" => Ok(Self::Delete),
            _ => Err(sehetak_core::AppError::validation(format!(
                "Invalid permission level: '{s}'"
            ))),
        }
    }
}

/// How a user reaches a document in a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    /// The user owns the document.
    Owner,
    /// The user holds an active grant at this level.
    #[serde(untagged)]
    Shared(PermissionLevel),
}

impl AccessLevel {
    /// Whether this access level is at least the given permission.
    pub fn allows(&self, required: PermissionLevel) -> bool {
        match self {
            Self::Owner => true,
            Self::Shared(level) => level.has_at_least(required),
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Owner => f.write_str("owner"),
            Self::Shared(level) => level.fmt(f),
        }
    }
}
