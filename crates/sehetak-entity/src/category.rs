//! Document category reference data.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use sehetak_core::types::CategoryId;

/// A document category, seeded by migration and never modified at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Category {
    /// Category identifier.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
}
