//! # sehetak-entity
//!
//! Domain entity models for Sehetak. Every struct that maps to a
//! database table derives `sqlx::FromRow`; enums map to PostgreSQL enum
//! types.

pub mod category;
pub mod document;
pub mod sharing;
pub mod user;

pub use category::Category;
pub use document::{
    CreateDocument, CreateVersion, Document, DocumentPayload, DocumentSummary, DocumentVersion,
    VersionSummary, VisibleDocument,
};
pub use sharing::{AccessLevel, PermissionLevel, SharingGrant};
pub use user::{CreateUser, User, UserRole};
