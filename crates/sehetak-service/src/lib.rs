//! # sehetak-service
//!
//! Business logic for the Sehetak document subsystem. Services hold
//! `Arc<dyn …>` store handles from `sehetak-database` and return
//! `AppResult`. The access rules in [`access`] are pure functions.

pub mod access;
pub mod category;
pub mod context;
pub mod document;
pub mod sharing;
pub mod upload;
pub mod user;

pub use category::CategoryService;
pub use context::RequestContext;
pub use document::{DocumentService, NewVersion};
pub use sharing::{ShareRequest, SharingService};
pub use upload::{UploadFile, UploadRejection, UploadRequest, UploadService};
pub use user::UserService;
