//! Document, version, and listing models.

pub mod model;
pub mod summary;
pub mod version;

pub use model::{CreateDocument, Document, DocumentPayload};
pub use summary::{DocumentSummary, VisibleDocument};
pub use version::{CreateVersion, DocumentVersion, VersionSummary};
