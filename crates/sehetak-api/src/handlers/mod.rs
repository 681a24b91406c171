//! HTTP request handlers, one module per resource.

pub mod category;
pub mod document;
pub mod health;
pub mod multipart;
pub mod sharing;
pub mod version;
