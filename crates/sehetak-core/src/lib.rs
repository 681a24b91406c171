//! # sehetak-core
//!
//! Core crate for the Sehetak medical document service. Contains the
//! configuration schema and loader, typed identifiers, and the unified
//! error system.
//!
//! This crate has **no** internal dependencies on other Sehetak crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
