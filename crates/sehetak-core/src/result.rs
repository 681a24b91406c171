//! Convenience result type alias for Sehetak.

use crate::error::AppError;

/// A specialized `Result` type for Sehetak operations.
pub type AppResult<T> = Result<T, AppError>;
