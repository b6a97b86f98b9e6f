//! Convenience result type alias for Handsoft.

use crate::error::AppError;

/// A specialized `Result` type for Handsoft operations.
pub type AppResult<T> = Result<T, AppError>;
