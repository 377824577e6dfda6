//! Convenience result type alias for Campus.

use crate::error::AppError;

/// A specialized `Result` type for Campus operations at the application boundary.
pub type AppResult<T> = Result<T, AppError>;
