//! Convenience result type alias for KeyGate.

use crate::error::AppError;

/// A specialized `Result` type for KeyGate operations.
pub type AppResult<T> = Result<T, AppError>;
