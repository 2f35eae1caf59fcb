//! Common Result Type

use super::error::AppError;

/// Application result type
///
/// Uses AppError for consistent error handling across the workspace.
pub type AppResult<T> = Result<T, AppError>;
