//! Error context enhancement utilities
//!
//! Extension methods for attaching an operation or an option key to errors
//! raised by third-party crates.

use std::path::PathBuf;
use super::types::AppError;

/// Extension trait for adding context to error types
///
/// Similar to anyhow's context functionality but producing [`AppError`].
pub trait ErrorContextExt<T> {
    /// Attribute the error to an option store key
    fn for_option(self, key: &str, operation: &str) -> Result<T, AppError>;

    /// Attribute the error to a file operation
    fn in_file_operation(
        self,
        path: impl Into<PathBuf>,
        operation: impl Into<String>
    ) -> Result<T, AppError>;
}

impl<T, E> ErrorContextExt<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn for_option(self, key: &str, operation: &str) -> Result<T, AppError> {
        self.map_err(|e| AppError::store_with_source(key, operation, e))
    }

    fn in_file_operation(
        self,
        path: impl Into<PathBuf>,
        operation: impl Into<String>
    ) -> Result<T, AppError> {
        let path = path.into();
        let operation = operation.into();
        self.map_err(|e| AppError::io_with_source(path, operation, e))
    }
}
