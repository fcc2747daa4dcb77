//! Crate error types.
//!
//! The classification pipeline itself is total and never fails; the only
//! fallible surface is the [`io`](crate::io) module.

use thiserror::Error;

/// Errors produced by stratify operations.
#[derive(Error, Debug)]
pub enum StratifyError {
    /// JSON serialization or deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An underlying file operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for stratify operations.
pub type Result<T> = std::result::Result<T, StratifyError>;
