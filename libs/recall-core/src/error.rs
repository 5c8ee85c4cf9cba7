//! Error types for recall-core.

use thiserror::Error;

/// Result type alias using CoreError.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised by the pure scheduling and analytics code.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("quality must be between 0 and 4, got {0}")]
    InvalidQuality(u8),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("malformed credential")]
    MalformedCredential,
}
