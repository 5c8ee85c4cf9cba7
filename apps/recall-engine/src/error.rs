//! Error values handed to the front-end.

use recall_core::CoreError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::DbError;

/// Engine error types
#[derive(Debug, Error)]
pub enum StudyError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Deliberately silent about whether the username or the password was wrong.
    #[error("Invalid username or password")]
    AuthFailure,

    #[error("Store error: {0}")]
    Store(DbError),
}

/// Semantic error kind, stable across releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    Conflict,
    AuthFailure,
    StoreFailure,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidArgument => "invalid_argument",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::AuthFailure => "auth_failure",
            Self::StoreFailure => "store_failure",
        }
    }
}

/// Error body for the front-end
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

impl StudyError {
    pub fn not_found(entity: &str, id: i64) -> Self {
        Self::NotFound(format!("{entity} {id}"))
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::AuthFailure => ErrorKind::AuthFailure,
            Self::Store(_) => ErrorKind::StoreFailure,
        }
    }

    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            error: self.kind().as_str().to_string(),
            message: self.to_string(),
        }
    }
}

impl From<DbError> for StudyError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound { entity, id } => Self::not_found(entity, id),
            DbError::MissingParent(detail) => Self::NotFound(detail),
            DbError::Conflict(detail) => Self::Conflict(detail),
            DbError::InvalidData(detail) => Self::InvalidArgument(detail),
            other => Self::Store(other),
        }
    }
}

impl From<CoreError> for StudyError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::InvalidQuality(_) | CoreError::InvalidArgument(_) => {
                Self::InvalidArgument(e.to_string())
            }
            CoreError::MalformedCredential => Self::AuthFailure,
        }
    }
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, StudyError>;
