//! Domain errors for the rolodex service.

use thiserror::Error;
use uuid::Uuid;

use crate::domain::ports::{CacheError, RepositoryError};

/// Service-level errors surfaced to callers.
///
/// Cache failures never reach callers from the customer operations:
/// the service degrades to store-only behavior and logs them. The
/// `Cache` variant exists for the `From` conversion and for adapters
/// that report cache problems directly.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Customer not found: {0}")]
    NotFound(Uuid),

    #[error("Customer already exists with email {email}")]
    Conflict { email: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::UniqueViolation(email) => Self::Conflict { email },
            RepositoryError::QueryFailed(e) => Self::Database(e.to_string()),
            RepositoryError::Decode(msg) => Self::Database(msg),
            RepositoryError::EmptyPatch => {
                Self::Validation("update requires at least one field".to_string())
            }
        }
    }
}

impl From<CacheError> for ServiceError {
    fn from(err: CacheError) -> Self {
        Self::Cache(err.to_string())
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
