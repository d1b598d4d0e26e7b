use thiserror::Error;

use crate::repository::errors::RepositoryError;

/// Result type returned by service-layer operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced by the service layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The addressed resource does not exist.
    #[error("not found")]
    NotFound,
    /// A form or payload failed validation; the message names the field.
    #[error("{0}")]
    Form(String),
    /// Persisting uploaded files failed.
    #[error("failed to store uploaded images: {0}")]
    Storage(#[from] std::io::Error),
    /// Any other repository failure.
    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            other => ServiceError::Repository(other),
        }
    }
}
