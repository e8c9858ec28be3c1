use diesel::r2d2::PoolError;
use thiserror::Error;

use crate::domain::types::TypeConstraintError;

/// Failures raised by the persistence layer.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),
    #[error("connection pool error: {0}")]
    Pool(#[from] PoolError),
    /// A stored row could not be converted into a domain value.
    #[error("validation error: {0}")]
    ValidationError(String),
}

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(val.to_string())
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
