// ==========================================
// DUPA Estimator - API error type
// ==========================================
// Maps engine/repository errors to caller-facing categories.
// Every message names the offending field or key.
// ==========================================

use crate::engine::EngineError;
use crate::repository::RepositoryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // Request errors (permanent)
    // ==========================================
    #[error("invalid input (field={field}): {message}")]
    InvalidInput { field: String, message: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("rate unavailable: {0}")]
    RateUnavailable(String),

    #[error("computation failed: {0}")]
    ComputationError(String),

    // ==========================================
    // Transient errors (caller may retry)
    // ==========================================
    #[error("temporarily unavailable: {0}")]
    Unavailable(String),

    // ==========================================
    // Generic
    // ==========================================
    #[error("database error: {0}")]
    DatabaseError(String),

    #[error("internal error: {0}")]
    InternalError(String),
}

impl ApiError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::Unavailable(_))
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        if err.is_retryable() {
            return ApiError::Unavailable(err.to_string());
        }
        match err {
            EngineError::Validation { field, message } => ApiError::InvalidInput { field, message },
            EngineError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            EngineError::RateResolution { .. } => ApiError::RateUnavailable(err.to_string()),
            EngineError::Computation(msg) => ApiError::ComputationError(msg),
            EngineError::RateLookupTimeout { .. } => ApiError::Unavailable(err.to_string()),
            EngineError::Repository(repo) => ApiError::from(repo),
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        if err.is_retryable() {
            return ApiError::Unavailable(err.to_string());
        }
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{} (id={})", entity, id))
            }
            RepositoryError::FieldValueError { field, message } => {
                ApiError::InvalidInput { field, message }
            }
            RepositoryError::DatabaseQueryError(msg)
            | RepositoryError::UniqueConstraintViolation(msg) => ApiError::DatabaseError(msg),
            other => ApiError::InternalError(other.to_string()),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
