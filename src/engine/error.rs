// ==========================================
// DUPA Estimator - Engine error type
// ==========================================
// Nothing here is recovered with a default value; every failure
// propagates to the caller with the offending field or key.
// ==========================================

use crate::domain::types::RateKind;
use crate::repository::error::RepositoryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    /// Malformed template or request (negative quantity, percentages, ...)
    #[error("validation failed (field={field}): {message}")]
    Validation { field: String, message: String },

    /// Template or project missing (or template inactive for an active-only request)
    #[error("{entity} not found: id={id}")]
    NotFound { entity: String, id: String },

    /// No master rate for the requested key; permanent
    #[error("no {kind} rate for key={key} at location={location}")]
    RateResolution {
        kind: RateKind,
        key: String,
        location: String,
    },

    /// Arithmetic that cannot produce a meaningful value (e.g. zero capacity)
    #[error("computation failed: {0}")]
    Computation(String),

    /// Caller-level budget for the rate lookups was exceeded
    #[error("rate lookups exceeded budget of {budget_ms}ms")]
    RateLookupTimeout { budget_ms: u64 },

    /// Collaborator I/O failure
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl EngineError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        EngineError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Transient failure; retrying is the caller's or collaborator's decision
    pub fn is_retryable(&self) -> bool {
        match self {
            EngineError::RateLookupTimeout { .. } => true,
            EngineError::Repository(e) => e.is_retryable(),
            _ => false,
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
