//! Ingest and query use-case services.
//!
//! # Responsibility
//! - Orchestrate validation, entry construction and store calls.
//! - Classify every failure into the caller-visible error taxonomy.
//!
//! # Invariants
//! - Services receive their store at construction and keep no other state.
//! - No failure is retried here.

pub mod ingest_service;
pub mod query_service;

use crate::model::input::ValidationError;
use crate::store::StoreError;

/// Generic body message for rejected input.
pub const INVALID_INPUT_MESSAGE: &str = "Invalid input";
/// Generic body message for every internal failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failure taxonomy shared by both services.
///
/// `Display` output is operator detail and must never reach callers; use
/// `public_message` at the boundary.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),
    #[error("store failure: {0}")]
    Store(#[from] StoreError),
    #[error("unexpected failure: {0}")]
    Unexpected(String),
}

impl ServiceError {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Store(_) | Self::Unexpected(_) => 500,
        }
    }

    pub fn public_message(&self) -> &'static str {
        match self {
            Self::Validation(_) => INVALID_INPUT_MESSAGE,
            Self::Store(_) | Self::Unexpected(_) => INTERNAL_ERROR_MESSAGE,
        }
    }

    /// Stable short label for log events.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_failed",
            Self::Store(_) => "store_failed",
            Self::Unexpected(_) => "unexpected",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ServiceError, INTERNAL_ERROR_MESSAGE, INVALID_INPUT_MESSAGE};
    use crate::model::input::ValidationError;
    use crate::store::StoreError;

    #[test]
    fn taxonomy_maps_to_two_public_outcomes() {
        let validation = ServiceError::from(ValidationError::InvalidSeverity);
        assert_eq!(validation.status_code(), 400);
        assert_eq!(validation.public_message(), INVALID_INPUT_MESSAGE);

        let store = ServiceError::from(StoreError::Unavailable("table missing".to_string()));
        assert_eq!(store.status_code(), 500);
        assert_eq!(store.public_message(), INTERNAL_ERROR_MESSAGE);
        assert!(!store.public_message().contains("table missing"));

        let unexpected = ServiceError::Unexpected("boom".to_string());
        assert_eq!(unexpected.status_code(), 500);
        assert_eq!(unexpected.public_message(), INTERNAL_ERROR_MESSAGE);
    }
}
