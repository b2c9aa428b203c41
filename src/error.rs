//! Engine-level error types.
//!
//! Every failure is scoped to a single report run: errors propagate to the
//! caller immediately, nothing is retried, and a failed run leaves no
//! persistent side effect (the audit row and `last_run_at` touch are only
//! written after a successful fetch).

use thiserror::Error;

use crate::store::StoreError;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors surfaced by report execution.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The report definition does not exist, or is owned by another tenant.
    #[error("report definition not found: {0}")]
    NotFound(String),

    /// The backing record store rejected or failed a query.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// A definition failed field/operator validation.
    #[error("invalid report definition: {0}")]
    Validation(String),
}

impl EngineError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
