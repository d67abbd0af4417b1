//! Error types for reconciliation

use shared_types::WriteError;
use thiserror::Error;

/// Reconciliation errors.
///
/// Only a failed submit is an error. Timing out and cancellation are
/// outcomes, see [`crate::ReconcileOutcome`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    /// The write never landed; polling did not start.
    #[error("Submit failed: {0}")]
    Submit(#[from] WriteError),
}

impl ReconcileError {
    /// The underlying write failure.
    pub fn write_error(&self) -> &WriteError {
        match self {
            Self::Submit(err) => err,
        }
    }
}

/// Result type for reconciliation
pub type ReconcileResult<T> = Result<T, ReconcileError>;
