//! # Runtime Errors
//!
//! One enum over every subsystem error, returned by the [`GapClient`] flows.
//!
//! [`GapClient`]: crate::GapClient

use gap_01_application_review::ReviewError;
use gap_02_reconciliation::ReconcileError;
use gap_03_revoke::RevokeError;
use gap_04_gasless::GaslessError;
use shared_types::{ReadError, WriteError};
use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by the runtime.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GapError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The caller may not perform the mutation. Nothing was written.
    #[error("Not authorized: {0}")]
    Unauthorized(String),

    /// No wallet is connected.
    #[error("No wallet connected")]
    NoSigner,

    /// The referenced entity is not part of the loaded aggregate.
    #[error("{kind} {reference} not found")]
    NotFound { kind: &'static str, reference: String },

    #[error(transparent)]
    Review(#[from] ReviewError),

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    #[error(transparent)]
    Revoke(#[from] RevokeError),

    #[error(transparent)]
    Gasless(#[from] GaslessError),

    #[error(transparent)]
    Write(#[from] WriteError),

    #[error(transparent)]
    Read(#[from] ReadError),
}

impl GapError {
    pub(crate) fn not_found(kind: &'static str, reference: impl ToString) -> Self {
        Self::NotFound {
            kind,
            reference: reference.to_string(),
        }
    }

    /// Underlying write failure, if the mutation itself failed.
    pub fn write_error(&self) -> Option<&WriteError> {
        match self {
            Self::Write(err) => Some(err),
            Self::Reconcile(err) => Some(err.write_error()),
            Self::Revoke(err) => Some(err.root_cause()),
            Self::Review(ReviewError::Gateway(err)) => Some(err),
            _ => None,
        }
    }

    /// Whether the user declined in their wallet.
    pub fn is_user_rejection(&self) -> bool {
        self.write_error()
            .is_some_and(WriteError::is_user_rejection)
    }
}

/// Result type for runtime operations.
pub type GapResult<T> = Result<T, GapError>;
