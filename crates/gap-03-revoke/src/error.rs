//! Error types for revocation

use shared_types::WriteError;
use thiserror::Error;

/// Revocation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RevokeError {
    /// On-chain revoke failed and so did the fallback. Carries the
    /// on-chain error.
    #[error("On-chain revoke failed: {0}")]
    OnChain(WriteError),

    /// Off-chain revoke failed with no on-chain attempt.
    #[error("Off-chain revoke failed: {0}")]
    OffChain(WriteError),
}

impl RevokeError {
    /// The error surfaced to the caller's error handler.
    pub fn root_cause(&self) -> &WriteError {
        match self {
            Self::OnChain(err) | Self::OffChain(err) => err,
        }
    }
}

impl From<RevokeError> for WriteError {
    fn from(err: RevokeError) -> Self {
        match err {
            RevokeError::OnChain(err) | RevokeError::OffChain(err) => err,
        }
    }
}

/// Result type for revocation
pub type RevokeResult<T> = Result<T, RevokeError>;
