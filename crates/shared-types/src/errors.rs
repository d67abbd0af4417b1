//! # Error Types
//!
//! Failure taxonomy shared across crates.
//!
//! | Class | Type | Policy |
//! |-------|------|--------|
//! | Authorization | `WriteError::Unauthorized` | inline message, no retry |
//! | Wallet / chain | `WriteError::{UserRejected, WrongChain, Transaction}` | toast, abort, reset stepper |
//! | Transient read | `ReadError::*` during polling | swallowed, retried until the attempt cap |
//! | Backend | `WriteError::Api`, `WriteError::Network` | toast, reported |

use thiserror::Error;

use crate::entities::ChainId;

/// Failure of a write (attestation, revocation, backend mutation).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WriteError {
    /// The wallet owner declined the signature request.
    #[error("User rejected the request")]
    UserRejected,

    /// The wallet is connected to a different chain than the write targets.
    #[error("Wrong network: expected chain {expected}, wallet on {actual}")]
    WrongChain { expected: ChainId, actual: ChainId },

    /// The caller is not allowed to perform this write.
    #[error("Not authorized: {0}")]
    Unauthorized(String),

    /// The transaction was built but failed (revert, nonce, gas).
    #[error("Transaction failed: {0}")]
    Transaction(String),

    /// Transport failure talking to a wallet RPC or backend.
    #[error("Network error: {0}")]
    Network(String),

    /// A backend answered with a non-success status.
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },
}

impl WriteError {
    /// Whether the failure came from the user declining, which callers
    /// typically report without an error-tracker entry.
    pub fn is_user_rejection(&self) -> bool {
        matches!(self, WriteError::UserRejected)
    }
}

/// Failure of a read against the indexer or backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },
}

/// Failure parsing an identifier from its string form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseIdError {
    #[error("Invalid {kind} length: expected {expected} bytes, got {actual}")]
    InvalidLength {
        kind: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid {kind} hex: {value}")]
    InvalidHex { kind: &'static str, value: String },

    #[error("Invalid chain id: {0}")]
    InvalidChainId(String),

    #[error("Invalid program reference: {0}")]
    InvalidProgramRef(String),
}
