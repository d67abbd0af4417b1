//! Error types for application review

use shared_types::{Address, ProgramId, ReadError, WriteError};
use thiserror::Error;

use crate::domain::{ApplicationStatus, ReviewAction};

/// Application review errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReviewError {
    /// Caller lacks program-level write permission
    #[error("Not authorized: {actor} cannot review applications of program {program}")]
    PermissionDenied { actor: Address, program: ProgramId },

    /// The permission service could not be reached
    #[error("Permission check failed: {0}")]
    PermissionCheck(ReadError),

    /// Action is not legal from the current status
    #[error("Invalid transition: cannot {action} from {from}")]
    InvalidTransition {
        from: ApplicationStatus,
        action: ReviewAction,
    },

    /// No legal action leads from the current status to the requested one
    #[error("Invalid target status: no action leads from {from} to {to}")]
    InvalidTarget {
        from: ApplicationStatus,
        to: ApplicationStatus,
    },

    /// Another status change for this application has not finished
    #[error("Status update already in flight for application {0}")]
    UpdateInFlight(String),

    /// The backend rejected the status change
    #[error("Status update failed: {0}")]
    Gateway(WriteError),

    /// Stored status string is not a known status
    #[error("Unknown application status: {0}")]
    UnknownStatus(String),
}

/// Result type for application review operations
pub type ReviewResult<T> = Result<T, ReviewError>;
