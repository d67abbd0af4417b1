//! # Outbound Ports
//!
//! The permissions service and the funding-platform status API.

use async_trait::async_trait;
use shared_types::{Address, ChainId, ProgramId, ReadError, WriteError};

use crate::domain::ApplicationStatus;

/// Program-level write permission lookup.
#[async_trait]
pub trait PermissionChecker: Send + Sync {
    /// Whether `actor` may review applications of `program` on `chain`.
    async fn can_write_program(
        &self,
        program: &ProgramId,
        chain: ChainId,
        actor: &Address,
    ) -> Result<bool, ReadError>;
}

/// Backend endpoint that persists a status change.
#[async_trait]
pub trait ApplicationStatusGateway: Send + Sync {
    async fn update_status(
        &self,
        reference: &str,
        status: ApplicationStatus,
        note: Option<&str>,
    ) -> Result<(), WriteError>;
}
