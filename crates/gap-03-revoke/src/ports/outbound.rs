//! # Outbound Ports
//!
//! The two revoke strategies.

use async_trait::async_trait;
use gap_02_reconciliation::StepReporter;
use shared_types::{TxReceipt, WriteError};

use crate::domain::RevokeTarget;

/// Revoke transaction signed by the caller's wallet.
#[async_trait]
pub trait OnChainRevoker: Send + Sync {
    async fn revoke(
        &self,
        target: &RevokeTarget,
        steps: &StepReporter,
    ) -> Result<TxReceipt, WriteError>;
}

/// Authenticated backend call that marks the entity revoked without a
/// transaction.
#[async_trait]
pub trait OffChainRevoker: Send + Sync {
    async fn revoke(&self, target: &RevokeTarget) -> Result<(), WriteError>;
}
