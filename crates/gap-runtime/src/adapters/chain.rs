//! On-chain revocation through the attestation SDK.

use async_trait::async_trait;
use gap_02_reconciliation::StepReporter;
use gap_03_revoke::{OnChainRevoker, RevokeTarget};
use shared_types::{TxReceipt, WriteError};
use std::sync::Arc;

use crate::ports::{ensure_chain, AttestationWriter, WalletSession};

/// [`OnChainRevoker`] backed by an [`AttestationWriter`].
///
/// The wallet is moved to the target's chain first, so a refused switch is
/// an on-chain failure like any other and triggers the off-chain fallback.
pub struct AttestationRevoker {
    writer: Arc<dyn AttestationWriter>,
    wallet: Arc<dyn WalletSession>,
}

impl AttestationRevoker {
    pub fn new(writer: Arc<dyn AttestationWriter>, wallet: Arc<dyn WalletSession>) -> Self {
        Self { writer, wallet }
    }
}

#[async_trait]
impl OnChainRevoker for AttestationRevoker {
    async fn revoke(
        &self,
        target: &RevokeTarget,
        steps: &StepReporter,
    ) -> Result<TxReceipt, WriteError> {
        ensure_chain(self.wallet.as_ref(), target.chain_id).await?;
        self.writer
            .revoke(target.chain_id, &[target.uid], steps)
            .await
    }
}
