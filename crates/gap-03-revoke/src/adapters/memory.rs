//! Scripted revokers.

use async_trait::async_trait;
use gap_02_reconciliation::StepReporter;
use parking_lot::Mutex;
use shared_types::{AttestationUid, StepStatus, TxReceipt, WriteError};

use crate::domain::RevokeTarget;
use crate::ports::{OffChainRevoker, OnChainRevoker};

/// On-chain revoker returning a fixed result.
pub struct MockOnChainRevoker {
    result: Result<TxReceipt, WriteError>,
    revoked: Mutex<Vec<AttestationUid>>,
    calls: Mutex<usize>,
}

impl MockOnChainRevoker {
    pub fn succeeding(receipt: TxReceipt) -> Self {
        Self {
            result: Ok(receipt),
            revoked: Mutex::new(Vec::new()),
            calls: Mutex::new(0),
        }
    }

    pub fn failing(error: WriteError) -> Self {
        Self {
            result: Err(error),
            revoked: Mutex::new(Vec::new()),
            calls: Mutex::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock()
    }

    pub fn revoked(&self) -> Vec<AttestationUid> {
        self.revoked.lock().clone()
    }
}

#[async_trait]
impl OnChainRevoker for MockOnChainRevoker {
    async fn revoke(
        &self,
        target: &RevokeTarget,
        steps: &StepReporter,
    ) -> Result<TxReceipt, WriteError> {
        *self.calls.lock() += 1;
        steps.set(StepStatus::Pending).await;
        if self.result.is_ok() {
            self.revoked.lock().push(target.uid);
        }
        self.result.clone()
    }
}

/// Off-chain revoker returning a fixed result.
pub struct MockOffChainRevoker {
    result: Result<(), WriteError>,
    attempted: Mutex<Vec<AttestationUid>>,
}

impl MockOffChainRevoker {
    pub fn succeeding() -> Self {
        Self {
            result: Ok(()),
            attempted: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: WriteError) -> Self {
        Self {
            result: Err(error),
            attempted: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.attempted.lock().len()
    }

    pub fn attempted(&self) -> Vec<AttestationUid> {
        self.attempted.lock().clone()
    }
}

#[async_trait]
impl OffChainRevoker for MockOffChainRevoker {
    async fn revoke(&self, target: &RevokeTarget) -> Result<(), WriteError> {
        self.attempted.lock().push(target.uid);
        self.result.clone()
    }
}
