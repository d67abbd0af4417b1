//! Revoke Service - single entry point that tries both strategies.

use async_trait::async_trait;
use gap_02_reconciliation::{StepReporter, WriteAction};
use parking_lot::Mutex;
use shared_types::{TxReceipt, WriteError};
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::{select_path, RevokeAuthority, RevokePath, RevokeReport, RevokeTarget};
use crate::error::{RevokeError, RevokeResult};
use crate::ports::{OffChainRevoker, OnChainRevoker};

/// Revokes through the cheapest authorized path, falling back off-chain.
pub struct RevokeService {
    on_chain: Arc<dyn OnChainRevoker>,
    off_chain: Arc<dyn OffChainRevoker>,
}

impl RevokeService {
    pub fn new(on_chain: Arc<dyn OnChainRevoker>, off_chain: Arc<dyn OffChainRevoker>) -> Self {
        Self {
            on_chain,
            off_chain,
        }
    }

    /// Revoke `target`.
    ///
    /// If both paths fail the on-chain error is returned; the off-chain
    /// error is only logged.
    pub async fn revoke(
        &self,
        target: &RevokeTarget,
        authority: &RevokeAuthority,
        steps: &StepReporter,
    ) -> RevokeResult<RevokeReport> {
        match select_path(target, authority) {
            RevokePath::OffChain => {
                info!("[gap-03] Revoking {} {} off-chain", target.kind, target.uid);
                self.off_chain
                    .revoke(target)
                    .await
                    .map_err(RevokeError::OffChain)?;
                Ok(RevokeReport {
                    via: RevokePath::OffChain,
                    receipt: TxReceipt::off_chain(),
                    fallback_from: None,
                })
            }
            RevokePath::OnChain => {
                info!("[gap-03] Revoking {} {} on-chain", target.kind, target.uid);
                match self.on_chain.revoke(target, steps).await {
                    Ok(receipt) => Ok(RevokeReport {
                        via: RevokePath::OnChain,
                        receipt,
                        fallback_from: None,
                    }),
                    Err(on_chain_err) => self.fall_back(target, steps, on_chain_err).await,
                }
            }
        }
    }

    async fn fall_back(
        &self,
        target: &RevokeTarget,
        steps: &StepReporter,
        on_chain_err: WriteError,
    ) -> RevokeResult<RevokeReport> {
        warn!(
            "[gap-03] On-chain revoke of {} failed ({}), falling back off-chain",
            target.uid, on_chain_err
        );
        steps.reset().await;

        match self.off_chain.revoke(target).await {
            Ok(()) => Ok(RevokeReport {
                via: RevokePath::OffChain,
                receipt: TxReceipt::off_chain(),
                fallback_from: Some(on_chain_err),
            }),
            Err(off_chain_err) => {
                warn!(
                    "[gap-03] Off-chain fallback for {} failed too: {}",
                    target.uid, off_chain_err
                );
                Err(RevokeError::OnChain(on_chain_err))
            }
        }
    }
}

/// A revoke as the submit step of a reconciliation.
///
/// The typed outcome of the last submit is kept for the caller.
pub struct RevokeAction {
    service: Arc<RevokeService>,
    target: RevokeTarget,
    authority: RevokeAuthority,
    last: Mutex<Option<RevokeResult<RevokeReport>>>,
}

impl RevokeAction {
    pub fn new(service: Arc<RevokeService>, target: RevokeTarget, authority: RevokeAuthority) -> Self {
        Self {
            service,
            target,
            authority,
            last: Mutex::new(None),
        }
    }

    pub fn target(&self) -> &RevokeTarget {
        &self.target
    }

    /// Typed result of the most recent submit, if any.
    pub fn last_result(&self) -> Option<RevokeResult<RevokeReport>> {
        self.last.lock().clone()
    }
}

#[async_trait]
impl WriteAction for RevokeAction {
    async fn submit(&self, steps: &StepReporter) -> Result<TxReceipt, WriteError> {
        let result = self.service.revoke(&self.target, &self.authority, steps).await;
        *self.last.lock() = Some(result.clone());
        result.map(|report| report.receipt).map_err(WriteError::from)
    }
}
