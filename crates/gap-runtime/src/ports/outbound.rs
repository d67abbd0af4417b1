//! # Outbound Ports
//!
//! | Port | Stands in for |
//! |------|---------------|
//! | [`WalletSession`] | connected wallet: current chain, chain switch prompt, signer |
//! | [`AttestationWriter`] | attestation SDK `attest` / `multiRevoke` |
//! | [`IndexerReader`] | read indexer HTTP API |

use async_trait::async_trait;
use gap_01_application_review::FundingApplication;
use gap_02_reconciliation::StepReporter;
use shared_types::{
    Address, AttestationUid, ChainId, EntityKind, ReadError, TxReceipt, WriteError,
};
use tracing::{info, warn};

use crate::model::Project;

/// The user's connected wallet.
#[async_trait]
pub trait WalletSession: Send + Sync {
    async fn chain_id(&self) -> Result<ChainId, WriteError>;

    /// Ask the wallet to move to `chain`. The user may decline.
    async fn switch_chain(&self, chain: ChainId) -> Result<(), WriteError>;

    /// Connected account, `None` when disconnected.
    fn signer_address(&self) -> Option<Address>;
}

/// Make sure `wallet` is on `target`, prompting a switch if needed.
///
/// A declined prompt stays `UserRejected`; any other switch failure, or a
/// wallet that reports a different chain afterwards, is `WrongChain`.
pub async fn ensure_chain(wallet: &dyn WalletSession, target: ChainId) -> Result<(), WriteError> {
    let current = wallet.chain_id().await?;
    if current == target {
        return Ok(());
    }

    info!("[gap-runtime] Switching wallet from chain {} to {}", current, target);
    match wallet.switch_chain(target).await {
        Ok(()) => {}
        Err(WriteError::UserRejected) => return Err(WriteError::UserRejected),
        Err(err) => {
            warn!("[gap-runtime] Chain switch to {} failed: {}", target, err);
            return Err(WriteError::WrongChain {
                expected: target,
                actual: current,
            });
        }
    }

    let actual = wallet.chain_id().await?;
    if actual != target {
        return Err(WriteError::WrongChain {
            expected: target,
            actual,
        });
    }
    Ok(())
}

/// Typed attestation to create.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttestationPayload {
    GrantUpdate {
        grant: AttestationUid,
        title: String,
        text: String,
    },
    MilestoneCompleted {
        grant: AttestationUid,
        milestone: AttestationUid,
        reason: String,
        proof_of_work: Option<String>,
    },
    MilestoneVerified {
        grant: AttestationUid,
        milestone: AttestationUid,
        reason: String,
    },
    ProjectUpdate {
        project: AttestationUid,
        title: String,
        text: String,
    },
    ProjectEndorsement {
        project: AttestationUid,
        comment: Option<String>,
    },
}

impl AttestationPayload {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::GrantUpdate { .. } => EntityKind::GrantUpdate,
            Self::MilestoneCompleted { .. } => EntityKind::MilestoneCompletion,
            Self::MilestoneVerified { .. } => EntityKind::MilestoneVerification,
            Self::ProjectUpdate { .. } => EntityKind::ProjectUpdate,
            Self::ProjectEndorsement { .. } => EntityKind::Endorsement,
        }
    }

    /// Attestation the new one references.
    pub fn parent(&self) -> AttestationUid {
        match self {
            Self::GrantUpdate { grant, .. } => *grant,
            Self::MilestoneCompleted { milestone, .. }
            | Self::MilestoneVerified { milestone, .. } => *milestone,
            Self::ProjectUpdate { project, .. } | Self::ProjectEndorsement { project, .. } => {
                *project
            }
        }
    }
}

/// Result of a successful attest.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attested {
    pub uid: AttestationUid,
    pub receipt: TxReceipt,
}

/// Attestation SDK.
#[async_trait]
pub trait AttestationWriter: Send + Sync {
    /// Create an attestation on `chain`. Pushes `Pending` once signed.
    async fn attest(
        &self,
        chain: ChainId,
        payload: &AttestationPayload,
        steps: &StepReporter,
    ) -> Result<Attested, WriteError>;

    /// Revoke one or more attestations in a single transaction.
    async fn revoke(
        &self,
        chain: ChainId,
        uids: &[AttestationUid],
        steps: &StepReporter,
    ) -> Result<TxReceipt, WriteError>;
}

/// Read indexer.
#[async_trait]
pub trait IndexerReader: Send + Sync {
    /// Project aggregate by slug or uid.
    async fn project(&self, reference: &str) -> Result<Project, ReadError>;

    async fn application(&self, reference: &str) -> Result<FundingApplication, ReadError>;

    async fn is_community_admin(
        &self,
        community: &AttestationUid,
        actor: &Address,
    ) -> Result<bool, ReadError>;
}
