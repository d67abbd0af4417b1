//! # Domain Module
//!
//! Revoke targets, caller authority and path selection.

use serde::{Deserialize, Serialize};
use shared_types::{Address, AttestationUid, ChainId, EntityKind, TxReceipt, WriteError};

/// The attestation to revoke.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevokeTarget {
    pub uid: AttestationUid,
    pub chain_id: ChainId,
    pub kind: EntityKind,
    /// Original attester, when the entity records it.
    pub attester: Option<Address>,
}

/// What the caller may do on chain.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RevokeAuthority {
    /// Recognized owner/admin for the attestation's schema.
    pub on_chain_authorized: bool,
    /// Connected signer, if any.
    pub signer: Option<Address>,
}

impl RevokeAuthority {
    pub fn on_chain(signer: Address) -> Self {
        Self {
            on_chain_authorized: true,
            signer: Some(signer),
        }
    }

    pub fn off_chain_only() -> Self {
        Self::default()
    }
}

/// Path a revoke went (or will go) through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevokePath {
    OnChain,
    OffChain,
}

impl RevokePath {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OnChain => "onchain",
            Self::OffChain => "offchain",
        }
    }
}

/// First path to try for `target` given `authority`.
///
/// On-chain needs schema authorization and, when the attester is known, a
/// signer equal to it.
pub fn select_path(target: &RevokeTarget, authority: &RevokeAuthority) -> RevokePath {
    if !authority.on_chain_authorized {
        return RevokePath::OffChain;
    }
    match (target.attester, authority.signer) {
        (Some(attester), Some(signer)) if attester == signer => RevokePath::OnChain,
        (Some(_), _) => RevokePath::OffChain,
        (None, Some(_)) => RevokePath::OnChain,
        (None, None) => RevokePath::OffChain,
    }
}

/// Successful revoke.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RevokeReport {
    pub via: RevokePath,
    /// On-chain receipt; empty for off-chain.
    pub receipt: TxReceipt,
    /// Set when the on-chain attempt failed and off-chain succeeded.
    pub fallback_from: Option<WriteError>,
}

impl RevokeReport {
    pub fn used_fallback(&self) -> bool {
        self.fallback_from.is_some()
    }
}
