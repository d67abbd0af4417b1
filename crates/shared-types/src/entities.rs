//! # Core Identifiers
//!
//! Attestation-backed entities (grants, milestones, updates, members,
//! endorsements, objectives) are addressed by a content-derived uid issued by
//! the attestation registry, live on one chain, and are signed by one wallet.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::errors::ParseIdError;

// =============================================================================
// CHAIN IDS
// =============================================================================

/// EVM chain identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(pub u64);

impl ChainId {
    pub const OPTIMISM: ChainId = ChainId(10);
    pub const ARBITRUM: ChainId = ChainId(42161);
    pub const CELO: ChainId = ChainId(42220);
    pub const BASE: ChainId = ChainId(8453);
    pub const LISK: ChainId = ChainId(1135);
    pub const SEI: ChainId = ChainId(1329);
    pub const SEPOLIA: ChainId = ChainId(11155111);
    pub const OPTIMISM_SEPOLIA: ChainId = ChainId(11155420);
    pub const BASE_SEPOLIA: ChainId = ChainId(84532);

    /// Human readable network name, `None` for chains the platform does not deploy to.
    pub fn name(&self) -> Option<&'static str> {
        match self.0 {
            10 => Some("Optimism"),
            42161 => Some("Arbitrum"),
            42220 => Some("Celo"),
            8453 => Some("Base"),
            1135 => Some("Lisk"),
            1329 => Some("Sei"),
            11155111 => Some("Sepolia"),
            11155420 => Some("Optimism Sepolia"),
            84532 => Some("Base Sepolia"),
            _ => None,
        }
    }

    pub fn is_testnet(&self) -> bool {
        matches!(self.0, 11155111 | 11155420 | 84532)
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ChainId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(ChainId)
            .map_err(|_| ParseIdError::InvalidChainId(s.to_string()))
    }
}

// =============================================================================
// FIXED-WIDTH HEX IDENTIFIERS
// =============================================================================

fn decode_hex<const N: usize>(input: &str, kind: &'static str) -> Result<[u8; N], ParseIdError> {
    let trimmed = input.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if digits.len() != N * 2 {
        return Err(ParseIdError::InvalidLength {
            kind,
            expected: N,
            actual: digits.len() / 2,
        });
    }

    let mut out = [0u8; N];
    hex::decode_to_slice(digits, &mut out).map_err(|_| ParseIdError::InvalidHex {
        kind,
        value: input.to_string(),
    })?;
    Ok(out)
}

macro_rules! hex_id {
    ($(#[$meta:meta])* $name:ident, $len:expr, $kind:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub struct $name(pub [u8; $len]);

        impl $name {
            /// Parse from `0x`-prefixed or bare hex, case-insensitive.
            pub fn from_hex(s: &str) -> Result<Self, ParseIdError> {
                decode_hex::<$len>(s, $kind).map(Self)
            }

            /// Lowercase `0x`-prefixed hex.
            pub fn to_hex(&self) -> String {
                format!("0x{}", hex::encode(self.0))
            }

            pub fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.to_hex())
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.to_hex())
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_hex(s)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_hex())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                Self::from_hex(&raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

hex_id!(
    /// A 20-byte wallet or contract address.
    Address,
    20,
    "address"
);

hex_id!(
    /// Attestation uid issued by the registry.
    AttestationUid,
    32,
    "attestation uid"
);

hex_id!(
    /// Transaction hash.
    TxHash,
    32,
    "transaction hash"
);

impl Address {
    /// Addresses compare case-insensitively in their hex form; byte equality
    /// already gives that, this is the string-side helper.
    pub fn eq_hex(&self, other: &str) -> bool {
        Address::from_hex(other).map(|o| o == *self).unwrap_or(false)
    }
}

// =============================================================================
// WRITE RECEIPTS
// =============================================================================

/// Handle returned by a successful write.
///
/// On-chain writes carry at least one hash. Off-chain writes (backend
/// revocation) carry none.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    pub hashes: Vec<TxHash>,
}

impl TxReceipt {
    pub fn on_chain(hashes: Vec<TxHash>) -> Self {
        Self { hashes }
    }

    pub fn single(hash: TxHash) -> Self {
        Self { hashes: vec![hash] }
    }

    pub fn off_chain() -> Self {
        Self { hashes: Vec::new() }
    }

    pub fn is_on_chain(&self) -> bool {
        !self.hashes.is_empty()
    }

    pub fn first(&self) -> Option<&TxHash> {
        self.hashes.first()
    }
}

// =============================================================================
// ENTITY KINDS
// =============================================================================

/// Kinds of attestation-backed entities the platform mutates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Grant,
    GrantUpdate,
    GrantCompletion,
    Milestone,
    MilestoneCompletion,
    MilestoneVerification,
    ProjectUpdate,
    Member,
    Endorsement,
    ProjectObjective,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Grant => "grant",
            EntityKind::GrantUpdate => "grant_update",
            EntityKind::GrantCompletion => "grant_completion",
            EntityKind::Milestone => "milestone",
            EntityKind::MilestoneCompletion => "milestone_completion",
            EntityKind::MilestoneVerification => "milestone_verification",
            EntityKind::ProjectUpdate => "project_update",
            EntityKind::Member => "member",
            EntityKind::Endorsement => "endorsement",
            EntityKind::ProjectObjective => "project_objective",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
