//! # Ports
//!
//! Wallet, attestation SDK and read indexer, as seen by the flows.

pub mod outbound;

pub use outbound::{
    ensure_chain, AttestationPayload, AttestationWriter, Attested, IndexerReader, WalletSession,
};
