//! # Adapters
//!
//! - [`http`]: reqwest implementations of the indexer and backend ports
//! - [`chain`]: on-chain revoke through the attestation SDK port
//! - [`memory`]: in-process doubles for tests and local runs

pub mod chain;
pub mod http;
pub mod memory;

pub use chain::AttestationRevoker;
pub use http::{
    ApiClient, HttpApplicationStatusGateway, HttpIndexer, HttpOffChainRevoker,
    HttpPermissionChecker,
};
pub use memory::{
    apply_attestation, remove_attestation, InMemoryIndexer, InMemoryOffChainRevoker,
    MockAttestationWriter, MockWallet,
};
