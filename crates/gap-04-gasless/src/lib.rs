//! # GAP-04 Gasless
//!
//! Routes sponsored ("gasless") transactions to an infrastructure provider
//! chosen by chain id, and adapts the provider's client into one
//! [`TransactionSigner`] interface.
//!
//! ## Dispatch
//!
//! ```text
//! chain id ──► GaslessTable ──► { enabled, provider } ──► GaslessProvider (strategy)
//!                  │                                        ├─ create_client
//!                  └─ absent / disabled                     └─ to_signer ──► SponsoredSigner
//!                       ├─ create_client: Ok(None) + warn
//!                       └─ get_signer:    Err(ProviderError)
//! ```
//!
//! No retry, pooling or cross-provider failover: failures are surfaced.

#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use adapters::{AlchemyProvider, HttpBundlerTransport, SponsoredSigner, ZeroDevProvider};
pub use domain::{
    ChainGaslessConfig, GaslessClient, GaslessProviderKind, GaslessTable, SponsoredCall,
    UserOperation, ENTRY_POINT_V07,
};
pub use error::{GaslessError, GaslessResult};
pub use ports::{BundlerTransport, GaslessProvider, LocalSigner, TransactionSigner};
pub use service::GaslessRouter;
