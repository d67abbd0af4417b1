//! # GAP-03 Revoke
//!
//! Soft-delete an attestation-backed entity (member, objective, grant
//! completion) through the cheapest authorized path.
//!
//! ## Decision Procedure
//!
//! ```text
//!  on-chain authorized && signer == attester (when known)?
//!     │ yes                              │ no
//!     ▼                                  ▼
//!  on-chain revoke ──ok──► OnChain    off-chain revoke ──ok──► OffChain
//!     │ err                                 │ err
//!     ▼                                     ▼
//!  reset stepper, off-chain revoke       RevokeError::OffChain
//!     │ ok ──► OffChain (fallback)
//!     │ err ─► RevokeError::OnChain(original on-chain error)
//! ```
//!
//! [`RevokeAction`] wraps the whole procedure as a write so confirmation runs
//! through the same reconciler as every other mutation.

#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use domain::{select_path, RevokeAuthority, RevokePath, RevokeReport, RevokeTarget};
pub use error::{RevokeError, RevokeResult};
pub use ports::{OffChainRevoker, OnChainRevoker};
pub use service::{RevokeAction, RevokeService};
