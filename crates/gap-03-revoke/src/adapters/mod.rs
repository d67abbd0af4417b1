//! # Adapters

pub mod memory;

pub use memory::{MockOffChainRevoker, MockOnChainRevoker};
