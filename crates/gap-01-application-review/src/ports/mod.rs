//! # Ports Module
//!
//! Outbound dependencies of the review flow.

pub mod outbound;

pub use outbound::*;
