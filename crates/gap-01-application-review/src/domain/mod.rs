//! # Domain Module
//!
//! Application status machine and milestone review derivation.

pub mod application;
pub mod milestone;
pub mod transitions;

pub use application::*;
pub use milestone::*;
pub use transitions::*;
