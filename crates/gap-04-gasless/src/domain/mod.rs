//! # Domain Module
//!
//! Provider table, clients and the sponsored call shape.

pub mod client;
pub mod table;

pub use client::*;
pub use table::*;
