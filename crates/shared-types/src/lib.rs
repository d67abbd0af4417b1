//! # Shared Types Crate
//!
//! Identifiers, receipts and the error taxonomy shared by every GAP crate.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: chain ids, addresses, attestation uids and
//!   transaction hashes are defined once here.
//! - **Decode at the Boundary**: indexer responses carry program references in
//!   several legacy shapes. They are converted into one canonical
//!   [`ProgramId`] on ingress and never travel further in raw form.
//! - **Classified Failures**: every write and read failure is one of the
//!   [`WriteError`] / [`ReadError`] variants so callers can choose a policy
//!   (toast, retry, fallback) by matching.

pub mod entities;
pub mod errors;
pub mod program;
pub mod steps;

pub use entities::*;
pub use errors::*;
pub use program::{ProgramId, RawProgramRef};
pub use steps::StepStatus;
