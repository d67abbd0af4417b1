//! # GAP Test Suite
//!
//! Cross-crate tests driving the mutation flows end to end through
//! [`gap_runtime::GapClient`] over the in-memory ports.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── harness.rs          # Shared fixture: project, wallet, indexer, bus taps
//!     ├── write_reconcile.rs  # Stepper, toasts, cache refresh, metrics
//!     ├── revoke_fallback.rs  # On-chain / off-chain routing and fallback
//!     └── review_gasless.rs   # Application review and sponsored signers
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p gap-tests
//! cargo test -p gap-tests integration::revoke_fallback::
//! ```

pub mod integration;
