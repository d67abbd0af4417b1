//! # GAP-02 Write-then-Reconcile
//!
//! One control flow for every attestation-backed mutation: submit a write,
//! then poll a read path until the change is visible.
//!
//! **Architecture:** Hexagonal (Domain + Ports/Adapters)
//!
//! ## Flow
//!
//! ```text
//!  Preparing ──submit──► Pending ──► Indexing ──poll──► Indexed
//!      │                    │                     │
//!      │ WriteError         └─ spawn refresh      ├─ attempts exhausted ─► TimedOut
//!      ▼                                          └─ cancel signal ──────► Cancelled
//!  error toast + report + stepper reset
//! ```
//!
//! ## Polling
//!
//! | Parameter | Default |
//! |-----------|---------|
//! | Max fetches | 1000 |
//! | Interval | 1500 ms, fixed (no backoff) |
//!
//! A failed fetch counts as an attempt and is otherwise ignored. Cancellation
//! is checked before every fetch and raced against every sleep.

#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use domain::{
    cancellation, CancelHandle, CancelOnDrop, CancelSignal, ReconcileConfig, ReconcileOutcome,
    ReconcileRequest, StepReporter, DEFAULT_MAX_ATTEMPTS, DEFAULT_POLL_INTERVAL,
};
pub use error::{ReconcileError, ReconcileResult};
pub use ports::{AggregateSource, BackgroundRefresh, ErrorReporter, Notifier, WriteAction};
pub use service::Reconciler;
