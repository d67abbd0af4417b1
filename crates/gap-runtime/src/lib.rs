//! # GAP Runtime
//!
//! Composition root for the GAP write/reconcile core. Loads configuration,
//! builds the HTTP adapters, wires the subsystems and exposes one method per
//! user-facing mutation on [`GapClient`].
//!
//! ## Wiring
//!
//! ```text
//!              ┌──────────────────────── GapContainer ────────────────────────┐
//!  GapConfig ─►│ Ports (wallet, attestations, indexer, backend, bundler)      │
//!              │   │                                                          │
//!              │   ├─► gap-01 ApplicationReviewService ─┐                     │
//!              │   ├─► gap-02 Reconciler ───────────────┼─► InMemoryEventBus ─┼─► toasts, stepper,
//!              │   ├─► gap-03 RevokeService ────────────┤                     │   MetricsRecorder
//!              │   └─► gap-04 GaslessRouter             │                     │
//!              │                         SessionStores ◄┘ (background refresh)│
//!              └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Tests and embedders swap any port through [`GapContainer::with_ports`];
//! the in-memory doubles live in [`adapters::memory`].

#![warn(clippy::all)]

pub mod actions;
pub mod adapters;
pub mod config;
pub mod container;
pub mod error;
pub mod flows;
pub mod metrics;
pub mod model;
pub mod ports;
pub mod store;

pub use actions::{AttestAction, ProjectRefresh, ProjectSource};
pub use config::{
    BackendConfig, ConfigError, GapConfig, GaslessSettings, IndexerConfig, ReconcileSettings,
};
pub use container::{init_runtime_telemetry, GapContainer, Ports};
pub use error::{GapError, GapResult};
pub use flows::{Flow, FlowOutcome, GapClient, Posted, Revoked};
pub use metrics::{record_event, MetricsRecorder};
pub use model::{Endorsement, Grant, GrantCompletion, Objective, Project, ProjectMember, Update};
pub use ports::{
    ensure_chain, AttestationPayload, AttestationWriter, Attested, IndexerReader, WalletSession,
};
pub use store::{AuthState, SessionStores, Store};
