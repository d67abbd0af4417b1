//! # Write Progress Steps
//!
//! Every attestation-backed write walks the same indicator:
//!
//! ```text
//! [Idle] ──→ [Preparing] ──→ [Pending] ──→ [Indexing] ──→ [Indexed]
//!    ↑            │              │              │
//!    └────────────┴──── failure / cancel ───────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Progress of one write, as shown by the stepper.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    /// No write in flight.
    #[default]
    Idle,
    /// Building the attestation / waiting for the wallet signature.
    Preparing,
    /// Transaction submitted, waiting for inclusion.
    Pending,
    /// Included on chain, waiting for the indexer to catch up.
    Indexing,
    /// Visible through the read API.
    Indexed,
}

impl StepStatus {
    /// Whether a write is currently in progress.
    pub fn is_in_progress(&self) -> bool {
        matches!(self, Self::Preparing | Self::Pending | Self::Indexing)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Preparing => "preparing",
            Self::Pending => "pending",
            Self::Indexing => "indexing",
            Self::Indexed => "indexed",
        }
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
