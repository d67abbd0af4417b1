//! Run requests and terminal outcomes.

use shared_bus::{EventPublisher, ReconcileVerdict};
use shared_types::TxReceipt;
use std::sync::Arc;

use super::StepReporter;
use crate::ports::BackgroundRefresh;

/// What one reconciliation run is about.
#[derive(Clone)]
pub struct ReconcileRequest {
    /// Operation label, e.g. `milestone_completion`.
    pub operation: String,
    /// Toast shown once the change is visible.
    pub success_message: String,
    /// Toast prefix when the submit fails.
    pub failure_message: String,
    pub(crate) steps: StepReporter,
    pub(crate) refresh: Option<Arc<dyn BackgroundRefresh>>,
}

impl ReconcileRequest {
    pub fn new(
        operation: impl Into<String>,
        success_message: impl Into<String>,
        events: Arc<dyn EventPublisher>,
    ) -> Self {
        let operation = operation.into();
        Self {
            steps: StepReporter::new(operation.clone(), events),
            failure_message: format!("Failed to complete {}", operation.replace('_', " ")),
            success_message: success_message.into(),
            operation,
            refresh: None,
        }
    }

    /// Use an existing stepper instead of a fresh one.
    pub fn with_steps(mut self, steps: StepReporter) -> Self {
        self.steps = steps;
        self
    }

    pub fn with_failure_message(mut self, message: impl Into<String>) -> Self {
        self.failure_message = message.into();
        self
    }

    /// Refresh fired once, in the background, after a successful submit.
    pub fn with_refresh(mut self, refresh: Arc<dyn BackgroundRefresh>) -> Self {
        self.refresh = Some(refresh);
        self
    }

    pub fn steps(&self) -> &StepReporter {
        &self.steps
    }
}

/// Terminal state of a run whose submit succeeded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The predicate held on fetch number `attempts`.
    Indexed { attempts: u32, receipt: TxReceipt },
    /// Every allowed fetch ran without the predicate holding.
    TimedOut { attempts: u32, receipt: TxReceipt },
    /// The cancel signal fired before the predicate held.
    Cancelled { attempts: u32, receipt: TxReceipt },
}

impl ReconcileOutcome {
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Indexed { attempts, .. }
            | Self::TimedOut { attempts, .. }
            | Self::Cancelled { attempts, .. } => *attempts,
        }
    }

    pub fn receipt(&self) -> &TxReceipt {
        match self {
            Self::Indexed { receipt, .. }
            | Self::TimedOut { receipt, .. }
            | Self::Cancelled { receipt, .. } => receipt,
        }
    }

    pub fn is_indexed(&self) -> bool {
        matches!(self, Self::Indexed { .. })
    }

    pub fn verdict(&self) -> ReconcileVerdict {
        match self {
            Self::Indexed { .. } => ReconcileVerdict::Indexed,
            Self::TimedOut { .. } => ReconcileVerdict::TimedOut,
            Self::Cancelled { .. } => ReconcileVerdict::Cancelled,
        }
    }
}
