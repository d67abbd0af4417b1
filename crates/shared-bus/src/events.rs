//! # GAP Events
//!
//! Defines all event types that flow through the shared bus. Mutation flows
//! publish here; UI shells, loggers and tests subscribe.

use serde::{Deserialize, Serialize};
use shared_types::StepStatus;

/// Severity of a user-facing notification (toast).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// Terminal verdict of a write-then-reconcile run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileVerdict {
    Indexed,
    TimedOut,
    Cancelled,
    SubmitFailed,
}

impl ReconcileVerdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Indexed => "indexed",
            Self::TimedOut => "timed_out",
            Self::Cancelled => "cancelled",
            Self::SubmitFailed => "submit_failed",
        }
    }
}

/// All events that can be published to the event bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GapEvent {
    // =========================================================================
    // STEPPER (gap-02 reconciliation, gap-03 revoke)
    // =========================================================================
    /// A write moved to a new stepper phase.
    StepChanged {
        /// Operation label, e.g. `grant_update`.
        operation: String,
        step: StepStatus,
    },

    // =========================================================================
    // NOTIFICATIONS
    // =========================================================================
    /// A toast for the user.
    Notification {
        level: NotificationLevel,
        message: String,
    },

    /// A failure forwarded to the central error reporter.
    ErrorReported {
        /// Where the failure happened, e.g. `grant_update.submit`.
        context: String,
        message: String,
    },

    // =========================================================================
    // APPLICATION REVIEW (gap-01)
    // =========================================================================
    /// A funding application changed review status.
    ApplicationStatusChanged {
        reference: String,
        from: String,
        to: String,
    },

    // =========================================================================
    // RECONCILIATION (gap-02)
    // =========================================================================
    /// A write-then-reconcile run terminated.
    ReconciliationFinished {
        operation: String,
        verdict: ReconcileVerdict,
        attempts: u32,
    },
}

impl GapEvent {
    /// Get the topic for this event (for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::StepChanged { .. } => EventTopic::Stepper,
            Self::Notification { .. } => EventTopic::Notifications,
            Self::ErrorReported { .. } => EventTopic::Errors,
            Self::ApplicationStatusChanged { .. } => EventTopic::Applications,
            Self::ReconciliationFinished { .. } => EventTopic::Reconciliation,
        }
    }

    /// Operation label, for events tied to one write.
    #[must_use]
    pub fn operation(&self) -> Option<&str> {
        match self {
            Self::StepChanged { operation, .. } | Self::ReconciliationFinished { operation, .. } => {
                Some(operation)
            }
            _ => None,
        }
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Stepper phase changes.
    Stepper,
    /// User-facing toasts.
    Notifications,
    /// Error reports.
    Errors,
    /// Application review status changes.
    Applications,
    /// Reconciliation verdicts.
    Reconciliation,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
    /// Operation labels to include. Empty means all operations.
    pub operations: Vec<String>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self {
            topics,
            operations: Vec::new(),
        }
    }

    /// Create a filter for events of one operation.
    #[must_use]
    pub fn operation(operation: impl Into<String>) -> Self {
        Self {
            topics: Vec::new(),
            operations: vec![operation.into()],
        }
    }

    /// Check if an event matches this filter.
    ///
    /// Events without an operation label pass the operation check.
    #[must_use]
    pub fn matches(&self, event: &GapEvent) -> bool {
        let topic_match = self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic());

        let operation_match = self.operations.is_empty()
            || event
                .operation()
                .map_or(true, |op| self.operations.iter().any(|o| o == op));

        topic_match && operation_match
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(operation: &str) -> GapEvent {
        GapEvent::StepChanged {
            operation: operation.to_string(),
            step: StepStatus::Pending,
        }
    }

    #[test]
    fn test_event_topic_mapping() {
        assert_eq!(step("grant_update").topic(), EventTopic::Stepper);
        let toast = GapEvent::Notification {
            level: NotificationLevel::Success,
            message: "done".into(),
        };
        assert_eq!(toast.topic(), EventTopic::Notifications);
    }

    #[test]
    fn test_filter_all() {
        assert!(EventFilter::all().matches(&step("x")));
    }

    #[test]
    fn test_filter_by_topic() {
        let filter = EventFilter::topics(vec![EventTopic::Notifications]);
        assert!(!filter.matches(&step("x")));
        assert!(filter.matches(&GapEvent::Notification {
            level: NotificationLevel::Error,
            message: "boom".into(),
        }));
    }

    #[test]
    fn test_filter_by_operation() {
        let filter = EventFilter::operation("member_revoke");
        assert!(filter.matches(&step("member_revoke")));
        assert!(!filter.matches(&step("grant_update")));
        // Unlabelled events pass the operation check.
        assert!(filter.matches(&GapEvent::ErrorReported {
            context: "c".into(),
            message: "m".into(),
        }));
    }

    #[test]
    fn test_verdict_labels() {
        assert_eq!(ReconcileVerdict::TimedOut.as_str(), "timed_out");
        assert_eq!(ReconcileVerdict::SubmitFailed.as_str(), "submit_failed");
    }
}
