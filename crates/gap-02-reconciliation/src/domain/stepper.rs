//! Stepper: the per-mutation progress indicator.

use shared_bus::{EventPublisher, GapEvent};
use shared_types::StepStatus;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// Publishes phase changes of one mutation.
///
/// Observers either hold a `watch` receiver from [`StepReporter::subscribe`]
/// or listen for `GapEvent::StepChanged` on the bus.
#[derive(Clone)]
pub struct StepReporter {
    operation: Arc<str>,
    tx: Arc<watch::Sender<StepStatus>>,
    events: Option<Arc<dyn EventPublisher>>,
}

impl StepReporter {
    pub fn new(operation: impl Into<String>, events: Arc<dyn EventPublisher>) -> Self {
        let operation: String = operation.into();
        Self {
            operation: Arc::from(operation),
            tx: Arc::new(watch::channel(StepStatus::Idle).0),
            events: Some(events),
        }
    }

    /// A reporter that only updates its watch channel.
    pub fn detached(operation: impl Into<String>) -> Self {
        let operation: String = operation.into();
        Self {
            operation: Arc::from(operation),
            tx: Arc::new(watch::channel(StepStatus::Idle).0),
            events: None,
        }
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn current(&self) -> StepStatus {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<StepStatus> {
        self.tx.subscribe()
    }

    /// Move to `step`. Repeating the current step publishes nothing.
    pub async fn set(&self, step: StepStatus) {
        let previous = self.tx.send_replace(step);
        if previous == step {
            return;
        }
        debug!("[gap-02] {} step {} -> {}", self.operation, previous, step);
        if let Some(events) = &self.events {
            events
                .publish(GapEvent::StepChanged {
                    operation: self.operation.to_string(),
                    step,
                })
                .await;
        }
    }

    /// Back to not-in-progress.
    pub async fn reset(&self) {
        self.set(StepStatus::Idle).await;
    }
}

impl std::fmt::Debug for StepReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepReporter")
            .field("operation", &self.operation)
            .field("current", &self.current())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_bus::{EventFilter, EventTopic, InMemoryEventBus};

    #[tokio::test]
    async fn test_set_publishes_step_changes() {
        let bus = Arc::new(InMemoryEventBus::new());
        let mut sub = bus.subscribe(EventFilter::topics(vec![EventTopic::Stepper]));
        let steps = StepReporter::new("grant_update", bus.clone());

        steps.set(StepStatus::Pending).await;
        steps.set(StepStatus::Pending).await;
        steps.reset().await;

        let events = sub.drain();
        assert_eq!(events.len(), 2);
        assert_eq!(steps.current(), StepStatus::Idle);
    }

    #[tokio::test]
    async fn test_watch_receiver_sees_latest() {
        let steps = StepReporter::detached("endorsement");
        let rx = steps.subscribe();
        steps.set(StepStatus::Indexing).await;
        assert_eq!(*rx.borrow(), StepStatus::Indexing);
        assert!(steps.current().is_in_progress());
    }
}
