//! Feedback channels backed by the event bus.

use async_trait::async_trait;
use shared_bus::{EventPublisher, GapEvent, NotificationLevel};
use std::sync::Arc;
use tracing::error;

use crate::ports::{ErrorReporter, Notifier};

/// Publishes toasts as `GapEvent::Notification`.
pub struct BusNotifier {
    events: Arc<dyn EventPublisher>,
}

impl BusNotifier {
    pub fn new(events: Arc<dyn EventPublisher>) -> Self {
        Self { events }
    }
}

#[async_trait]
impl Notifier for BusNotifier {
    async fn notify(&self, level: NotificationLevel, message: &str) {
        self.events
            .publish(GapEvent::Notification {
                level,
                message: message.to_string(),
            })
            .await;
    }
}

/// Logs every report at error level and forwards it to the bus when one
/// is attached.
#[derive(Default)]
pub struct TracingErrorReporter {
    events: Option<Arc<dyn EventPublisher>>,
}

impl TracingErrorReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bus(events: Arc<dyn EventPublisher>) -> Self {
        Self {
            events: Some(events),
        }
    }
}

#[async_trait]
impl ErrorReporter for TracingErrorReporter {
    async fn report(&self, context: &str, message: &str) {
        error!(context = %context, "[gap-02] {}", message);
        if let Some(events) = &self.events {
            events
                .publish(GapEvent::ErrorReported {
                    context: context.to_string(),
                    message: message.to_string(),
                })
                .await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_bus::{EventFilter, EventTopic, InMemoryEventBus};

    #[tokio::test]
    async fn test_bus_notifier_publishes_toast() {
        let bus = Arc::new(InMemoryEventBus::new());
        let mut sub = bus.subscribe(EventFilter::topics(vec![EventTopic::Notifications]));
        BusNotifier::new(bus.clone())
            .notify(NotificationLevel::Success, "Endorsement posted")
            .await;
        assert!(matches!(
            sub.recv().await,
            Some(GapEvent::Notification {
                level: NotificationLevel::Success,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_error_reporter_forwards_to_bus() {
        let bus = Arc::new(InMemoryEventBus::new());
        let mut sub = bus.subscribe(EventFilter::topics(vec![EventTopic::Errors]));
        TracingErrorReporter::with_bus(bus.clone())
            .report("member_revoke.submit", "nonce too low")
            .await;
        match sub.recv().await {
            Some(GapEvent::ErrorReported { context, .. }) => {
                assert_eq!(context, "member_revoke.submit")
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
