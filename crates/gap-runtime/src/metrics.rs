//! # Metrics Recorder
//!
//! Turns bus events into Prometheus samples.
//!
//! | Event | Metric |
//! |-------|--------|
//! | `ReconciliationFinished` | `gap_reconcile_outcomes_total`, `gap_reconcile_poll_attempts` |
//! | `ApplicationStatusChanged` | `gap_application_status_transitions_total` |
//! | `ErrorReported` | `gap_errors_total` |
//!
//! Revoke paths and gasless client creations are recorded where they happen
//! (see `GapClient`), since no bus event carries them.

use gap_telemetry::{RECONCILE_ATTEMPTS, RECONCILE_OUTCOMES, STATUS_TRANSITIONS, SUBSYSTEM_ERRORS};
use shared_bus::{EventFilter, EventTopic, GapEvent, InMemoryEventBus, ReconcileVerdict};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Record one event. Events without a metric are ignored.
pub fn record_event(event: &GapEvent) {
    match event {
        GapEvent::ReconciliationFinished {
            operation,
            verdict,
            attempts,
        } => {
            RECONCILE_OUTCOMES
                .with_label_values(&[operation.as_str(), verdict.as_str()])
                .inc();
            if *verdict != ReconcileVerdict::SubmitFailed {
                RECONCILE_ATTEMPTS.observe(f64::from(*attempts));
            }
        }
        GapEvent::ApplicationStatusChanged { from, to, .. } => {
            STATUS_TRANSITIONS
                .with_label_values(&[from.as_str(), to.as_str()])
                .inc();
        }
        GapEvent::ErrorReported { context, .. } => {
            SUBSYSTEM_ERRORS.with_label_values(&[context.as_str()]).inc();
        }
        GapEvent::StepChanged { .. } | GapEvent::Notification { .. } => {}
    }
}

/// Background task feeding [`record_event`] from the bus.
pub struct MetricsRecorder {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<u64>,
}

impl MetricsRecorder {
    /// Subscribe to `bus` and start recording. Must be called inside a
    /// tokio runtime.
    pub fn spawn(bus: &InMemoryEventBus) -> Self {
        let mut subscription = bus.subscribe(EventFilter::topics(vec![
            EventTopic::Reconciliation,
            EventTopic::Applications,
            EventTopic::Errors,
        ]));
        let (shutdown, mut stop) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut recorded = 0u64;
            loop {
                tokio::select! {
                    _ = stop.changed() => break,
                    event = subscription.recv() => match event {
                        Some(event) => {
                            record_event(&event);
                            recorded += 1;
                        }
                        None => break,
                    },
                }
            }
            debug!("[gap-runtime] Metrics recorder stopped after {} events", recorded);
            recorded
        });

        info!("[gap-runtime] Metrics recorder started");
        Self { shutdown, handle }
    }

    /// Stop the task; returns the number of events recorded.
    pub async fn stop(self) -> u64 {
        let _ = self.shutdown.send(true);
        self.handle.await.unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_bus::EventPublisher;

    #[test]
    fn test_record_reconcile_outcome() {
        let counter = RECONCILE_OUTCOMES.with_label_values(&["metrics_test_op", "timed_out"]);
        let before = counter.get();
        record_event(&GapEvent::ReconciliationFinished {
            operation: "metrics_test_op".into(),
            verdict: ReconcileVerdict::TimedOut,
            attempts: 1000,
        });
        assert_eq!(counter.get(), before + 1.0);
    }

    #[test]
    fn test_record_status_transition() {
        let counter = STATUS_TRANSITIONS.with_label_values(&["resubmitted", "under_review"]);
        let before = counter.get();
        record_event(&GapEvent::ApplicationStatusChanged {
            reference: "APP-1".into(),
            from: "resubmitted".into(),
            to: "under_review".into(),
        });
        assert_eq!(counter.get(), before + 1.0);
    }

    #[tokio::test]
    async fn test_recorder_consumes_bus_events() {
        let bus = InMemoryEventBus::new();
        let recorder = MetricsRecorder::spawn(&bus);

        bus.publish(GapEvent::ErrorReported {
            context: "metrics_test.submit".into(),
            message: "boom".into(),
        })
        .await;
        // Filtered out by topic.
        bus.publish(GapEvent::Notification {
            level: shared_bus::NotificationLevel::Info,
            message: "hi".into(),
        })
        .await;

        let counter = SUBSYSTEM_ERRORS.with_label_values(&["metrics_test.submit"]);
        for _ in 0..16 {
            if counter.get() >= 1.0 {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(counter.get(), 1.0);
        assert_eq!(recorder.stop().await, 1);
    }
}
