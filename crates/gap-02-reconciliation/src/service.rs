//! Reconciler - the write-then-reconcile loop.

use shared_bus::{EventPublisher, GapEvent, NotificationLevel, ReconcileVerdict};
use shared_types::{StepStatus, TxReceipt, WriteError};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domain::{CancelSignal, ReconcileConfig, ReconcileOutcome, ReconcileRequest};
use crate::error::{ReconcileError, ReconcileResult};
use crate::ports::{AggregateSource, ErrorReporter, Notifier, WriteAction};

/// Runs writes and polls for their visibility.
pub struct Reconciler {
    config: ReconcileConfig,
    notifier: Arc<dyn Notifier>,
    errors: Arc<dyn ErrorReporter>,
    events: Arc<dyn EventPublisher>,
}

impl Reconciler {
    pub fn new(
        config: ReconcileConfig,
        notifier: Arc<dyn Notifier>,
        errors: Arc<dyn ErrorReporter>,
        events: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            config,
            notifier,
            errors,
            events,
        }
    }

    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    /// A request whose stepper publishes on this reconciler's bus.
    pub fn request(
        &self,
        operation: impl Into<String>,
        success_message: impl Into<String>,
    ) -> ReconcileRequest {
        ReconcileRequest::new(operation, success_message, Arc::clone(&self.events))
    }

    /// Submit `write`, then fetch from `source` until `predicate` holds.
    ///
    /// Returns `Err` only when the submit fails. Exhausting the attempt cap
    /// and cancellation are reported as outcomes.
    pub async fn run<T, S, P>(
        &self,
        request: ReconcileRequest,
        write: &dyn WriteAction,
        source: &S,
        predicate: P,
        mut cancel: CancelSignal,
    ) -> ReconcileResult<ReconcileOutcome>
    where
        T: Send,
        S: AggregateSource<T> + ?Sized,
        P: Fn(&T) -> bool + Send + Sync,
    {
        let steps = request.steps();
        steps.set(StepStatus::Preparing).await;

        let receipt = match write.submit(steps).await {
            Ok(receipt) => receipt,
            Err(err) => {
                self.fail_submit(&request, &err).await;
                return Err(ReconcileError::Submit(err));
            }
        };

        steps.set(StepStatus::Pending).await;
        info!(
            "[gap-02] {} submitted ({} tx)",
            request.operation,
            receipt.hashes.len()
        );

        if let Some(refresh) = &request.refresh {
            let refresh = Arc::clone(refresh);
            let operation = request.operation.clone();
            tokio::spawn(async move {
                if let Err(err) = refresh.refresh().await {
                    debug!("[gap-02] {} background refresh failed: {}", operation, err);
                }
            });
        }

        steps.set(StepStatus::Indexing).await;
        let outcome = self
            .poll(&request, receipt, source, &predicate, &mut cancel)
            .await;

        match &outcome {
            ReconcileOutcome::Indexed { attempts, .. } => {
                steps.set(StepStatus::Indexed).await;
                info!("[gap-02] {} indexed after {} fetches", request.operation, attempts);
                self.notifier
                    .notify(NotificationLevel::Success, &request.success_message)
                    .await;
            }
            ReconcileOutcome::TimedOut { attempts, .. } => {
                warn!(
                    "[gap-02] {} not visible after {} fetches, giving up",
                    request.operation, attempts
                );
                steps.reset().await;
            }
            ReconcileOutcome::Cancelled { attempts, .. } => {
                info!("[gap-02] {} cancelled after {} fetches", request.operation, attempts);
                steps.reset().await;
            }
        }

        self.finish(&request, outcome.verdict(), outcome.attempts()).await;
        Ok(outcome)
    }

    async fn poll<T, S, P>(
        &self,
        request: &ReconcileRequest,
        receipt: TxReceipt,
        source: &S,
        predicate: &P,
        cancel: &mut CancelSignal,
    ) -> ReconcileOutcome
    where
        T: Send,
        S: AggregateSource<T> + ?Sized,
        P: Fn(&T) -> bool + Send + Sync,
    {
        let mut remaining = self.config.max_attempts;
        let mut attempts = 0u32;

        while remaining > 0 {
            if cancel.is_cancelled() {
                return ReconcileOutcome::Cancelled { attempts, receipt };
            }

            attempts += 1;
            let visible = match source.fetch().await {
                Ok(state) => predicate(&state),
                Err(err) => {
                    warn!(
                        "[gap-02] {} fetch {} failed, retrying: {}",
                        request.operation, attempts, err
                    );
                    false
                }
            };

            if visible {
                return ReconcileOutcome::Indexed { attempts, receipt };
            }

            remaining -= 1;
            if remaining == 0 {
                break;
            }

            debug!("[gap-02] {} not visible yet ({} left)", request.operation, remaining);
            tokio::select! {
                _ = cancel.cancelled() => {
                    return ReconcileOutcome::Cancelled { attempts, receipt };
                }
                _ = tokio::time::sleep(self.config.poll_interval) => {}
            }
        }

        ReconcileOutcome::TimedOut { attempts, receipt }
    }

    async fn fail_submit(&self, request: &ReconcileRequest, err: &WriteError) {
        warn!("[gap-02] {} submit failed: {}", request.operation, err);
        self.notifier
            .notify(
                NotificationLevel::Error,
                &format!("{}: {}", request.failure_message, err),
            )
            .await;
        if !err.is_user_rejection() {
            self.errors
                .report(&format!("{}.submit", request.operation), &err.to_string())
                .await;
        }
        request.steps().reset().await;
        self.finish(request, ReconcileVerdict::SubmitFailed, 0).await;
    }

    async fn finish(&self, request: &ReconcileRequest, verdict: ReconcileVerdict, attempts: u32) {
        self.events
            .publish(GapEvent::ReconciliationFinished {
                operation: request.operation.clone(),
                verdict,
                attempts,
            })
            .await;
    }
}
