//! Attestation writes through the reconcile loop: stepper phases, toasts,
//! session cache refresh and metrics.

use super::harness::*;
use gap_02_reconciliation::{cancellation, CancelSignal};
use gap_runtime::adapters::MockWallet;
use gap_runtime::{FlowOutcome, GapContainer, GapError};
use gap_telemetry::RECONCILE_OUTCOMES;
use shared_bus::{EventTopic, GapEvent, NotificationLevel, ReconcileVerdict};
use shared_types::{ChainId, StepStatus, WriteError};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn test_grant_update_walks_every_step() {
    let h = HarnessBuilder::new(owner()).lag(3).build();
    let mut stepper = h.tap(vec![EventTopic::Stepper]);
    let mut notes = h.tap(vec![EventTopic::Notifications]);

    let posted = h
        .client
        .post_grant_update(PROJECT, uid(GRANT), "Month 1", "Site survey done", CancelSignal::never())
        .await
        .unwrap();

    assert!(posted.outcome.is_indexed());
    assert_eq!(
        steps(&mut stepper, "grant_update"),
        vec![
            StepStatus::Preparing,
            StepStatus::Pending,
            StepStatus::Indexing,
            StepStatus::Indexed
        ]
    );
    assert_eq!(
        toasts(&mut notes),
        vec![(NotificationLevel::Success, "Grant update posted successfully!".to_string())]
    );
    // Attested on the grant's chain, not the wallet's starting chain.
    assert_eq!(h.wallet.current_chain(), ChainId::CELO);
    assert_eq!(h.writer.attested()[0].0, ChainId::CELO);
}

#[tokio::test(start_paused = true)]
async fn test_background_refresh_updates_session_cache() {
    let h = HarnessBuilder::new(admin()).build();

    let posted = h
        .client
        .post_project_update(PROJECT, "Hello", "We are live", CancelSignal::never())
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;

    let cached = h
        .container
        .stores
        .cached_project(PROJECT)
        .expect("flow caches the project");
    assert!(cached.has_update(&posted.uid));
}

#[tokio::test(start_paused = true)]
async fn test_timed_out_write_is_not_an_error() {
    let h = HarnessBuilder::new(owner()).lag(500).max_attempts(4).build();
    let mut stepper = h.tap(vec![EventTopic::Stepper]);
    let mut notes = h.tap(vec![EventTopic::Notifications]);
    let mut verdicts = h.tap(vec![EventTopic::Reconciliation]);

    let posted = h
        .client
        .complete_milestone(
            PROJECT,
            uid(GRANT),
            uid(OPEN_MILESTONE),
            "Trained 30 residents",
            None,
            CancelSignal::never(),
        )
        .await
        .unwrap();

    assert!(matches!(posted.outcome, FlowOutcome::TimedOut { attempts: 4, .. }));
    assert_eq!(steps(&mut stepper, "milestone_completion").last(), Some(&StepStatus::Idle));
    let notes = toasts(&mut notes);
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].0, NotificationLevel::Warning);

    let finished: Vec<_> = verdicts.drain();
    assert!(matches!(
        finished.as_slice(),
        [GapEvent::ReconciliationFinished {
            verdict: ReconcileVerdict::TimedOut,
            attempts: 4,
            ..
        }]
    ));
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_poll_leaves_no_toast() {
    let h = HarnessBuilder::new(owner()).lag(1_000).build();
    let mut notes = h.tap(vec![EventTopic::Notifications]);
    let (handle, signal) = cancellation();

    let flow = {
        let client = h.client.clone();
        tokio::spawn(async move {
            client
                .post_project_update(PROJECT, "Draft", "Never mind", signal)
                .await
        })
    };
    tokio::time::sleep(Duration::from_secs(10)).await;
    handle.cancel();

    let posted = flow.await.unwrap().unwrap();
    assert!(matches!(posted.outcome, FlowOutcome::Cancelled { .. }));
    assert!(toasts(&mut notes).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_rejected_signature_reports_once() {
    let h = HarnessBuilder::new(owner()).build();
    h.writer.fail_with(WriteError::UserRejected);
    let mut notes = h.tap(vec![EventTopic::Notifications]);
    let mut errors = h.tap(vec![EventTopic::Errors]);

    let err = h
        .client
        .post_project_update(PROJECT, "Hi", "Body", CancelSignal::never())
        .await
        .unwrap_err();

    assert!(err.is_user_rejection());
    assert_eq!(toasts(&mut notes).len(), 1);
    // Rejections are the user's choice, not a fault to report.
    assert!(errors.drain().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_transaction_failure_is_reported() {
    let h = HarnessBuilder::new(owner()).build();
    h.writer
        .fail_with(WriteError::Transaction("execution reverted".into()));
    let mut errors = h.tap(vec![EventTopic::Errors]);

    let err = h
        .client
        .post_grant_update(PROJECT, uid(GRANT), "t", "x", CancelSignal::never())
        .await
        .unwrap_err();

    assert_eq!(
        err.write_error(),
        Some(&WriteError::Transaction("execution reverted".into()))
    );
    assert_eq!(errors.drain().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_disconnected_wallet_has_no_signer() {
    let h = HarnessBuilder::new(owner()).build();
    let client = {
        let mut ports = h.container.ports.clone();
        ports.wallet = Arc::new(MockWallet::disconnected());
        GapContainer::with_ports(h.container.config.clone(), ports).client()
    };

    let err = client
        .post_project_update(PROJECT, "t", "x", CancelSignal::never())
        .await
        .unwrap_err();
    assert_eq!(err, GapError::NoSigner);
    assert!(h.writer.attested().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_metrics_recorder_counts_verdicts() {
    let h = HarnessBuilder::new(outsider()).build();
    let recorder = h.container.start_metrics();
    let counter = RECONCILE_OUTCOMES.with_label_values(&["project_endorsement", "indexed"]);
    let before = counter.get();

    h.client
        .endorse_project(PROJECT, Some("Great work".into()), CancelSignal::never())
        .await
        .unwrap();

    for _ in 0..16 {
        if counter.get() > before {
            break;
        }
        tokio::task::yield_now().await;
    }
    assert!(counter.get() >= before + 1.0);
    assert!(recorder.stop().await >= 1);
}
