//! Revoke routing: who goes on-chain, when the backend takes over, and what
//! surfaces when both paths fail.

use super::harness::*;
use gap_02_reconciliation::CancelSignal;
use gap_03_revoke::{RevokeError, RevokePath};
use gap_runtime::GapError;
use gap_telemetry::REVOKE_PATHS;
use shared_bus::{EventTopic, NotificationLevel};
use shared_types::{ChainId, WriteError};

#[tokio::test(start_paused = true)]
async fn test_owner_removes_member_on_chain() {
    let h = HarnessBuilder::new(owner()).lag(2).build();
    let counter = REVOKE_PATHS.with_label_values(&["member", "onchain"]);
    let before = counter.get();

    let revoked = h
        .client
        .revoke_member(PROJECT, uid(MEMBER), CancelSignal::never())
        .await
        .unwrap();

    assert_eq!(revoked.via, RevokePath::OnChain);
    assert!(revoked.outcome.is_indexed());
    assert_eq!(h.writer.revoked(), vec![(ChainId::CELO, vec![uid(MEMBER)])]);
    assert_eq!(h.off_chain.calls(), 0);
    assert!(h.snapshot().member(&uid(MEMBER)).is_none());
    assert_eq!(counter.get(), before + 1.0);
}

#[tokio::test(start_paused = true)]
async fn test_admin_is_routed_off_chain() {
    let h = HarnessBuilder::new(admin()).lag(1).build();

    let revoked = h
        .client
        .revoke_member(PROJECT, uid(MEMBER), CancelSignal::never())
        .await
        .unwrap();

    assert_eq!(revoked.via, RevokePath::OffChain);
    assert!(!revoked.used_fallback);
    assert!(h.writer.revoked().is_empty());
    // No wallet prompt at all on the off-chain path.
    assert_eq!(h.wallet.switches(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_refused_chain_switch_falls_back_off_chain() {
    let h = HarnessBuilder::new(owner()).build();
    h.wallet.fail_switch_with(WriteError::UserRejected);
    let mut notes = h.tap(vec![EventTopic::Notifications]);

    let revoked = h
        .client
        .delete_objective(PROJECT, uid(OBJECTIVE), CancelSignal::never())
        .await
        .unwrap();

    assert_eq!(revoked.via, RevokePath::OffChain);
    assert!(revoked.used_fallback);
    assert!(h.snapshot().objective(&uid(OBJECTIVE)).is_none());
    assert_eq!(
        toasts(&mut notes),
        vec![(NotificationLevel::Success, "Objective deleted successfully!".to_string())]
    );
}

#[tokio::test(start_paused = true)]
async fn test_both_paths_failing_keep_entity() {
    let h = HarnessBuilder::new(owner()).build();
    h.writer.fail_with(WriteError::Network("rpc timeout".into()));
    h.off_chain.fail_with(WriteError::Unauthorized("forbidden".into()));
    let mut notes = h.tap(vec![EventTopic::Notifications]);

    let err = h
        .client
        .delete_objective(PROJECT, uid(OBJECTIVE), CancelSignal::never())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        GapError::Revoke(RevokeError::OnChain(WriteError::Network("rpc timeout".into())))
    );
    assert!(h.snapshot().objective(&uid(OBJECTIVE)).is_some());
    let notes = toasts(&mut notes);
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].0, NotificationLevel::Error);
}

#[tokio::test(start_paused = true)]
async fn test_curator_revokes_own_completion_on_chain() {
    let h = HarnessBuilder::new(curator()).build();
    h.indexer.stage(PROJECT, |project| {
        if let Some(done) = project.grants[0].completed.as_mut() {
            done.attester = Some(curator());
        }
    });

    let revoked = h
        .client
        .revoke_grant_completion(PROJECT, uid(GRANT), CancelSignal::never())
        .await
        .unwrap();

    assert_eq!(revoked.via, RevokePath::OnChain);
    assert!(h.snapshot().grants[0].completed.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_admin_revokes_completion_off_chain() {
    let h = HarnessBuilder::new(admin()).build();

    let revoked = h
        .client
        .revoke_grant_completion(PROJECT, uid(GRANT), CancelSignal::never())
        .await
        .unwrap();

    assert_eq!(revoked.via, RevokePath::OffChain);
    assert!(h.snapshot().grants[0].completed.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_outsider_cannot_revoke() {
    let h = HarnessBuilder::new(outsider()).build();

    let err = h
        .client
        .revoke_member(PROJECT, uid(MEMBER), CancelSignal::never())
        .await
        .unwrap_err();

    assert!(matches!(err, GapError::Unauthorized(_)));
    assert!(h.writer.revoked().is_empty());
    assert_eq!(h.off_chain.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_unknown_member_is_not_found() {
    let h = HarnessBuilder::new(owner()).build();

    let err = h
        .client
        .revoke_member(PROJECT, uid(0xee), CancelSignal::never())
        .await
        .unwrap_err();

    assert!(matches!(err, GapError::NotFound { kind: "member", .. }));
}
