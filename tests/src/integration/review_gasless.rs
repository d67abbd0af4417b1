//! Application review through the runtime client, and sponsored signers
//! routed by chain.

use super::harness::*;
use gap_01_application_review::{ApplicationStatus, FundingApplication, ReviewAction, ReviewError};
use gap_04_gasless::adapters::MockLocalSigner;
use gap_04_gasless::{GaslessError, GaslessProviderKind, LocalSigner, SponsoredCall};
use gap_runtime::GapError;
use shared_bus::{EventTopic, GapEvent, NotificationLevel};
use shared_types::{Address, ChainId, ProgramId, WriteError};
use std::sync::Arc;

const APPLICATION: &str = "APP-2024-0042";

fn program() -> ProgramId {
    ProgramId::new("1041").unwrap()
}

fn submit_application(h: &Harness) {
    h.indexer.insert_application(FundingApplication::new(
        APPLICATION,
        program(),
        ChainId::CELO,
        outsider(),
    ));
}

fn local(address: Address) -> Arc<dyn LocalSigner> {
    Arc::new(MockLocalSigner::new(address))
}

#[tokio::test]
async fn test_reviewer_starts_review() {
    let h = HarnessBuilder::new(admin()).build();
    submit_application(&h);
    h.permissions.grant(program(), ChainId::CELO, admin());
    let mut changes = h.tap(vec![EventTopic::Applications]);
    let mut notes = h.tap(vec![EventTopic::Notifications]);

    let app = h
        .client
        .change_application_status(APPLICATION, ReviewAction::StartReview, Some("assigned".into()))
        .await
        .unwrap();

    assert_eq!(app.status, ApplicationStatus::UnderReview);
    assert_eq!(
        h.gateway.updates(),
        vec![(
            APPLICATION.to_string(),
            ApplicationStatus::UnderReview,
            Some("assigned".to_string())
        )]
    );
    assert!(matches!(
        changes.drain().as_slice(),
        [GapEvent::ApplicationStatusChanged { reference, .. }] if reference == APPLICATION
    ));
    assert_eq!(toasts(&mut notes)[0].0, NotificationLevel::Success);
}

#[tokio::test]
async fn test_review_without_permission_is_denied() {
    let h = HarnessBuilder::new(outsider()).build();
    submit_application(&h);

    let err = h
        .client
        .change_application_status(APPLICATION, ReviewAction::StartReview, None)
        .await
        .unwrap_err();

    assert!(matches!(err, GapError::Review(ReviewError::PermissionDenied { .. })));
    assert!(h.gateway.updates().is_empty());
}

#[tokio::test]
async fn test_gateway_failure_leaves_status() {
    let h = HarnessBuilder::new(admin()).build();
    submit_application(&h);
    h.permissions.grant(program(), ChainId::CELO, admin());
    h.gateway.fail_with(WriteError::Api {
        status: 502,
        message: "bad gateway".into(),
    });
    let mut notes = h.tap(vec![EventTopic::Notifications]);

    let err = h
        .client
        .change_application_status_to(APPLICATION, ApplicationStatus::UnderReview, None)
        .await
        .unwrap_err();

    assert!(matches!(err, GapError::Review(ReviewError::Gateway(_))));
    let notes = toasts(&mut notes);
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].0, NotificationLevel::Error);
}

#[tokio::test]
async fn test_unreachable_target_is_rejected() {
    let h = HarnessBuilder::new(admin()).build();
    submit_application(&h);
    h.permissions.grant(program(), ChainId::CELO, admin());

    let err = h
        .client
        .change_application_status_to(APPLICATION, ApplicationStatus::Approved, None)
        .await
        .unwrap_err();

    assert_eq!(
        err,
        GapError::Review(ReviewError::InvalidTarget {
            from: ApplicationStatus::Pending,
            to: ApplicationStatus::Approved,
        })
    );
}

#[tokio::test]
async fn test_unknown_application_is_a_read_error() {
    let h = HarnessBuilder::new(admin()).build();

    let err = h
        .client
        .change_application_status("APP-missing", ReviewAction::StartReview, None)
        .await
        .unwrap_err();

    assert!(matches!(err, GapError::Read(_)));
}

#[tokio::test]
async fn test_sponsored_call_goes_through_zerodev_bundler() {
    let h = HarnessBuilder::new(owner()).build();

    let signer = h
        .client
        .sponsored_signer(ChainId::OPTIMISM, local(owner()))
        .await
        .unwrap();
    signer
        .send_transaction(SponsoredCall {
            to: outsider(),
            data: vec![0xde, 0xad],
            value: 0,
        })
        .await
        .unwrap();

    let sent = h.bundler.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].0.starts_with("https://rpc.zerodev.app/api/v3/zd-project/chain/10"));
    assert_eq!(sent[0].1.sender, owner().to_hex());
}

#[tokio::test]
async fn test_celo_routes_to_alchemy() {
    let h = HarnessBuilder::new(owner()).build();

    let client = h
        .client
        .gasless_client(ChainId::CELO, local(owner()))
        .await
        .unwrap()
        .expect("celo is sponsored");

    assert_eq!(client.provider, GaslessProviderKind::Alchemy);
    assert!(client.rpc_url.ends_with("alchemy-key"));
}

#[tokio::test]
async fn test_disabled_chain_has_no_sponsor() {
    let h = HarnessBuilder::new(owner())
        .disable_gasless(ChainId::BASE)
        .build();

    assert!(h
        .client
        .gasless_client(ChainId::BASE, local(owner()))
        .await
        .unwrap()
        .is_none());

    let err = h
        .client
        .sponsored_signer(ChainId::BASE, local(owner()))
        .await
        .err()
        .unwrap();
    assert_eq!(
        err,
        GapError::Gasless(GaslessError::ProviderError {
            provider: Some(GaslessProviderKind::ZeroDev),
            chain_id: ChainId::BASE,
            original: None,
        })
    );
}
