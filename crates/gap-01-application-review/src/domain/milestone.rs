//! # Milestone Review Status
//!
//! Derived from which sub-records a milestone carries. Never stored.
//!
//! Priority (first match wins):
//!
//! 1. `verificationDetails` → [`MilestoneReviewStatus::Verified`]
//! 2. `completionDetails` → [`MilestoneReviewStatus::PendingVerification`]
//! 3. `fundingApplicationCompletion` → [`MilestoneReviewStatus::PendingCompletion`]
//! 4. otherwise → [`MilestoneReviewStatus::NotStarted`]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{Address, AttestationUid};

/// Review status of a milestone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneReviewStatus {
    Verified,
    PendingVerification,
    PendingCompletion,
    NotStarted,
}

/// Verifier attestation on a completed milestone.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneVerification {
    pub uid: Option<AttestationUid>,
    pub attester: Option<Address>,
    pub reason: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Grantee's completion attestation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneCompletion {
    pub uid: Option<AttestationUid>,
    pub attester: Option<Address>,
    pub reason: Option<String>,
    pub proof_of_work: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Completion reported through the funding-application flow, before any
/// attestation exists.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationCompletion {
    pub completion_text: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// A milestone as returned by the indexer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub uid: Option<AttestationUid>,
    pub title: String,
    #[serde(default)]
    pub verification_details: Option<MilestoneVerification>,
    #[serde(default)]
    pub completion_details: Option<MilestoneCompletion>,
    #[serde(default)]
    pub funding_application_completion: Option<ApplicationCompletion>,
}

impl Milestone {
    pub fn review_status(&self) -> MilestoneReviewStatus {
        get_milestone_status(self)
    }
}

/// Derive the review status of `milestone`.
pub fn get_milestone_status(milestone: &Milestone) -> MilestoneReviewStatus {
    if milestone.verification_details.is_some() {
        MilestoneReviewStatus::Verified
    } else if milestone.completion_details.is_some() {
        MilestoneReviewStatus::PendingVerification
    } else if milestone.funding_application_completion.is_some() {
        MilestoneReviewStatus::PendingCompletion
    } else {
        MilestoneReviewStatus::NotStarted
    }
}
