//! # Funding Applications
//!
//! An application is owned by its applicant, bound to one program on one
//! chain, and carries a mutable status plus an append-only history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{Address, ChainId, ProgramId};
use std::fmt;
use std::str::FromStr;

use crate::error::ReviewError;

/// Review status of a funding application.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    /// Submitted, not yet looked at.
    #[default]
    Pending,
    /// Applicant resubmitted after a revision request.
    Resubmitted,
    /// A reviewer picked it up.
    UnderReview,
    /// Reviewer asked the applicant for changes.
    RevisionRequested,
    /// Accepted. Terminal.
    Approved,
    /// Declined. Terminal.
    Rejected,
}

impl ApplicationStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [ApplicationStatus; 6] = [
        Self::Pending,
        Self::Resubmitted,
        Self::UnderReview,
        Self::RevisionRequested,
        Self::Approved,
        Self::Rejected,
    ];

    /// Stored (wire) form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Resubmitted => "resubmitted",
            Self::UnderReview => "under_review",
            Self::RevisionRequested => "revision_requested",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Check if terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }

    /// Whether the owner may still edit an application in this status.
    pub fn is_editable(&self) -> bool {
        !matches!(self, Self::UnderReview | Self::Approved)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = ReviewError;

    /// Case-insensitive parse of the stored status string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == lowered)
            .ok_or_else(|| ReviewError::UnknownStatus(s.to_string()))
    }
}

/// Edit permission gate on the raw stored status.
///
/// Returns `false` iff the trimmed, lowercased status is `under_review` or
/// `approved`. Unknown strings stay editable.
pub fn can_edit_application(status: &str) -> bool {
    let lowered = status.trim().to_lowercase();
    lowered != "under_review" && lowered != "approved"
}

/// One entry of the append-only status history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusHistoryEntry {
    pub status: ApplicationStatus,
    /// Reviewer note. Informational only.
    pub note: Option<String>,
    pub changed_at: DateTime<Utc>,
}

/// A funding application record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingApplication {
    /// Human-facing application reference, e.g. `APP-00042`.
    pub reference: String,
    pub program_id: ProgramId,
    pub chain_id: ChainId,
    /// Applicant wallet.
    pub owner: Address,
    pub status: ApplicationStatus,
    status_history: Vec<StatusHistoryEntry>,
}

impl FundingApplication {
    /// A freshly submitted application.
    pub fn new(
        reference: impl Into<String>,
        program_id: ProgramId,
        chain_id: ChainId,
        owner: Address,
    ) -> Self {
        Self {
            reference: reference.into(),
            program_id,
            chain_id,
            owner,
            status: ApplicationStatus::Pending,
            status_history: vec![StatusHistoryEntry {
                status: ApplicationStatus::Pending,
                note: None,
                changed_at: Utc::now(),
            }],
        }
    }

    /// Rebuild a stored application. An empty history gets one entry for
    /// the current status.
    pub fn from_parts(
        reference: impl Into<String>,
        program_id: ProgramId,
        chain_id: ChainId,
        owner: Address,
        status: ApplicationStatus,
        mut status_history: Vec<StatusHistoryEntry>,
    ) -> Self {
        if status_history.is_empty() {
            status_history.push(StatusHistoryEntry {
                status,
                note: None,
                changed_at: Utc::now(),
            });
        }
        Self {
            reference: reference.into(),
            program_id,
            chain_id,
            owner,
            status,
            status_history,
        }
    }

    /// Read-only view of the status history, oldest first.
    pub fn status_history(&self) -> &[StatusHistoryEntry] {
        &self.status_history
    }

    /// Whether the owner may edit this application right now.
    pub fn can_edit(&self) -> bool {
        self.status.is_editable()
    }

    /// Whether `actor` submitted this application.
    pub fn is_owner(&self, actor: &Address) -> bool {
        &self.owner == actor
    }

    /// Move to `status` and append a history entry.
    pub(crate) fn record_status(&mut self, status: ApplicationStatus, note: Option<String>) {
        self.status = status;
        self.status_history.push(StatusHistoryEntry {
            status,
            note,
            changed_at: Utc::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn casing_variants(s: &'static str) -> impl Strategy<Value = String> {
        proptest::collection::vec(any::<bool>(), s.len()).prop_map(move |mask| {
            s.chars()
                .zip(mask)
                .map(|(c, upper)| if upper { c.to_ascii_uppercase() } else { c })
                .collect()
        })
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(
            "Under_Review".parse::<ApplicationStatus>().unwrap(),
            ApplicationStatus::UnderReview
        );
        assert_eq!(
            " REJECTED ".parse::<ApplicationStatus>().unwrap(),
            ApplicationStatus::Rejected
        );
        assert!("archived".parse::<ApplicationStatus>().is_err());
    }

    #[test]
    fn test_terminal_states() {
        let terminal: Vec<_> = ApplicationStatus::ALL
            .into_iter()
            .filter(ApplicationStatus::is_terminal)
            .collect();
        assert_eq!(
            terminal,
            vec![ApplicationStatus::Approved, ApplicationStatus::Rejected]
        );
    }

    #[test]
    fn test_editable_statuses() {
        assert!(can_edit_application("pending"));
        assert!(can_edit_application("resubmitted"));
        assert!(can_edit_application("revision_requested"));
        assert!(can_edit_application("rejected"));
        assert!(!can_edit_application("under_review"));
        assert!(!can_edit_application("approved"));
    }

    #[test]
    fn test_padded_status_matches_parsed_gate() {
        for raw in [" approved ", "\tUNDER_REVIEW\n", " pending"] {
            let status: ApplicationStatus = raw.parse().unwrap();
            assert_eq!(can_edit_application(raw), status.is_editable(), "{raw:?}");
        }
        assert!(!can_edit_application(" approved "));
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&ApplicationStatus::RevisionRequested).unwrap();
        assert_eq!(json, "\"revision_requested\"");
    }

    #[test]
    fn test_new_application_starts_pending_with_history() {
        let app = FundingApplication::new(
            "APP-1",
            ProgramId::new("959").unwrap(),
            ChainId::OPTIMISM,
            Address::from_hex("0x1111111111111111111111111111111111111111").unwrap(),
        );
        assert_eq!(app.status, ApplicationStatus::Pending);
        assert_eq!(app.status_history().len(), 1);
        assert!(app.can_edit());
    }

    proptest! {
        #[test]
        fn prop_locked_statuses_never_editable(
            s in prop_oneof![casing_variants("under_review"), casing_variants("approved")]
        ) {
            prop_assert!(!can_edit_application(&s));
        }

        #[test]
        fn prop_open_statuses_always_editable(
            s in prop_oneof![
                casing_variants("pending"),
                casing_variants("resubmitted"),
                casing_variants("revision_requested"),
                casing_variants("rejected"),
            ]
        ) {
            prop_assert!(can_edit_application(&s));
        }

        #[test]
        fn prop_gate_agrees_with_parsed_status(
            s in prop_oneof![
                casing_variants("pending"),
                casing_variants("under_review"),
                casing_variants("approved"),
                casing_variants("rejected"),
            ],
            lead in "[ \t]{0,2}",
            trail in "[ \t\n]{0,2}",
        ) {
            let s = format!("{lead}{s}{trail}");
            let status: ApplicationStatus = s.parse().unwrap();
            prop_assert_eq!(status.is_editable(), can_edit_application(&s));
        }
    }
}
