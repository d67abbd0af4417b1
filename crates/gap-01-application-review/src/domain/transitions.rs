//! # Transition Table
//!
//! | Current | Action → Next |
//! |---------|---------------|
//! | `pending` | Start Review → `under_review` |
//! | `resubmitted` | Start Review → `under_review` |
//! | `under_review` | Approve → `approved`; Request Revision → `revision_requested`; Reject → `rejected` |
//! | `revision_requested` | Review → `under_review` |
//! | `approved` | none |
//! | `rejected` | none |

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ApplicationStatus;
use crate::error::{ReviewError, ReviewResult};

/// Reviewer action on an application.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewAction {
    StartReview,
    Approve,
    RequestRevision,
    Reject,
    Review,
}

impl ReviewAction {
    /// Button label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::StartReview => "Start Review",
            Self::Approve => "Approve",
            Self::RequestRevision => "Request Revision",
            Self::Reject => "Reject",
            Self::Review => "Review",
        }
    }
}

impl fmt::Display for ReviewAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Legal actions from `status`, each with its resulting status.
pub fn available_actions(status: ApplicationStatus) -> &'static [(ReviewAction, ApplicationStatus)] {
    use ApplicationStatus::*;
    use ReviewAction::*;

    match status {
        Pending | Resubmitted => &[(StartReview, UnderReview)],
        UnderReview => &[
            (Approve, Approved),
            (RequestRevision, RevisionRequested),
            (Reject, Rejected),
        ],
        RevisionRequested => &[(Review, UnderReview)],
        Approved | Rejected => &[],
    }
}

/// Resulting status of applying `action` in `status`.
pub fn next_status(status: ApplicationStatus, action: ReviewAction) -> ReviewResult<ApplicationStatus> {
    available_actions(status)
        .iter()
        .find(|(candidate, _)| *candidate == action)
        .map(|(_, target)| *target)
        .ok_or(ReviewError::InvalidTransition {
            from: status,
            action,
        })
}

/// A rendered action button.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ActionControl {
    pub action: ReviewAction,
    /// Status passed to the status-change callback when clicked.
    pub target: ApplicationStatus,
    pub disabled: bool,
}

impl ActionControl {
    pub fn label(&self) -> &'static str {
        self.action.label()
    }
}

/// Controls to present for `status`.
///
/// Terminal statuses yield nothing. While `is_updating`, every control is
/// still present but disabled.
pub fn render_actions(status: ApplicationStatus, is_updating: bool) -> Vec<ActionControl> {
    available_actions(status)
        .iter()
        .map(|&(action, target)| ActionControl {
            action,
            target,
            disabled: is_updating,
        })
        .collect()
}
