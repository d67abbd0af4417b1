//! # GAP-01 Application Review
//!
//! Lifecycle of a funding application from submission to a terminal outcome.
//!
//! **Architecture:** Hexagonal (Domain + Ports/Adapters)
//!
//! ## State Machine
//!
//! ```text
//!   pending ──┐
//!             ├─ Start Review ─► under_review ─┬─ Approve ─────────► approved  (terminal)
//!   resubmitted┘                     ▲         ├─ Reject ──────────► rejected  (terminal)
//!                                    │         └─ Request Revision ─► revision_requested
//!                                    └──────────── Review ─────────────────────┘
//! ```
//!
//! ## Rules
//!
//! | Rule | Where |
//! |------|-------|
//! | Only table transitions are legal | [`next_status`] |
//! | Terminal states render no actions | [`render_actions`] |
//! | Updating flag disables, never hides | [`render_actions`] |
//! | Owner may edit unless `under_review`/`approved` | [`can_edit_application`] |
//! | No mutation without program write permission | [`ApplicationReviewService`] |
//!
//! Milestone review status is derived, never stored: see [`get_milestone_status`].
//!
//! ## Module Structure
//!
//! ```text
//! gap-01-application-review/
//! ├── domain/      # ApplicationStatus, ReviewAction, Milestone, transition table
//! ├── ports/       # PermissionChecker, ApplicationStatusGateway
//! ├── adapters/    # In-memory mocks
//! └── service.rs   # ApplicationReviewService
//! ```

#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use domain::{
    available_actions, can_edit_application, get_milestone_status, next_status, render_actions,
    ActionControl, ApplicationStatus, FundingApplication, Milestone, MilestoneCompletion,
    MilestoneReviewStatus, MilestoneVerification, ApplicationCompletion, ReviewAction,
    StatusHistoryEntry,
};
pub use error::{ReviewError, ReviewResult};
pub use ports::{ApplicationStatusGateway, PermissionChecker};
pub use service::ApplicationReviewService;
