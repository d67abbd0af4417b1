//! Application Review Service
//!
//! ```text
//! change_status(app, action, note, actor)
//!   ├─ permission check ──── denied ──► PermissionDenied (no mutation)
//!   ├─ transition table ──── illegal ─► InvalidTransition
//!   ├─ in-flight guard ───── busy ────► UpdateInFlight
//!   ├─ gateway.update_status
//!   │     └─ failed ──► error toast, Gateway(err), app untouched
//!   └─ record history, publish ApplicationStatusChanged + success toast
//! ```

use parking_lot::Mutex;
use shared_bus::{EventPublisher, GapEvent, NotificationLevel};
use shared_types::Address;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::{
    next_status, render_actions, ActionControl, ApplicationStatus, FundingApplication,
    ReviewAction,
};
use crate::error::{ReviewError, ReviewResult};
use crate::ports::{ApplicationStatusGateway, PermissionChecker};

/// Drives status changes of funding applications.
pub struct ApplicationReviewService {
    permissions: Arc<dyn PermissionChecker>,
    gateway: Arc<dyn ApplicationStatusGateway>,
    events: Arc<dyn EventPublisher>,
    /// References with a status change in flight.
    in_flight: Arc<Mutex<HashSet<String>>>,
}

/// Removes the reference from the in-flight set when dropped.
struct InFlightGuard {
    set: Arc<Mutex<HashSet<String>>>,
    reference: String,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.set.lock().remove(&self.reference);
    }
}

impl ApplicationReviewService {
    pub fn new(
        permissions: Arc<dyn PermissionChecker>,
        gateway: Arc<dyn ApplicationStatusGateway>,
        events: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            permissions,
            gateway,
            events,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Whether a status change for `reference` is in flight.
    pub fn is_updating(&self, reference: &str) -> bool {
        self.in_flight.lock().contains(reference)
    }

    /// Controls to show for `app`, disabled while its update is in flight.
    pub fn actions_for(&self, app: &FundingApplication) -> Vec<ActionControl> {
        render_actions(app.status, self.is_updating(&app.reference))
    }

    fn begin_update(&self, reference: &str) -> ReviewResult<InFlightGuard> {
        let mut set = self.in_flight.lock();
        if !set.insert(reference.to_string()) {
            return Err(ReviewError::UpdateInFlight(reference.to_string()));
        }
        Ok(InFlightGuard {
            set: Arc::clone(&self.in_flight),
            reference: reference.to_string(),
        })
    }

    /// Apply `action` to `app` on behalf of `actor`.
    ///
    /// On success `app.status` holds the new status and a history entry
    /// carrying `note` is appended. On any error `app` is unchanged.
    pub async fn change_status(
        &self,
        app: &mut FundingApplication,
        action: ReviewAction,
        note: Option<String>,
        actor: &Address,
    ) -> ReviewResult<ApplicationStatus> {
        let allowed = self
            .permissions
            .can_write_program(&app.program_id, app.chain_id, actor)
            .await
            .map_err(ReviewError::PermissionCheck)?;
        if !allowed {
            warn!(
                "[gap-01] {} denied review of {} (program {})",
                actor, app.reference, app.program_id
            );
            return Err(ReviewError::PermissionDenied {
                actor: *actor,
                program: app.program_id.clone(),
            });
        }

        let from = app.status;
        let to = next_status(from, action)?;
        let _guard = self.begin_update(&app.reference)?;

        if let Err(err) = self
            .gateway
            .update_status(&app.reference, to, note.as_deref())
            .await
        {
            warn!("[gap-01] Status update of {} failed: {}", app.reference, err);
            self.events
                .publish(GapEvent::Notification {
                    level: NotificationLevel::Error,
                    message: format!("Failed to update application status: {err}"),
                })
                .await;
            return Err(ReviewError::Gateway(err));
        }

        app.record_status(to, note);
        info!("[gap-01] Application {} moved {} -> {}", app.reference, from, to);

        self.events
            .publish(GapEvent::ApplicationStatusChanged {
                reference: app.reference.clone(),
                from: from.to_string(),
                to: to.to_string(),
            })
            .await;
        self.events
            .publish(GapEvent::Notification {
                level: NotificationLevel::Success,
                message: format!("Application status updated to {}", to.as_str().replace('_', " ")),
            })
            .await;

        Ok(to)
    }

    /// Apply the status chosen from a rendered control.
    ///
    /// `target` must be the result of one legal action from the current status.
    pub async fn change_status_to(
        &self,
        app: &mut FundingApplication,
        target: ApplicationStatus,
        note: Option<String>,
        actor: &Address,
    ) -> ReviewResult<ApplicationStatus> {
        let action = render_actions(app.status, false)
            .into_iter()
            .find(|control| control.target == target)
            .map(|control| control.action)
            .ok_or(ReviewError::InvalidTarget {
                from: app.status,
                to: target,
            })?;
        self.change_status(app, action, note, actor).await
    }
}
