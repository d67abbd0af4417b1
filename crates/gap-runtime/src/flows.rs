//! # Mutation Flows
//!
//! One method per user-facing mutation. Every attestation-backed flow runs
//! the same pipeline:
//!
//! ```text
//!  signer? ──► load project ──► authorize ──► Reconciler::run(
//!                                   │            submit: switch chain + attest / revoke
//!                                   │            poll:   project until the flow predicate holds)
//!                                   ▼                        │
//!                        GapError::Unauthorized              ▼
//!                        (no toast, nothing written)   FlowOutcome (+ warning toast on TimedOut)
//! ```
//!
//! | Flow | Who may run it | Visible when |
//! |------|----------------|--------------|
//! | `post_grant_update` | project owner/admin | grant lists the new update uid |
//! | `complete_milestone` | project owner/admin | milestone completion carries the new uid |
//! | `verify_milestone` | admin of the grant's community | milestone verification carries the new uid |
//! | `post_project_update` | project owner/admin | project lists the new update uid |
//! | `endorse_project` | any connected wallet except the owner | project lists the endorsement uid |
//! | `revoke_member` | project owner/admin | member uid gone |
//! | `delete_objective` | project owner/admin | objective uid gone |
//! | `revoke_grant_completion` | project owner/admin or community admin | grant has no completion |
//!
//! Revokes go on-chain only for the project owner (or community admin for
//! grant completions); everyone else is routed off-chain.

use gap_01_application_review::{ApplicationStatus, FundingApplication, ReviewAction};
use gap_02_reconciliation::{CancelSignal, ReconcileOutcome, ReconcileRequest};
use gap_03_revoke::{RevokeAction, RevokeAuthority, RevokePath, RevokeTarget};
use gap_04_gasless::{GaslessClient, LocalSigner, TransactionSigner};
use gap_telemetry::{GASLESS_CLIENTS, REVOKE_PATHS};
use shared_bus::NotificationLevel;
use shared_types::{Address, AttestationUid, ChainId, EntityKind, TxReceipt, WriteError};
use std::sync::Arc;
use tracing::{info, warn};

use crate::actions::{AttestAction, ProjectRefresh, ProjectSource};
use crate::container::GapContainer;
use crate::error::{GapError, GapResult};
use crate::model::Project;
use crate::ports::AttestationPayload;

/// Mutation kinds, with their labels and messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Flow {
    GrantUpdate,
    MilestoneCompletion,
    MilestoneVerification,
    ProjectUpdate,
    ProjectEndorsement,
    MemberRevoke,
    ObjectiveDelete,
    GrantCompletionRevoke,
}

impl Flow {
    /// Operation label carried by stepper and reconciliation events.
    pub fn operation(&self) -> &'static str {
        match self {
            Self::GrantUpdate => "grant_update",
            Self::MilestoneCompletion => "milestone_completion",
            Self::MilestoneVerification => "milestone_verification",
            Self::ProjectUpdate => "project_update",
            Self::ProjectEndorsement => "project_endorsement",
            Self::MemberRevoke => "member_revoke",
            Self::ObjectiveDelete => "objective_delete",
            Self::GrantCompletionRevoke => "grant_completion_revoke",
        }
    }

    fn subject(&self) -> &'static str {
        match self {
            Self::GrantUpdate => "Grant update",
            Self::MilestoneCompletion => "Milestone completion",
            Self::MilestoneVerification => "Milestone verification",
            Self::ProjectUpdate => "Project update",
            Self::ProjectEndorsement => "Endorsement",
            Self::MemberRevoke => "Member removal",
            Self::ObjectiveDelete => "Objective deletion",
            Self::GrantCompletionRevoke => "Grant completion revocation",
        }
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            Self::GrantUpdate => "Grant update posted successfully!",
            Self::MilestoneCompletion => "Milestone marked as completed!",
            Self::MilestoneVerification => "Milestone verified successfully!",
            Self::ProjectUpdate => "Project update posted successfully!",
            Self::ProjectEndorsement => "Project endorsed successfully!",
            Self::MemberRevoke => "Member removed successfully!",
            Self::ObjectiveDelete => "Objective deleted successfully!",
            Self::GrantCompletionRevoke => "Grant completion revoked successfully!",
        }
    }

    pub fn failure_message(&self) -> &'static str {
        match self {
            Self::GrantUpdate => "Failed to post grant update",
            Self::MilestoneCompletion => "Failed to complete milestone",
            Self::MilestoneVerification => "Failed to verify milestone",
            Self::ProjectUpdate => "Failed to post project update",
            Self::ProjectEndorsement => "Failed to endorse project",
            Self::MemberRevoke => "Failed to remove member",
            Self::ObjectiveDelete => "Failed to delete objective",
            Self::GrantCompletionRevoke => "Failed to revoke grant completion",
        }
    }
}

/// Terminal state of a flow whose write went through.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FlowOutcome {
    Indexed { attempts: u32, receipt: TxReceipt },
    /// Written, but not visible within the attempt cap.
    TimedOut { attempts: u32, receipt: TxReceipt },
    Cancelled { attempts: u32, receipt: TxReceipt },
}

impl FlowOutcome {
    pub fn is_indexed(&self) -> bool {
        matches!(self, Self::Indexed { .. })
    }

    pub fn attempts(&self) -> u32 {
        match self {
            Self::Indexed { attempts, .. }
            | Self::TimedOut { attempts, .. }
            | Self::Cancelled { attempts, .. } => *attempts,
        }
    }

    pub fn receipt(&self) -> &TxReceipt {
        match self {
            Self::Indexed { receipt, .. }
            | Self::TimedOut { receipt, .. }
            | Self::Cancelled { receipt, .. } => receipt,
        }
    }
}

impl From<ReconcileOutcome> for FlowOutcome {
    fn from(outcome: ReconcileOutcome) -> Self {
        match outcome {
            ReconcileOutcome::Indexed { attempts, receipt } => Self::Indexed { attempts, receipt },
            ReconcileOutcome::TimedOut { attempts, receipt } => Self::TimedOut { attempts, receipt },
            ReconcileOutcome::Cancelled { attempts, receipt } => {
                Self::Cancelled { attempts, receipt }
            }
        }
    }
}

/// A created attestation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Posted {
    pub uid: AttestationUid,
    pub outcome: FlowOutcome,
}

/// A completed revocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Revoked {
    pub via: RevokePath,
    /// On-chain attempt failed and off-chain finished the job.
    pub used_fallback: bool,
    pub outcome: FlowOutcome,
}

/// Facade over the container's services.
#[derive(Clone)]
pub struct GapClient {
    container: GapContainer,
}

impl GapClient {
    pub fn new(container: GapContainer) -> Self {
        Self { container }
    }

    pub fn container(&self) -> &GapContainer {
        &self.container
    }

    // =========================================================================
    // ATTESTATIONS
    // =========================================================================

    pub async fn post_grant_update(
        &self,
        project_ref: &str,
        grant_uid: AttestationUid,
        title: impl Into<String>,
        text: impl Into<String>,
        cancel: CancelSignal,
    ) -> GapResult<Posted> {
        let actor = self.signer()?;
        let project = self.load_project(project_ref).await?;
        require_manager(&project, &actor, "post grant updates")?;
        let grant = project
            .grant(&grant_uid)
            .ok_or_else(|| GapError::not_found("grant", grant_uid))?;

        let payload = AttestationPayload::GrantUpdate {
            grant: grant_uid,
            title: title.into(),
            text: text.into(),
        };
        self.attest(
            Flow::GrantUpdate,
            project_ref,
            grant.chain_id,
            payload,
            move |project, uid| project.grant(&grant_uid).is_some_and(|g| g.has_update(uid)),
            cancel,
        )
        .await
    }

    pub async fn complete_milestone(
        &self,
        project_ref: &str,
        grant_uid: AttestationUid,
        milestone_uid: AttestationUid,
        reason: impl Into<String>,
        proof_of_work: Option<String>,
        cancel: CancelSignal,
    ) -> GapResult<Posted> {
        let actor = self.signer()?;
        let project = self.load_project(project_ref).await?;
        require_manager(&project, &actor, "complete milestones")?;
        let grant = project
            .grant(&grant_uid)
            .ok_or_else(|| GapError::not_found("grant", grant_uid))?;
        grant
            .milestone(&milestone_uid)
            .ok_or_else(|| GapError::not_found("milestone", milestone_uid))?;

        let payload = AttestationPayload::MilestoneCompleted {
            grant: grant_uid,
            milestone: milestone_uid,
            reason: reason.into(),
            proof_of_work,
        };
        self.attest(
            Flow::MilestoneCompletion,
            project_ref,
            grant.chain_id,
            payload,
            move |project, uid| {
                milestone_in(project, &grant_uid, &milestone_uid).is_some_and(|m| {
                    m.completion_details
                        .as_ref()
                        .is_some_and(|c| c.uid.as_ref() == Some(uid))
                })
            },
            cancel,
        )
        .await
    }

    pub async fn verify_milestone(
        &self,
        project_ref: &str,
        grant_uid: AttestationUid,
        milestone_uid: AttestationUid,
        reason: impl Into<String>,
        cancel: CancelSignal,
    ) -> GapResult<Posted> {
        let actor = self.signer()?;
        let project = self.load_project(project_ref).await?;
        let grant = project
            .grant(&grant_uid)
            .ok_or_else(|| GapError::not_found("grant", grant_uid))?;

        if !self.is_community_admin(grant.community_uid, &actor).await? {
            return Err(unauthorized(&actor, "verify milestones of this grant"));
        }

        let milestone = grant
            .milestone(&milestone_uid)
            .ok_or_else(|| GapError::not_found("milestone", milestone_uid))?;
        if milestone.completion_details.is_none() {
            return Err(GapError::not_found("milestone completion", milestone_uid));
        }

        let payload = AttestationPayload::MilestoneVerified {
            grant: grant_uid,
            milestone: milestone_uid,
            reason: reason.into(),
        };
        self.attest(
            Flow::MilestoneVerification,
            project_ref,
            grant.chain_id,
            payload,
            move |project, uid| {
                milestone_in(project, &grant_uid, &milestone_uid).is_some_and(|m| {
                    m.verification_details
                        .as_ref()
                        .is_some_and(|v| v.uid.as_ref() == Some(uid))
                })
            },
            cancel,
        )
        .await
    }

    pub async fn post_project_update(
        &self,
        project_ref: &str,
        title: impl Into<String>,
        text: impl Into<String>,
        cancel: CancelSignal,
    ) -> GapResult<Posted> {
        let actor = self.signer()?;
        let project = self.load_project(project_ref).await?;
        require_manager(&project, &actor, "post project updates")?;

        let payload = AttestationPayload::ProjectUpdate {
            project: project.uid,
            title: title.into(),
            text: text.into(),
        };
        self.attest(
            Flow::ProjectUpdate,
            project_ref,
            project.chain_id,
            payload,
            |project, uid| project.has_update(uid),
            cancel,
        )
        .await
    }

    pub async fn endorse_project(
        &self,
        project_ref: &str,
        comment: Option<String>,
        cancel: CancelSignal,
    ) -> GapResult<Posted> {
        let actor = self.signer()?;
        let project = self.load_project(project_ref).await?;
        if project.is_owner(&actor) {
            return Err(unauthorized(&actor, "endorse their own project"));
        }

        let payload = AttestationPayload::ProjectEndorsement {
            project: project.uid,
            comment,
        };
        self.attest(
            Flow::ProjectEndorsement,
            project_ref,
            project.chain_id,
            payload,
            |project, uid| project.has_endorsement(uid),
            cancel,
        )
        .await
    }

    // =========================================================================
    // REVOCATIONS
    // =========================================================================

    pub async fn revoke_member(
        &self,
        project_ref: &str,
        member_uid: AttestationUid,
        cancel: CancelSignal,
    ) -> GapResult<Revoked> {
        let actor = self.signer()?;
        let project = self.load_project(project_ref).await?;
        require_manager(&project, &actor, "remove members")?;
        let member = project
            .member(&member_uid)
            .ok_or_else(|| GapError::not_found("member", member_uid))?;

        let target = RevokeTarget {
            uid: member_uid,
            chain_id: project.chain_id,
            kind: EntityKind::Member,
            attester: member.attester,
        };
        self.revoke(
            Flow::MemberRevoke,
            project_ref,
            target,
            authority(project.is_owner(&actor), actor),
            move |project| project.member(&member_uid).is_none(),
            cancel,
        )
        .await
    }

    pub async fn delete_objective(
        &self,
        project_ref: &str,
        objective_uid: AttestationUid,
        cancel: CancelSignal,
    ) -> GapResult<Revoked> {
        let actor = self.signer()?;
        let project = self.load_project(project_ref).await?;
        require_manager(&project, &actor, "delete objectives")?;
        let objective = project
            .objective(&objective_uid)
            .ok_or_else(|| GapError::not_found("objective", objective_uid))?;

        let target = RevokeTarget {
            uid: objective_uid,
            chain_id: project.chain_id,
            kind: EntityKind::ProjectObjective,
            attester: objective.attester,
        };
        self.revoke(
            Flow::ObjectiveDelete,
            project_ref,
            target,
            authority(project.is_owner(&actor), actor),
            move |project| project.objective(&objective_uid).is_none(),
            cancel,
        )
        .await
    }

    pub async fn revoke_grant_completion(
        &self,
        project_ref: &str,
        grant_uid: AttestationUid,
        cancel: CancelSignal,
    ) -> GapResult<Revoked> {
        let actor = self.signer()?;
        let project = self.load_project(project_ref).await?;
        let grant = project
            .grant(&grant_uid)
            .ok_or_else(|| GapError::not_found("grant", grant_uid))?;

        let community_admin = self.is_community_admin(grant.community_uid, &actor).await?;
        if !community_admin && !project.can_manage(&actor) {
            return Err(unauthorized(&actor, "revoke this grant completion"));
        }
        let completion = grant
            .completed
            .as_ref()
            .ok_or_else(|| GapError::not_found("grant completion", grant_uid))?;

        let target = RevokeTarget {
            uid: completion.uid,
            chain_id: grant.chain_id,
            kind: EntityKind::GrantCompletion,
            attester: completion.attester,
        };
        self.revoke(
            Flow::GrantCompletionRevoke,
            project_ref,
            target,
            authority(community_admin || project.is_owner(&actor), actor),
            move |project| {
                project
                    .grant(&grant_uid)
                    .is_some_and(|g| g.completed.is_none())
            },
            cancel,
        )
        .await
    }

    // =========================================================================
    // APPLICATION REVIEW
    // =========================================================================

    /// Apply a review action to an application loaded from the indexer.
    pub async fn change_application_status(
        &self,
        reference: &str,
        action: ReviewAction,
        note: Option<String>,
    ) -> GapResult<FundingApplication> {
        let actor = self.signer()?;
        let mut application = self.container.ports.indexer.application(reference).await?;
        self.container
            .review
            .change_status(&mut application, action, note, &actor)
            .await?;
        Ok(application)
    }

    /// Move an application to the status of one of its rendered controls.
    pub async fn change_application_status_to(
        &self,
        reference: &str,
        target: ApplicationStatus,
        note: Option<String>,
    ) -> GapResult<FundingApplication> {
        let actor = self.signer()?;
        let mut application = self.container.ports.indexer.application(reference).await?;
        self.container
            .review
            .change_status_to(&mut application, target, note, &actor)
            .await?;
        Ok(application)
    }

    // =========================================================================
    // GASLESS
    // =========================================================================

    /// Sponsored client for `chain`; `None` when gasless is off there.
    pub async fn gasless_client(
        &self,
        chain: ChainId,
        owner: Arc<dyn LocalSigner>,
    ) -> GapResult<Option<GaslessClient>> {
        let provider = self.provider_label(chain);
        match self.container.gasless.create_client(chain, owner).await {
            Ok(Some(client)) => {
                GASLESS_CLIENTS.with_label_values(&[provider, "created"]).inc();
                Ok(Some(client))
            }
            Ok(None) => {
                GASLESS_CLIENTS.with_label_values(&[provider, "disabled"]).inc();
                Ok(None)
            }
            Err(err) => {
                GASLESS_CLIENTS.with_label_values(&[provider, "failed"]).inc();
                Err(err.into())
            }
        }
    }

    /// Sponsored transaction signer for `chain`.
    pub async fn sponsored_signer(
        &self,
        chain: ChainId,
        owner: Arc<dyn LocalSigner>,
    ) -> GapResult<Arc<dyn TransactionSigner>> {
        let provider = self.provider_label(chain);
        match self.container.gasless.get_signer(chain, owner).await {
            Ok(signer) => {
                GASLESS_CLIENTS.with_label_values(&[provider, "created"]).inc();
                Ok(signer)
            }
            Err(err) => {
                warn!("[gap-runtime] No sponsored signer for chain {}: {}", chain, err);
                GASLESS_CLIENTS.with_label_values(&[provider, "failed"]).inc();
                Err(err.into())
            }
        }
    }

    fn provider_label(&self, chain: ChainId) -> &'static str {
        self.container
            .gasless
            .provider_for(chain)
            .map_or("none", |kind| kind.as_str())
    }

    // =========================================================================
    // PIPELINE
    // =========================================================================

    fn signer(&self) -> GapResult<Address> {
        self.container
            .ports
            .wallet
            .signer_address()
            .ok_or(GapError::NoSigner)
    }

    async fn load_project(&self, reference: &str) -> GapResult<Project> {
        let generation = self.container.stores.next_generation();
        let project = self.container.ports.indexer.project(reference).await?;
        self.container
            .stores
            .cache_project(reference, generation, project.clone());
        Ok(project)
    }

    async fn is_community_admin(
        &self,
        community: Option<AttestationUid>,
        actor: &Address,
    ) -> GapResult<bool> {
        match community {
            Some(community) => Ok(self
                .container
                .ports
                .indexer
                .is_community_admin(&community, actor)
                .await?),
            None => Ok(false),
        }
    }

    fn request(&self, flow: Flow, project_ref: &str) -> ReconcileRequest {
        self.container
            .reconciler
            .request(flow.operation(), flow.success_message())
            .with_failure_message(flow.failure_message())
            .with_refresh(Arc::new(ProjectRefresh::new(
                Arc::clone(&self.container.ports.indexer),
                Arc::clone(&self.container.stores),
                project_ref,
            )))
    }

    async fn attest<F>(
        &self,
        flow: Flow,
        project_ref: &str,
        chain: ChainId,
        payload: AttestationPayload,
        visible: F,
        cancel: CancelSignal,
    ) -> GapResult<Posted>
    where
        F: Fn(&Project, &AttestationUid) -> bool + Send + Sync,
    {
        let action = AttestAction::new(
            Arc::clone(&self.container.ports.attestations),
            Arc::clone(&self.container.ports.wallet),
            chain,
            payload,
        );
        let source = ProjectSource::new(Arc::clone(&self.container.ports.indexer), project_ref);

        let outcome = self
            .container
            .reconciler
            .run(
                self.request(flow, project_ref),
                &action,
                &source,
                |project: &Project| action.uid().is_some_and(|uid| visible(project, &uid)),
                cancel,
            )
            .await?;

        let uid = action.uid().ok_or_else(|| {
            GapError::Write(WriteError::Transaction(
                "attestation returned no uid".into(),
            ))
        })?;
        Ok(Posted {
            uid,
            outcome: self.settle(flow, outcome).await,
        })
    }

    async fn revoke<F>(
        &self,
        flow: Flow,
        project_ref: &str,
        target: RevokeTarget,
        authority: RevokeAuthority,
        gone: F,
        cancel: CancelSignal,
    ) -> GapResult<Revoked>
    where
        F: Fn(&Project) -> bool + Send + Sync,
    {
        let kind = target.kind;
        let action = RevokeAction::new(Arc::clone(&self.container.revoke), target, authority);
        let source = ProjectSource::new(Arc::clone(&self.container.ports.indexer), project_ref);

        let result = self
            .container
            .reconciler
            .run(self.request(flow, project_ref), &action, &source, gone, cancel)
            .await;

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(err) => {
                REVOKE_PATHS.with_label_values(&[kind.as_str(), "failed"]).inc();
                return Err(match action.last_result() {
                    Some(Err(revoke_err)) => GapError::Revoke(revoke_err),
                    _ => GapError::Reconcile(err),
                });
            }
        };

        let (via, used_fallback) = match action.last_result() {
            Some(Ok(report)) => (report.via, report.used_fallback()),
            _ if outcome.receipt().is_on_chain() => (RevokePath::OnChain, false),
            _ => (RevokePath::OffChain, false),
        };
        REVOKE_PATHS.with_label_values(&[kind.as_str(), via.as_str()]).inc();

        Ok(Revoked {
            via,
            used_fallback,
            outcome: self.settle(flow, outcome).await,
        })
    }

    /// Map the reconcile outcome, warning the user when indexing lagged out.
    async fn settle(&self, flow: Flow, outcome: ReconcileOutcome) -> FlowOutcome {
        if let ReconcileOutcome::TimedOut { attempts, .. } = &outcome {
            info!(
                "[gap-runtime] {} not indexed after {} attempts",
                flow.operation(),
                attempts
            );
            self.container
                .notifier
                .notify(
                    NotificationLevel::Warning,
                    &format!(
                        "{} was submitted but is not indexed yet. It will appear once the indexer catches up.",
                        flow.subject()
                    ),
                )
                .await;
        }
        outcome.into()
    }
}

fn authority(on_chain_authorized: bool, signer: Address) -> RevokeAuthority {
    RevokeAuthority {
        on_chain_authorized,
        signer: Some(signer),
    }
}

fn unauthorized(actor: &Address, what: &str) -> GapError {
    warn!("[gap-runtime] {} may not {}", actor, what);
    GapError::Unauthorized(format!("you may not {}", what))
}

fn require_manager(project: &Project, actor: &Address, what: &str) -> GapResult<()> {
    if project.can_manage(actor) {
        Ok(())
    } else {
        Err(unauthorized(
            actor,
            &format!("{} (project owners and admins only)", what),
        ))
    }
}

fn milestone_in<'a>(
    project: &'a Project,
    grant: &AttestationUid,
    milestone: &AttestationUid,
) -> Option<&'a gap_01_application_review::Milestone> {
    project.grant(grant).and_then(|g| g.milestone(milestone))
}
