//! # In-Memory Adapters
//!
//! An indexer that lags behind writes by a configurable number of reads, and
//! wallet / attestation doubles that feed it. Together they let a flow run
//! end to end without a chain or a network.

use async_trait::async_trait;
use gap_01_application_review::{
    FundingApplication, MilestoneCompletion, MilestoneVerification,
};
use gap_02_reconciliation::StepReporter;
use gap_03_revoke::{OffChainRevoker, RevokeTarget};
use parking_lot::{Mutex, RwLock};
use shared_types::{
    Address, AttestationUid, ChainId, ReadError, StepStatus, TxHash, TxReceipt, WriteError,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::model::{Endorsement, Project, Update};
use crate::ports::{AttestationPayload, AttestationWriter, Attested, IndexerReader, WalletSession};

type Mutation = Box<dyn FnOnce(&mut Project) + Send>;

struct Staged {
    reference: String,
    reads_left: u32,
    apply: Mutation,
}

/// Indexer double with eventual consistency.
///
/// A staged mutation becomes visible on the `lag + 1`-th project read after
/// it was staged.
#[derive(Default)]
pub struct InMemoryIndexer {
    projects: RwLock<HashMap<String, Project>>,
    staged: Mutex<Vec<Staged>>,
    applications: RwLock<HashMap<String, FundingApplication>>,
    community_admins: RwLock<HashMap<AttestationUid, Vec<Address>>>,
    lag: AtomicU32,
    failing_reads: AtomicU32,
    reads: AtomicUsize,
}

impl InMemoryIndexer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads that still return the old state after each write.
    pub fn with_lag(self, reads: u32) -> Self {
        self.lag.store(reads, Ordering::SeqCst);
        self
    }

    pub fn insert_project(&self, reference: impl Into<String>, project: Project) {
        self.projects.write().insert(reference.into(), project);
    }

    pub fn insert_application(&self, application: FundingApplication) {
        self.applications
            .write()
            .insert(application.reference.clone(), application);
    }

    pub fn add_community_admin(&self, community: AttestationUid, admin: Address) {
        self.community_admins
            .write()
            .entry(community)
            .or_default()
            .push(admin);
    }

    /// Queue `apply` against `reference`, visible after the configured lag.
    pub fn stage(&self, reference: &str, apply: impl FnOnce(&mut Project) + Send + 'static) {
        self.staged.lock().push(Staged {
            reference: reference.to_string(),
            reads_left: self.lag.load(Ordering::SeqCst),
            apply: Box::new(apply),
        });
    }

    /// Make the next `n` project reads fail with a network error.
    pub fn fail_next_reads(&self, n: u32) {
        self.failing_reads.store(n, Ordering::SeqCst);
    }

    /// Project reads served so far, failed ones included.
    pub fn project_reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Current committed state, bypassing lag and read accounting.
    pub fn snapshot(&self, reference: &str) -> Option<Project> {
        self.projects.read().get(reference).cloned()
    }

    fn settle(&self, reference: &str) {
        let mut due = Vec::new();
        {
            let mut staged = self.staged.lock();
            let mut i = 0;
            while i < staged.len() {
                if staged[i].reference != reference {
                    i += 1;
                } else if staged[i].reads_left == 0 {
                    due.push(staged.remove(i));
                } else {
                    staged[i].reads_left -= 1;
                    i += 1;
                }
            }
        }

        if due.is_empty() {
            return;
        }
        let mut projects = self.projects.write();
        if let Some(project) = projects.get_mut(reference) {
            for mutation in due {
                (mutation.apply)(project);
            }
        }
    }
}

#[async_trait]
impl IndexerReader for InMemoryIndexer {
    async fn project(&self, reference: &str) -> Result<Project, ReadError> {
        self.reads.fetch_add(1, Ordering::SeqCst);

        let failing = self.failing_reads.load(Ordering::SeqCst);
        if failing > 0 {
            self.failing_reads.store(failing - 1, Ordering::SeqCst);
            return Err(ReadError::Network("indexer unreachable".into()));
        }

        self.settle(reference);
        self.projects
            .read()
            .get(reference)
            .cloned()
            .ok_or_else(|| ReadError::NotFound(reference.to_string()))
    }

    async fn application(&self, reference: &str) -> Result<FundingApplication, ReadError> {
        self.applications
            .read()
            .get(reference)
            .cloned()
            .ok_or_else(|| ReadError::NotFound(reference.to_string()))
    }

    async fn is_community_admin(
        &self,
        community: &AttestationUid,
        actor: &Address,
    ) -> Result<bool, ReadError> {
        Ok(self
            .community_admins
            .read()
            .get(community)
            .is_some_and(|admins| admins.contains(actor)))
    }
}

/// Apply a freshly created attestation to the project aggregate.
pub fn apply_attestation(
    project: &mut Project,
    payload: &AttestationPayload,
    uid: AttestationUid,
    attester: Address,
) {
    match payload {
        AttestationPayload::GrantUpdate { grant, title, text } => {
            if let Some(grant) = project.grants.iter_mut().find(|g| &g.uid == grant) {
                grant.updates.push(Update {
                    uid,
                    title: title.clone(),
                    text: text.clone(),
                    created_at: None,
                });
            }
        }
        AttestationPayload::MilestoneCompleted {
            milestone,
            reason,
            proof_of_work,
            ..
        } => {
            if let Some(m) = find_milestone(project, milestone) {
                m.completion_details = Some(MilestoneCompletion {
                    uid: Some(uid),
                    attester: Some(attester),
                    reason: Some(reason.clone()),
                    proof_of_work: proof_of_work.clone(),
                    created_at: None,
                });
            }
        }
        AttestationPayload::MilestoneVerified {
            milestone, reason, ..
        } => {
            if let Some(m) = find_milestone(project, milestone) {
                m.verification_details = Some(MilestoneVerification {
                    uid: Some(uid),
                    attester: Some(attester),
                    reason: Some(reason.clone()),
                    created_at: None,
                });
            }
        }
        AttestationPayload::ProjectUpdate { title, text, .. } => project.updates.push(Update {
            uid,
            title: title.clone(),
            text: text.clone(),
            created_at: None,
        }),
        AttestationPayload::ProjectEndorsement { comment, .. } => {
            project.endorsements.push(Endorsement {
                uid,
                endorser: attester,
                comment: comment.clone(),
            })
        }
    }
}

fn find_milestone<'a>(
    project: &'a mut Project,
    uid: &AttestationUid,
) -> Option<&'a mut gap_01_application_review::Milestone> {
    project
        .grants
        .iter_mut()
        .flat_map(|g| g.milestones.iter_mut())
        .find(|m| m.uid.as_ref() == Some(uid))
}

/// Remove every entity backed by `uid` from the aggregate.
pub fn remove_attestation(project: &mut Project, uid: &AttestationUid) {
    project.members.retain(|m| &m.uid != uid);
    project.objectives.retain(|o| &o.uid != uid);
    project.updates.retain(|u| &u.uid != uid);
    project.endorsements.retain(|e| &e.uid != uid);
    for grant in &mut project.grants {
        if grant.completed.as_ref().is_some_and(|c| &c.uid == uid) {
            grant.completed = None;
        }
        grant.updates.retain(|u| &u.uid != uid);
    }
}

/// Wallet double.
pub struct MockWallet {
    address: Option<Address>,
    chain: Mutex<ChainId>,
    switch_error: Mutex<Option<WriteError>>,
    /// Chain the wallet lands on after a "successful" switch, if not the target.
    land_on: Mutex<Option<ChainId>>,
    switches: AtomicUsize,
}

impl MockWallet {
    pub fn connected(address: Address, chain: ChainId) -> Self {
        Self {
            address: Some(address),
            chain: Mutex::new(chain),
            switch_error: Mutex::new(None),
            land_on: Mutex::new(None),
            switches: AtomicUsize::new(0),
        }
    }

    pub fn disconnected() -> Self {
        Self {
            address: None,
            ..Self::connected(Address::default(), ChainId::OPTIMISM)
        }
    }

    pub fn fail_switch_with(&self, error: WriteError) {
        *self.switch_error.lock() = Some(error);
    }

    /// Report success on switch but stay on `chain`.
    pub fn land_on(&self, chain: ChainId) {
        *self.land_on.lock() = Some(chain);
    }

    pub fn switches(&self) -> usize {
        self.switches.load(Ordering::SeqCst)
    }

    pub fn current_chain(&self) -> ChainId {
        *self.chain.lock()
    }
}

#[async_trait]
impl WalletSession for MockWallet {
    async fn chain_id(&self) -> Result<ChainId, WriteError> {
        Ok(*self.chain.lock())
    }

    async fn switch_chain(&self, chain: ChainId) -> Result<(), WriteError> {
        self.switches.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.switch_error.lock().clone() {
            return Err(err);
        }
        *self.chain.lock() = self.land_on.lock().unwrap_or(chain);
        Ok(())
    }

    fn signer_address(&self) -> Option<Address> {
        self.address
    }
}

/// Attestation SDK double.
///
/// When linked to an [`InMemoryIndexer`], every successful write is staged
/// against the linked project so polling eventually observes it.
pub struct MockAttestationWriter {
    attester: Address,
    indexer: Option<(Arc<InMemoryIndexer>, String)>,
    error: Mutex<Option<WriteError>>,
    next_uid: AtomicU64,
    attested: Mutex<Vec<(ChainId, AttestationPayload)>>,
    revoked: Mutex<Vec<(ChainId, Vec<AttestationUid>)>>,
}

impl MockAttestationWriter {
    pub fn new(attester: Address) -> Self {
        Self {
            attester,
            indexer: None,
            error: Mutex::new(None),
            next_uid: AtomicU64::new(1),
            attested: Mutex::new(Vec::new()),
            revoked: Mutex::new(Vec::new()),
        }
    }

    pub fn indexing_into(mut self, indexer: Arc<InMemoryIndexer>, reference: impl Into<String>) -> Self {
        self.indexer = Some((indexer, reference.into()));
        self
    }

    pub fn fail_with(&self, error: WriteError) {
        *self.error.lock() = Some(error);
    }

    pub fn attested(&self) -> Vec<(ChainId, AttestationPayload)> {
        self.attested.lock().clone()
    }

    pub fn revoked(&self) -> Vec<(ChainId, Vec<AttestationUid>)> {
        self.revoked.lock().clone()
    }

    fn mint(&self) -> (AttestationUid, TxHash) {
        let n = self.next_uid.fetch_add(1, Ordering::SeqCst);
        let mut uid = [0xa7u8; 32];
        uid[24..].copy_from_slice(&n.to_be_bytes());
        let mut hash = [0x7au8; 32];
        hash[24..].copy_from_slice(&n.to_be_bytes());
        (AttestationUid(uid), TxHash(hash))
    }

    fn check(&self) -> Result<(), WriteError> {
        match self.error.lock().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl AttestationWriter for MockAttestationWriter {
    async fn attest(
        &self,
        chain: ChainId,
        payload: &AttestationPayload,
        steps: &StepReporter,
    ) -> Result<Attested, WriteError> {
        self.check()?;
        steps.set(StepStatus::Pending).await;

        let (uid, hash) = self.mint();
        self.attested.lock().push((chain, payload.clone()));

        if let Some((indexer, reference)) = &self.indexer {
            let payload = payload.clone();
            let attester = self.attester;
            indexer.stage(reference, move |project| {
                apply_attestation(project, &payload, uid, attester)
            });
        }

        Ok(Attested {
            uid,
            receipt: TxReceipt::single(hash),
        })
    }

    async fn revoke(
        &self,
        chain: ChainId,
        uids: &[AttestationUid],
        steps: &StepReporter,
    ) -> Result<TxReceipt, WriteError> {
        self.check()?;
        steps.set(StepStatus::Pending).await;

        let (_, hash) = self.mint();
        self.revoked.lock().push((chain, uids.to_vec()));

        if let Some((indexer, reference)) = &self.indexer {
            let uids = uids.to_vec();
            indexer.stage(reference, move |project| {
                for uid in &uids {
                    remove_attestation(project, uid);
                }
            });
        }

        Ok(TxReceipt::single(hash))
    }
}

/// Off-chain revoke backend double that stages removals into an indexer.
pub struct InMemoryOffChainRevoker {
    indexer: Arc<InMemoryIndexer>,
    reference: String,
    error: Mutex<Option<WriteError>>,
    calls: AtomicUsize,
}

impl InMemoryOffChainRevoker {
    pub fn new(indexer: Arc<InMemoryIndexer>, reference: impl Into<String>) -> Self {
        Self {
            indexer,
            reference: reference.into(),
            error: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn fail_with(&self, error: WriteError) {
        *self.error.lock() = Some(error);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OffChainRevoker for InMemoryOffChainRevoker {
    async fn revoke(&self, target: &RevokeTarget) -> Result<(), WriteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.error.lock().clone() {
            return Err(err);
        }
        let uid = target.uid;
        self.indexer
            .stage(&self.reference, move |project| remove_attestation(project, &uid));
        Ok(())
    }
}
