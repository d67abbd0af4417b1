//! Writes and read paths plugged into the reconciler.

use async_trait::async_trait;
use gap_02_reconciliation::{AggregateSource, BackgroundRefresh, StepReporter, WriteAction};
use parking_lot::Mutex;
use shared_types::{AttestationUid, ChainId, ReadError, TxReceipt, WriteError};
use std::sync::Arc;
use tracing::debug;

use crate::model::Project;
use crate::ports::{ensure_chain, AttestationPayload, AttestationWriter, IndexerReader, WalletSession};
use crate::store::SessionStores;

/// Latest project aggregate from the indexer.
pub struct ProjectSource {
    indexer: Arc<dyn IndexerReader>,
    reference: String,
}

impl ProjectSource {
    pub fn new(indexer: Arc<dyn IndexerReader>, reference: impl Into<String>) -> Self {
        Self {
            indexer,
            reference: reference.into(),
        }
    }
}

#[async_trait]
impl AggregateSource<Project> for ProjectSource {
    async fn fetch(&self) -> Result<Project, ReadError> {
        self.indexer.project(&self.reference).await
    }
}

/// Re-fetches a project into the session cache.
pub struct ProjectRefresh {
    indexer: Arc<dyn IndexerReader>,
    stores: Arc<SessionStores>,
    reference: String,
}

impl ProjectRefresh {
    pub fn new(
        indexer: Arc<dyn IndexerReader>,
        stores: Arc<SessionStores>,
        reference: impl Into<String>,
    ) -> Self {
        Self {
            indexer,
            stores,
            reference: reference.into(),
        }
    }
}

#[async_trait]
impl BackgroundRefresh for ProjectRefresh {
    async fn refresh(&self) -> Result<(), ReadError> {
        let generation = self.stores.next_generation();
        let project = self.indexer.project(&self.reference).await?;
        if !self.stores.cache_project(&self.reference, generation, project) {
            debug!("[gap-runtime] Dropped stale refresh of {}", self.reference);
        }
        Ok(())
    }
}

/// Switch the wallet to `chain` and create one attestation there.
///
/// The new uid is kept for the visibility predicate.
pub struct AttestAction {
    writer: Arc<dyn AttestationWriter>,
    wallet: Arc<dyn WalletSession>,
    chain: ChainId,
    payload: AttestationPayload,
    uid: Mutex<Option<AttestationUid>>,
}

impl AttestAction {
    pub fn new(
        writer: Arc<dyn AttestationWriter>,
        wallet: Arc<dyn WalletSession>,
        chain: ChainId,
        payload: AttestationPayload,
    ) -> Self {
        Self {
            writer,
            wallet,
            chain,
            payload,
            uid: Mutex::new(None),
        }
    }

    /// Uid of the created attestation, once submitted.
    pub fn uid(&self) -> Option<AttestationUid> {
        *self.uid.lock()
    }
}

#[async_trait]
impl WriteAction for AttestAction {
    async fn submit(&self, steps: &StepReporter) -> Result<TxReceipt, WriteError> {
        ensure_chain(self.wallet.as_ref(), self.chain).await?;
        let attested = self.writer.attest(self.chain, &self.payload, steps).await?;
        *self.uid.lock() = Some(attested.uid);
        Ok(attested.receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryIndexer, MockAttestationWriter, MockWallet};
    use shared_types::Address;

    fn project() -> Project {
        Project {
            uid: AttestationUid([1; 32]),
            chain_id: ChainId::OPTIMISM,
            owner: Address([0xaa; 20]),
            admins: vec![],
            members: vec![],
            grants: vec![],
            updates: vec![],
            endorsements: vec![],
            objectives: vec![],
        }
    }

    #[tokio::test]
    async fn test_attest_action_records_uid() {
        let writer = Arc::new(MockAttestationWriter::new(Address([0xaa; 20])));
        let wallet = Arc::new(MockWallet::connected(Address([0xaa; 20]), ChainId::BASE));
        let action = AttestAction::new(
            writer.clone(),
            wallet.clone(),
            ChainId::OPTIMISM,
            AttestationPayload::ProjectUpdate {
                project: AttestationUid([1; 32]),
                title: "Hello".into(),
                text: "World".into(),
            },
        );
        assert!(action.uid().is_none());
        action
            .submit(&StepReporter::detached("project_update"))
            .await
            .unwrap();
        assert!(action.uid().is_some());
        assert_eq!(wallet.current_chain(), ChainId::OPTIMISM);
        assert_eq!(writer.attested()[0].0, ChainId::OPTIMISM);
    }

    #[tokio::test]
    async fn test_attest_action_wrong_chain_writes_nothing() {
        let writer = Arc::new(MockAttestationWriter::new(Address([0xaa; 20])));
        let wallet = Arc::new(MockWallet::connected(Address([0xaa; 20]), ChainId::BASE));
        wallet.land_on(ChainId::BASE);
        let action = AttestAction::new(
            writer.clone(),
            wallet,
            ChainId::CELO,
            AttestationPayload::ProjectEndorsement {
                project: AttestationUid([1; 32]),
                comment: None,
            },
        );

        let err = action
            .submit(&StepReporter::detached("project_endorsement"))
            .await
            .unwrap_err();
        assert!(matches!(err, WriteError::WrongChain { .. }));
        assert!(writer.attested().is_empty());
        assert!(action.uid().is_none());
    }

    #[tokio::test]
    async fn test_refresh_fills_cache() {
        let indexer = Arc::new(InMemoryIndexer::new());
        indexer.insert_project("karma", project());
        let stores = Arc::new(SessionStores::new());
        let refresh = ProjectRefresh::new(indexer, stores.clone(), "karma");

        refresh.refresh().await.unwrap();
        assert_eq!(stores.cached_project("karma"), Some(project()));
    }

    #[tokio::test]
    async fn test_source_reads_project() {
        let indexer = Arc::new(InMemoryIndexer::new());
        indexer.insert_project("karma", project());
        let source = ProjectSource::new(indexer.clone(), "karma");
        assert_eq!(source.fetch().await.unwrap().uid, AttestationUid([1; 32]));
        assert_eq!(indexer.project_reads(), 1);
    }
}
