//! In-memory permission table and status gateway.

use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{Address, ChainId, ProgramId, ReadError, WriteError};
use std::collections::HashSet;
use std::time::Duration;

use crate::domain::ApplicationStatus;
use crate::ports::{ApplicationStatusGateway, PermissionChecker};

/// Grants write permission to an explicit set of (program, chain, actor).
#[derive(Default)]
pub struct MockPermissionChecker {
    grants: RwLock<HashSet<(ProgramId, ChainId, Address)>>,
    unavailable: RwLock<bool>,
}

impl MockPermissionChecker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant(&self, program: ProgramId, chain: ChainId, actor: Address) {
        self.grants.write().insert((program, chain, actor));
    }

    /// Make every lookup fail with a network error.
    pub fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.write() = unavailable;
    }
}

#[async_trait]
impl PermissionChecker for MockPermissionChecker {
    async fn can_write_program(
        &self,
        program: &ProgramId,
        chain: ChainId,
        actor: &Address,
    ) -> Result<bool, ReadError> {
        if *self.unavailable.read() {
            return Err(ReadError::Network("permissions service unavailable".into()));
        }
        Ok(self
            .grants
            .read()
            .contains(&(program.clone(), chain, *actor)))
    }
}

/// Records every accepted status update.
#[derive(Default)]
pub struct MockStatusGateway {
    updates: RwLock<Vec<(String, ApplicationStatus, Option<String>)>>,
    fail_with: RwLock<Option<WriteError>>,
    latency: Option<Duration>,
}

impl MockStatusGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gateway that takes `latency` to answer.
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..Self::default()
        }
    }

    /// Fail every following update with `error`.
    pub fn fail_with(&self, error: WriteError) {
        *self.fail_with.write() = Some(error);
    }

    pub fn updates(&self) -> Vec<(String, ApplicationStatus, Option<String>)> {
        self.updates.read().clone()
    }
}

#[async_trait]
impl ApplicationStatusGateway for MockStatusGateway {
    async fn update_status(
        &self,
        reference: &str,
        status: ApplicationStatus,
        note: Option<&str>,
    ) -> Result<(), WriteError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if let Some(err) = self.fail_with.read().clone() {
            return Err(err);
        }
        self.updates
            .write()
            .push((reference.to_string(), status, note.map(str::to_string)));
        Ok(())
    }
}
