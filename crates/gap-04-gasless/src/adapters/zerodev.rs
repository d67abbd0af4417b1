//! ZeroDev provider.

use async_trait::async_trait;
use shared_types::ChainId;
use std::sync::Arc;

use super::SponsoredSigner;
use crate::domain::{GaslessClient, GaslessProviderKind};
use crate::error::GaslessError;
use crate::ports::{BundlerTransport, GaslessProvider, LocalSigner, TransactionSigner};

const ZERODEV_RPC: &str = "https://rpc.zerodev.app/api/v3";

/// ZeroDev: one project id covers every chain.
pub struct ZeroDevProvider {
    project_id: Option<String>,
    transport: Arc<dyn BundlerTransport>,
}

impl ZeroDevProvider {
    pub fn new(project_id: Option<String>, transport: Arc<dyn BundlerTransport>) -> Self {
        Self {
            project_id: project_id.filter(|id| !id.trim().is_empty()),
            transport,
        }
    }

    pub fn rpc_url(&self, chain: ChainId) -> Result<String, GaslessError> {
        let project_id = self
            .project_id
            .as_deref()
            .ok_or(GaslessError::MissingCredentials(GaslessProviderKind::ZeroDev))?;
        Ok(format!("{ZERODEV_RPC}/{project_id}/chain/{chain}"))
    }
}

#[async_trait]
impl GaslessProvider for ZeroDevProvider {
    fn kind(&self) -> GaslessProviderKind {
        GaslessProviderKind::ZeroDev
    }

    async fn create_client(
        &self,
        chain: ChainId,
        owner: Arc<dyn LocalSigner>,
    ) -> Result<GaslessClient, GaslessError> {
        Ok(GaslessClient {
            provider: self.kind(),
            chain_id: chain,
            rpc_url: self.rpc_url(chain)?,
            owner,
        })
    }

    fn to_signer(&self, client: GaslessClient) -> Result<Arc<dyn TransactionSigner>, GaslessError> {
        Ok(Arc::new(SponsoredSigner::new(client, Arc::clone(&self.transport))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MockBundler;

    #[test]
    fn test_rpc_url() {
        let provider = ZeroDevProvider::new(Some("proj-1".into()), Arc::new(MockBundler::new()));
        assert_eq!(
            provider.rpc_url(ChainId::OPTIMISM).unwrap(),
            "https://rpc.zerodev.app/api/v3/proj-1/chain/10"
        );
    }

    #[test]
    fn test_blank_project_id_is_missing() {
        let provider = ZeroDevProvider::new(Some("  ".into()), Arc::new(MockBundler::new()));
        assert_eq!(
            provider.rpc_url(ChainId::BASE),
            Err(GaslessError::MissingCredentials(GaslessProviderKind::ZeroDev))
        );
    }
}
