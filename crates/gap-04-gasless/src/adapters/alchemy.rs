//! Alchemy Account Kit provider.

use async_trait::async_trait;
use shared_types::ChainId;
use std::sync::Arc;

use super::SponsoredSigner;
use crate::domain::{GaslessClient, GaslessProviderKind};
use crate::error::GaslessError;
use crate::ports::{BundlerTransport, GaslessProvider, LocalSigner, TransactionSigner};

/// Alchemy: one API key, per-network subdomains.
pub struct AlchemyProvider {
    api_key: Option<String>,
    transport: Arc<dyn BundlerTransport>,
}

impl AlchemyProvider {
    pub fn new(api_key: Option<String>, transport: Arc<dyn BundlerTransport>) -> Self {
        Self {
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            transport,
        }
    }

    fn network(chain: ChainId) -> Option<&'static str> {
        match chain {
            ChainId::OPTIMISM => Some("opt-mainnet"),
            ChainId::ARBITRUM => Some("arb-mainnet"),
            ChainId::BASE => Some("base-mainnet"),
            ChainId::CELO => Some("celo-mainnet"),
            ChainId::SEPOLIA => Some("eth-sepolia"),
            ChainId::OPTIMISM_SEPOLIA => Some("opt-sepolia"),
            ChainId::BASE_SEPOLIA => Some("base-sepolia"),
            _ => None,
        }
    }

    pub fn rpc_url(&self, chain: ChainId) -> Result<String, GaslessError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(GaslessError::MissingCredentials(GaslessProviderKind::Alchemy))?;
        let network = Self::network(chain).ok_or(GaslessError::UnsupportedChain {
            provider: GaslessProviderKind::Alchemy,
            chain_id: chain,
        })?;
        Ok(format!("https://{network}.g.alchemy.com/v2/{api_key}"))
    }
}

#[async_trait]
impl GaslessProvider for AlchemyProvider {
    fn kind(&self) -> GaslessProviderKind {
        GaslessProviderKind::Alchemy
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
