//! Gasless Router - strategy dispatch over the provider table.

use parking_lot::RwLock;
use shared_types::ChainId;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::{GaslessClient, GaslessProviderKind, GaslessTable};
use crate::error::{GaslessError, GaslessResult};
use crate::ports::{GaslessProvider, LocalSigner, TransactionSigner};

/// Chooses a provider per chain and builds sponsored clients/signers.
pub struct GaslessRouter {
    table: RwLock<GaslessTable>,
    providers: HashMap<GaslessProviderKind, Arc<dyn GaslessProvider>>,
}

impl GaslessRouter {
    pub fn new(table: GaslessTable) -> Self {
        Self {
            table: RwLock::new(table),
            providers: HashMap::new(),
        }
    }

    /// Register a provider strategy under its own kind.
    pub fn register(mut self, provider: Arc<dyn GaslessProvider>) -> Self {
        self.providers.insert(provider.kind(), provider);
        self
    }

    pub fn table(&self) -> GaslessTable {
        self.table.read().clone()
    }

    pub fn disable(&self, chain: ChainId) {
        self.table.write().disable(chain);
    }

    pub fn is_enabled(&self, chain: ChainId) -> bool {
        self.table.read().enabled_provider(chain).is_some()
    }

    /// Provider kind for `chain`, `None` when absent or disabled.
    pub fn provider_for(&self, chain: ChainId) -> Option<GaslessProviderKind> {
        self.table.read().enabled_provider(chain)
    }

    fn strategy(&self, kind: GaslessProviderKind) -> GaslessResult<&Arc<dyn GaslessProvider>> {
        self.providers
            .get(&kind)
            .ok_or(GaslessError::NotRegistered(kind))
    }

    /// Build a sponsored client for `chain`.
    ///
    /// Absent or disabled chains yield `Ok(None)` with a warning. Provider
    /// failures are returned as-is.
    pub async fn create_client(
        &self,
        chain: ChainId,
        owner: Arc<dyn LocalSigner>,
    ) -> GaslessResult<Option<GaslessClient>> {
        let Some(kind) = self.provider_for(chain) else {
            warn!("[gap-04] Gasless not enabled for chain {}", chain);
            return Ok(None);
        };

        let client = self.strategy(kind)?.create_client(chain, owner).await?;
        debug!("[gap-04] Created {} client for chain {}", kind, chain);
        Ok(Some(client))
    }

    /// Sponsored signer for `chain`.
    ///
    /// Every failure is a `ProviderError`. The provider is `None` only when
    /// the chain is absent from the table.
    pub async fn get_signer(
        &self,
        chain: ChainId,
        owner: Arc<dyn LocalSigner>,
    ) -> GaslessResult<Arc<dyn TransactionSigner>> {
        let kind = self.provider_for(chain).ok_or_else(|| GaslessError::ProviderError {
            provider: self.table.read().get(chain).map(|config| config.provider),
            chain_id: chain,
            original: None,
        })?;

        let wrap = |err: GaslessError| GaslessError::ProviderError {
            provider: Some(kind),
            chain_id: chain,
            original: Some(err.to_string()),
        };

        let strategy = self.strategy(kind).map_err(wrap)?;
        let client = strategy.create_client(chain, owner).await.map_err(wrap)?;
        strategy.to_signer(client).map_err(wrap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{AlchemyProvider, MockBundler, MockLocalSigner, ZeroDevProvider};
    use crate::domain::{ChainGaslessConfig, SponsoredCall};
    use shared_types::{Address, WriteError};

    fn owner() -> Arc<dyn LocalSigner> {
        Arc::new(MockLocalSigner::new(
            Address::from_hex(&"77".repeat(20)).unwrap(),
        ))
    }

    fn router(bundler: Arc<MockBundler>) -> GaslessRouter {
        GaslessRouter::new(GaslessTable::default())
            .register(Arc::new(ZeroDevProvider::new(Some("proj".into()), bundler.clone())))
            .register(Arc::new(AlchemyProvider::new(Some("key".into()), bundler)))
    }

    #[tokio::test]
    async fn test_absent_chain_client_is_none() {
        let router = router(Arc::new(MockBundler::new()));
        assert!(router.create_client(ChainId::SEI, owner()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_disabled_chain_client_is_none_but_signer_errors() {
        let router = router(Arc::new(MockBundler::new()));
        router.disable(ChainId::OPTIMISM);

        assert!(router
            .create_client(ChainId::OPTIMISM, owner())
            .await
            .unwrap()
            .is_none());

        let err = router.get_signer(ChainId::OPTIMISM, owner()).await.err().unwrap();
        assert_eq!(
            err,
            GaslessError::ProviderError {
                provider: Some(GaslessProviderKind::ZeroDev),
                chain_id: ChainId::OPTIMISM,
                original: None,
            }
        );
    }

    #[tokio::test]
    async fn test_signer_error_names_provider_only_for_listed_chains() {
        let router = router(Arc::new(MockBundler::new()));

        // Lisk ships disabled but mapped to Alchemy.
        let lisk = router.get_signer(ChainId::LISK, owner()).await.err().unwrap();
        assert_eq!(
            lisk,
            GaslessError::ProviderError {
                provider: Some(GaslessProviderKind::Alchemy),
                chain_id: ChainId::LISK,
                original: None,
            }
        );

        let sei = router.get_signer(ChainId::SEI, owner()).await.err().unwrap();
        assert_eq!(
            sei,
            GaslessError::ProviderError {
                provider: None,
                chain_id: ChainId::SEI,
                original: None,
            }
        );
    }

    #[tokio::test]
    async fn test_dispatch_by_table() {
        let router = router(Arc::new(MockBundler::new()));
        let zerodev = router.create_client(ChainId::BASE, owner()).await.unwrap().unwrap();
        let alchemy = router.create_client(ChainId::CELO, owner()).await.unwrap().unwrap();
        assert_eq!(zerodev.provider, GaslessProviderKind::ZeroDev);
        assert_eq!(alchemy.provider, GaslessProviderKind::Alchemy);
        assert!(alchemy.rpc_url.starts_with("https://celo-mainnet"));
    }

    #[tokio::test]
    async fn test_signer_sends_through_bundler() {
        let bundler = Arc::new(MockBundler::new());
        let router = router(bundler.clone());
        let signer = router.get_signer(ChainId::ARBITRUM, owner()).await.unwrap();

        assert_eq!(signer.chain_id(), ChainId::ARBITRUM);
        signer
            .send_transaction(SponsoredCall {
                to: Address::from_hex(&"01".repeat(20)).unwrap(),
                data: vec![1, 2, 3],
                value: 0,
            })
            .await
            .unwrap();

        let sent = bundler.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].0.ends_with("/chain/42161"));
    }

    #[tokio::test]
    async fn test_bundler_failure_surfaces_unchanged() {
        let bundler = Arc::new(MockBundler::new());
        bundler.fail_with(WriteError::Network("connection refused".into()));
        let router = router(bundler);
        let signer = router.get_signer(ChainId::BASE, owner()).await.unwrap();

        let err = signer.send_transaction(SponsoredCall::default()).await.unwrap_err();
        assert_eq!(err, WriteError::Network("connection refused".into()));
    }

    #[tokio::test]
    async fn test_missing_credentials_wrapped_in_provider_error() {
        let bundler = Arc::new(MockBundler::new());
        let router = GaslessRouter::new(GaslessTable::default())
            .register(Arc::new(ZeroDevProvider::new(None, bundler)));

        let err = router.get_signer(ChainId::BASE, owner()).await.err().unwrap();
        match err {
            GaslessError::ProviderError {
                provider,
                chain_id,
                original,
            } => {
                assert_eq!(provider, Some(GaslessProviderKind::ZeroDev));
                assert_eq!(chain_id, ChainId::BASE);
                assert!(original.unwrap().contains("Missing credentials"));
            }
            other => panic!("unexpected {other:?}"),
        }

        // create_client surfaces the raw provider error
        assert_eq!(
            router.create_client(ChainId::BASE, owner()).await.err(),
            Some(GaslessError::MissingCredentials(GaslessProviderKind::ZeroDev))
        );
    }

    #[tokio::test]
    async fn test_unregistered_provider() {
        let mut table = GaslessTable::empty();
        table.set(
            ChainId::CELO,
            ChainGaslessConfig {
                enabled: true,
                provider: GaslessProviderKind::Alchemy,
            },
        );
        let router = GaslessRouter::new(table);
        assert_eq!(
            router.create_client(ChainId::CELO, owner()).await.err(),
            Some(GaslessError::NotRegistered(GaslessProviderKind::Alchemy))
        );
    }
}
