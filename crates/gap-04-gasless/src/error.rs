//! Error types for gasless routing

use shared_types::ChainId;
use thiserror::Error;

use crate::domain::GaslessProviderKind;

/// Gasless errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GaslessError {
    /// Signer retrieval failed. `provider` is `None` when the chain has no
    /// enabled provider.
    #[error(
        "Gasless provider {} failed on chain {chain_id}{}",
        provider_label(.provider),
        original_suffix(.original)
    )]
    ProviderError {
        provider: Option<GaslessProviderKind>,
        chain_id: ChainId,
        original: Option<String>,
    },

    /// Provider name not recognized.
    #[error("Unknown gasless provider: {0}")]
    UnknownProvider(String),

    /// The table names a provider that was never registered.
    #[error("Gasless provider {0} is not registered")]
    NotRegistered(GaslessProviderKind),

    /// Provider credentials missing from configuration.
    #[error("Missing credentials for gasless provider {0}")]
    MissingCredentials(GaslessProviderKind),

    /// Provider has no endpoint for this chain.
    #[error("Gasless provider {provider} does not support chain {chain_id}")]
    UnsupportedChain {
        provider: GaslessProviderKind,
        chain_id: ChainId,
    },
}

fn provider_label(provider: &Option<GaslessProviderKind>) -> &'static str {
    provider.map_or("<none>", |p| p.as_str())
}

fn original_suffix(original: &Option<String>) -> String {
    original
        .as_ref()
        .map(|o| format!(": {o}"))
        .unwrap_or_default()
}

/// Result type for gasless operations
pub type GaslessResult<T> = Result<T, GaslessError>;
