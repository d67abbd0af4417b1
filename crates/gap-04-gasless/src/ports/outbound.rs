//! # Ports
//!
//! Provider strategy, signer interfaces and the bundler transport.

use async_trait::async_trait;
use shared_types::{Address, ChainId, TxHash, WriteError};
use std::sync::Arc;

use crate::domain::{GaslessClient, GaslessProviderKind, SponsoredCall, UserOperation};
use crate::error::GaslessError;

/// Local account able to sign on behalf of the sponsored account.
#[async_trait]
pub trait LocalSigner: Send + Sync {
    fn address(&self) -> Address;

    async fn sign(&self, payload: &[u8]) -> Result<Vec<u8>, WriteError>;
}

/// Uniform signer the transaction-building code talks to.
#[async_trait]
pub trait TransactionSigner: Send + Sync {
    fn address(&self) -> Address;

    fn chain_id(&self) -> ChainId;

    async fn send_transaction(&self, call: SponsoredCall) -> Result<TxHash, WriteError>;
}

/// One sponsoring provider (strategy).
#[async_trait]
pub trait GaslessProvider: Send + Sync {
    fn kind(&self) -> GaslessProviderKind;

    /// Build a client for `chain` owned by `owner`.
    async fn create_client(
        &self,
        chain: ChainId,
        owner: Arc<dyn LocalSigner>,
    ) -> Result<GaslessClient, GaslessError>;

    /// Adapt `client` into a [`TransactionSigner`].
    fn to_signer(&self, client: GaslessClient) -> Result<Arc<dyn TransactionSigner>, GaslessError>;
}

/// Bundler JSON-RPC.
#[async_trait]
pub trait BundlerTransport: Send + Sync {
    /// `eth_sendUserOperation`; returns the user operation hash.
    async fn send_user_operation(
        &self,
        rpc_url: &str,
        op: &UserOperation,
        entry_point: &str,
    ) -> Result<TxHash, WriteError>;
}
