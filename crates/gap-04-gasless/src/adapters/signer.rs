//! Sponsored signer shared by every provider.

use async_trait::async_trait;
use shared_types::{Address, ChainId, TxHash, WriteError};
use std::sync::Arc;
use tracing::debug;

use crate::domain::{encode_call, GaslessClient, SponsoredCall, UserOperation, ENTRY_POINT_V07};
use crate::ports::{BundlerTransport, TransactionSigner};

/// Signs with the owner and submits through the provider's bundler.
pub struct SponsoredSigner {
    client: GaslessClient,
    transport: Arc<dyn BundlerTransport>,
}

impl SponsoredSigner {
    pub fn new(client: GaslessClient, transport: Arc<dyn BundlerTransport>) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &GaslessClient {
        &self.client
    }
}

#[async_trait]
impl TransactionSigner for SponsoredSigner {
    fn address(&self) -> Address {
        self.client.owner.address()
    }

    fn chain_id(&self) -> ChainId {
        self.client.chain_id
    }

    async fn send_transaction(&self, call: SponsoredCall) -> Result<TxHash, WriteError> {
        let signature = self.client.owner.sign(&encode_call(&call)).await?;
        let op = UserOperation::new(self.address(), &call, &signature);
        debug!(
            "[gap-04] Sending sponsored call to {} via {} on chain {}",
            call.to, self.client.provider, self.client.chain_id
        );
        self.transport
            .send_user_operation(&self.client.rpc_url, &op, ENTRY_POINT_V07)
            .await
    }
}
