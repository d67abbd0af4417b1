//! In-memory signer and bundler.

use async_trait::async_trait;
use parking_lot::Mutex;
use shared_types::{Address, TxHash, WriteError};

use crate::domain::UserOperation;
use crate::ports::{BundlerTransport, LocalSigner};

/// Signs by echoing a fixed tag plus the payload length.
pub struct MockLocalSigner {
    address: Address,
}

impl MockLocalSigner {
    pub fn new(address: Address) -> Self {
        Self { address }
    }
}

#[async_trait]
impl LocalSigner for MockLocalSigner {
    fn address(&self) -> Address {
        self.address
    }

    async fn sign(&self, payload: &[u8]) -> Result<Vec<u8>, WriteError> {
        let mut sig = vec![0x5a];
        sig.extend_from_slice(&(payload.len() as u32).to_be_bytes());
        Ok(sig)
    }
}

/// Records user operations and answers with a fixed hash.
#[derive(Default)]
pub struct MockBundler {
    sent: Mutex<Vec<(String, UserOperation)>>,
    fail_with: Mutex<Option<WriteError>>,
}

impl MockBundler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_with(&self, error: WriteError) {
        *self.fail_with.lock() = Some(error);
    }

    pub fn sent(&self) -> Vec<(String, UserOperation)> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl BundlerTransport for MockBundler {
    async fn send_user_operation(
        &self,
        rpc_url: &str,
        op: &UserOperation,
        _entry_point: &str,
    ) -> Result<TxHash, WriteError> {
        if let Some(err) = self.fail_with.lock().clone() {
            return Err(err);
        }
        self.sent.lock().push((rpc_url.to_string(), op.clone()));
        Ok(TxHash::default())
    }
}
