//! Provider clients and sponsored calls.

use serde::{Deserialize, Serialize};
use shared_types::{Address, ChainId};
use std::sync::Arc;

use super::GaslessProviderKind;
use crate::ports::LocalSigner;

/// ERC-4337 v0.7 entry point, identical on every supported chain.
pub const ENTRY_POINT_V07: &str = "0x0000000071727De22E5E9d8BAf0edAc6f37da032";

/// A provider client bound to one chain and one owner.
#[derive(Clone)]
pub struct GaslessClient {
    pub provider: GaslessProviderKind,
    pub chain_id: ChainId,
    /// Combined bundler + paymaster RPC endpoint.
    pub rpc_url: String,
    pub owner: Arc<dyn LocalSigner>,
}

impl std::fmt::Debug for GaslessClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GaslessClient")
            .field("provider", &self.provider)
            .field("chain_id", &self.chain_id)
            .field("owner", &self.owner.address())
            .finish_non_exhaustive()
    }
}

/// Contract call to sponsor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SponsoredCall {
    pub to: Address,
    pub data: Vec<u8>,
    pub value: u128,
}

/// User operation as sent to the bundler (hex-encoded fields).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOperation {
    pub sender: String,
    pub call_data: String,
    pub call_value: String,
    pub signature: String,
}

impl UserOperation {
    pub fn new(sender: Address, call: &SponsoredCall, signature: &[u8]) -> Self {
        Self {
            sender: sender.to_hex(),
            call_data: format!("0x{}", hex::encode(encode_call(call))),
            call_value: format!("{:#x}", call.value),
            signature: format!("0x{}", hex::encode(signature)),
        }
    }
}

/// `to ‖ data`: the payload the owner signs.
pub fn encode_call(call: &SponsoredCall) -> Vec<u8> {
    let mut out = Vec::with_capacity(20 + call.data.len());
    out.extend_from_slice(call.to.as_bytes());
    out.extend_from_slice(&call.data);
    out
}
