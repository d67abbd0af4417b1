//! Bundler JSON-RPC over HTTP (reqwest).

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use shared_types::{TxHash, WriteError};
use std::time::Duration;
use tracing::debug;

use crate::domain::UserOperation;
use crate::ports::BundlerTransport;

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<String>,
    error: Option<RpcError>,
}

/// Posts `eth_sendUserOperation` to the provider endpoint.
pub struct HttpBundlerTransport {
    http_client: reqwest::Client,
}

impl HttpBundlerTransport {
    pub fn new(timeout: Duration) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent("gap-core/0.1")
            .build()
            .unwrap_or_default();
        Self { http_client }
    }

    fn parse_response(body: RpcResponse) -> Result<TxHash, WriteError> {
        if let Some(err) = body.error {
            return Err(WriteError::Transaction(format!(
                "bundler rejected user operation ({}): {}",
                err.code, err.message
            )));
        }
        let hash = body
            .result
            .ok_or_else(|| WriteError::Transaction("bundler returned no result".into()))?;
        TxHash::from_hex(&hash).map_err(|e| WriteError::Transaction(e.to_string()))
    }
}

#[async_trait]
impl BundlerTransport for HttpBundlerTransport {
    async fn send_user_operation(
        &self,
        rpc_url: &str,
        op: &UserOperation,
        entry_point: &str,
    ) -> Result<TxHash, WriteError> {
        let request = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "eth_sendUserOperation",
            "params": [op, entry_point],
        });
        debug!("[gap-04] eth_sendUserOperation sender={}", op.sender);

        let response = self
            .http_client
            .post(rpc_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| WriteError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(WriteError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: RpcResponse = response
            .json()
            .await
            .map_err(|e| WriteError::Network(e.to_string()))?;
        Self::parse_response(body)
    }
}
