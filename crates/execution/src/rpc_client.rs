//! Ethereum JSON-RPC client for block and receipt lookups.

use crate::{ExecutionAdapter, ExecutionBlock, ExecutionError, ExecutionResult, TransactionReceipt};
use alloy::primitives::B256;
use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use slotwatch_transport::{CancelToken, RateLimitedClient, RequestKind, TransportError};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// Ethereum RPC client sharing the rate-limited transport with the beacon adapter.
#[derive(Clone)]
pub struct RpcClient {
    client: RateLimitedClient,
    rpc_url: Url,
    next_id: Arc<AtomicU64>,
}

impl RpcClient {
    /// Create a new RPC client.
    ///
    /// # Arguments
    /// * `rpc_url` - HTTP/HTTPS JSON-RPC endpoint URL
    /// * `client` - Rate-limited client shared with the beacon adapter
    pub fn new(rpc_url: &Url, client: RateLimitedClient) -> Self {
        info!("Initialized RPC client for {}", rpc_url);

        Self {
            client,
            rpc_url: rpc_url.clone(),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Call `method` and decode its `result`; `Ok(None)` when the node returns null.
    async fn call_rpc<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
        cancel: &CancelToken,
    ) -> ExecutionResult<Option<T>> {
        let payload = json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": self.next_id.fetch_add(1, Ordering::Relaxed)
        });

        let request = self
            .client
            .http()
            .post(self.rpc_url.clone())
            .json(&payload)
            .build()
            .map_err(TransportError::from)?;

        let start = Instant::now();
        let response = self
            .client
            .execute(RequestKind::Rpc, request, cancel)
            .await?;
        let status = response.status();
        let body = response.bytes().await.map_err(TransportError::from)?;
        self.client
            .metrics()
            .observe_upstream_latency(method, start.elapsed().as_secs_f64());

        if !status.is_success() {
            return Err(ExecutionError::Upstream(status));
        }

        let response: RpcResponse<T> = serde_json::from_slice(&body)?;
        if let Some(error) = response.error {
            return Err(ExecutionError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        Ok(response.result)
    }
}

#[async_trait]
impl ExecutionAdapter for RpcClient {
    async fn block_by_hash(
        &self,
        hash: B256,
        cancel: &CancelToken,
    ) -> ExecutionResult<ExecutionBlock> {
        let block: ExecutionBlock = self
            .call_rpc("eth_getBlockByHash", json!([hash, true]), cancel)
            .await?
            .ok_or(ExecutionError::BlockNotFound(hash))?;

        debug!(%hash, transactions = block.transactions.len(), "Fetched block");
        Ok(block)
    }

    async fn transaction_receipt(
        &self,
        hash: B256,
        cancel: &CancelToken,
    ) -> ExecutionResult<TransactionReceipt> {
        self.call_rpc("eth_getTransactionReceipt", json!([hash]), cancel)
            .await?
            .ok_or(ExecutionError::ReceiptNotFound(hash))
    }
}
