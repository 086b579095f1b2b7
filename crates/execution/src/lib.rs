//! Execution-layer access for slotwatch: blocks and receipts over JSON-RPC.

use alloy::primitives::B256;
use async_trait::async_trait;
use reqwest::StatusCode;
use slotwatch_transport::{CancelToken, TransportError};

pub mod rpc_client;
pub mod types;

pub use rpc_client::RpcClient;
pub use types::{BlockTransaction, ExecutionBlock, TransactionReceipt};

/// Error type for execution-layer operations.
#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
    #[error("Block not found: {0}")]
    BlockNotFound(B256),
    #[error("Receipt not found: {0}")]
    ReceiptNotFound(B256),
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("RPC request failed with status: {0}")]
    Upstream(StatusCode),
    #[error("Malformed RPC response: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Result type for execution-layer operations.
pub type ExecutionResult<T> = Result<T, ExecutionError>;

/// Trait for execution-layer adapters.
#[async_trait]
pub trait ExecutionAdapter: Send + Sync {
    /// Full block, transactions included, by hash.
    async fn block_by_hash(&self, hash: B256, cancel: &CancelToken)
        -> ExecutionResult<ExecutionBlock>;

    /// Receipt of a mined transaction.
    async fn transaction_receipt(
        &self,
        hash: B256,
        cancel: &CancelToken,
    ) -> ExecutionResult<TransactionReceipt>;
}
