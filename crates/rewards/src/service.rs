//! Slot query service: block rewards and sync committee duties.

use crate::reward::{summarize, BlockReward, TxFee};
use crate::slot::{check_state_id, validate_slot};
use crate::{QueryError, QueryResult};
use alloy::primitives::B256;
use reqwest::Url;
use slotwatch_beacon::{BeaconAdapter, HttpBeaconAdapter, Slot, ValidatorPubkey};
use slotwatch_execution::{ExecutionAdapter, ExecutionBlock, ExecutionError, RpcClient};
use slotwatch_telemetry::Metrics;
use slotwatch_transport::{CancelToken, RateLimitedClient, TransportError, TransportResult};
use std::sync::Arc;
use tracing::{debug, info};

/// Reward of the block proposed at a slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardReport {
    pub slot: Slot,
    pub block_hash: B256,
    pub reward: BlockReward,
}

impl RewardReport {
    /// Net reward in gwei with nine decimals.
    pub fn reward_gwei(&self) -> String {
        self.reward.net_reward().to_string()
    }
}

/// Answers reward and duty queries for beacon slots.
#[derive(Clone)]
pub struct SlotService {
    beacon: Arc<dyn BeaconAdapter>,
    execution: Arc<dyn ExecutionAdapter>,
    metrics: Metrics,
}

impl SlotService {
    /// Create a service from explicit adapters.
    pub fn new(
        beacon: Arc<dyn BeaconAdapter>,
        execution: Arc<dyn ExecutionAdapter>,
        metrics: Metrics,
    ) -> Self {
        Self {
            beacon,
            execution,
            metrics,
        }
    }

    /// Create a service whose REST and RPC traffic share one rate limiter.
    ///
    /// # Arguments
    /// * `base_url` - Node URL serving both the beacon API and JSON-RPC
    /// * `requests_per_second` - Sustained request rate towards `base_url`
    /// * `metrics` - Metrics collector
    pub fn connect(
        base_url: &Url,
        requests_per_second: f64,
        metrics: Metrics,
    ) -> TransportResult<Self> {
        let client = RateLimitedClient::new(requests_per_second, metrics.clone())?;
        let beacon = HttpBeaconAdapter::new(base_url, client.clone());
        let execution = RpcClient::new(base_url, client);
        info!(%base_url, requests_per_second, "Slot service ready");

        Ok(Self::new(Arc::new(beacon), Arc::new(execution), metrics))
    }

    /// Net execution reward and build classification of the block at `slot_id`.
    ///
    /// # Errors
    /// `SlotMissing` for slots at or below the merge floor, `FutureSlot` for
    /// slots past the head. Receipt lookups never fail the query.
    pub async fn block_reward(
        &self,
        slot_id: &str,
        cancel: &CancelToken,
    ) -> QueryResult<RewardReport> {
        let slot = validate_slot(self.beacon.as_ref(), slot_id, cancel).await?;
        let block_hash = self.beacon.block_hash(&slot.to_string(), cancel).await?;
        let block = self.execution.block_by_hash(block_hash, cancel).await?;

        let fees = self.transaction_fees(&block, cancel).await?;
        let reward = summarize(block.base_fee_per_gas, block.gas_used, fees);
        self.metrics.inc_reward_queries(reward.status.as_str());

        info!(
            slot,
            %block_hash,
            transactions = block.transactions.len(),
            reward = %reward.net_reward(),
            status = %reward.status,
            "Computed block reward"
        );

        Ok(RewardReport {
            slot,
            block_hash,
            reward,
        })
    }

    /// Public keys of the sync committee members at `slot_id`.
    ///
    /// No local bounds check: the beacon node's status codes decide whether
    /// the slot is missing or in the future. `slot_id` must still be a beacon
    /// state id.
    pub async fn sync_duties(
        &self,
        slot_id: &str,
        cancel: &CancelToken,
    ) -> QueryResult<Vec<ValidatorPubkey>> {
        check_state_id(slot_id)?;
        let indexes = self.beacon.sync_committee_indexes(slot_id, cancel).await?;
        let pubkeys = self
            .beacon
            .validator_pubkeys(slot_id, &indexes, cancel)
            .await?;

        info!(slot_id, members = pubkeys.len(), "Resolved sync committee duties");
        Ok(pubkeys)
    }

    /// Fee of each transaction in block order, from its receipt when available.
    async fn transaction_fees(
        &self,
        block: &ExecutionBlock,
        cancel: &CancelToken,
    ) -> QueryResult<Vec<TxFee>> {
        let mut fees = Vec::with_capacity(block.transactions.len());
        for tx in &block.transactions {
            let fee = match self.execution.transaction_receipt(tx.hash, cancel).await {
                Ok(receipt) => TxFee::from_receipt(&receipt),
                Err(ExecutionError::Transport(TransportError::Cancelled)) => {
                    return Err(QueryError::Cancelled);
                }
                Err(e) => {
                    debug!(tx = %tx.hash, error = %e, "Receipt unavailable, using declared fee");
                    self.metrics.inc_receipt_fallbacks();
                    TxFee::declared(tx)
                }
            };
            fees.push(fee);
        }
        Ok(fees)
    }
}
