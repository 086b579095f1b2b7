//! Consensus-layer REST API access for slotwatch.
//!
//! This module provides a trait-based interface over the handful of beacon
//! node endpoints the service reads: the chain head, block details, sync
//! committee membership, and validator details.

use alloy::primitives::B256;
use async_trait::async_trait;
use reqwest::StatusCode;
use slotwatch_transport::{CancelToken, TransportError};

pub mod http;
mod types;

pub use http::HttpBeaconAdapter;

/// Represents a validator public key (BLS12-381 public key as hex string).
pub type ValidatorPubkey = String;

/// Represents a slot number in the beacon chain.
pub type Slot = u64;

/// Represents a validator index as the beacon API reports it (decimal string).
pub type ValidatorIndex = String;

/// Error type for beacon chain operations.
#[derive(Debug, thiserror::Error)]
pub enum BeaconError {
    #[error("Slot is missing")]
    SlotMissing,
    #[error("Slot is in the future")]
    FutureSlot,
    #[error("Unexpected beacon API status: {0}")]
    Upstream(StatusCode),
    #[error("Malformed beacon API response: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Beacon API returned no {0}")]
    EmptyResponse(&'static str),
    #[error("Invalid head slot: {0}")]
    InvalidHeadSlot(String),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Result type for beacon chain operations.
pub type BeaconResult<T> = Result<T, BeaconError>;

/// Trait for beacon chain adapters.
///
/// Slot arguments are beacon API state/block ids and are forwarded verbatim.
#[async_trait]
pub trait BeaconAdapter: Send + Sync {
    /// Slot of the current chain head.
    async fn current_head_slot(&self, cancel: &CancelToken) -> BeaconResult<Slot>;

    /// Execution payload block hash of the block proposed at `slot_id`.
    ///
    /// # Errors
    /// `SlotMissing` if the node reports the slot as a bad request,
    /// `FutureSlot` if it reports it as not found.
    async fn block_hash(&self, slot_id: &str, cancel: &CancelToken) -> BeaconResult<B256>;

    /// Validator indexes of the sync committee active at `slot_id`, in API order.
    async fn sync_committee_indexes(
        &self,
        slot_id: &str,
        cancel: &CancelToken,
    ) -> BeaconResult<Vec<ValidatorIndex>>;

    /// Public keys for `indexes` at `slot_id`, in the order the API returns them.
    async fn validator_pubkeys(
        &self,
        slot_id: &str,
        indexes: &[ValidatorIndex],
        cancel: &CancelToken,
    ) -> BeaconResult<Vec<ValidatorPubkey>>;
}
