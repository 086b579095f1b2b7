//! Beacon adapter backed by a beacon node REST API.

use crate::types::{BlockResponse, HeadersResponse, SyncCommitteeResponse, ValidatorsResponse};
use crate::{BeaconAdapter, BeaconError, BeaconResult, Slot, ValidatorIndex, ValidatorPubkey};
use alloy::primitives::B256;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use slotwatch_transport::{CancelToken, RateLimitedClient, RequestKind, TransportError};
use tokio::time::Instant;
use tracing::{debug, warn};

const HEADERS_PATH: &str = "/eth/v1/beacon/headers";
const BLOCK_DETAIL_PATH: &str = "/eth/v2/beacon/blocks/";
const STATE_PATH: &str = "/eth/v1/beacon/states/";

/// Beacon adapter talking to a beacon node over HTTP.
#[derive(Clone)]
pub struct HttpBeaconAdapter {
    base_url: String,
    client: RateLimitedClient,
}

impl HttpBeaconAdapter {
    /// Create a new adapter.
    ///
    /// # Arguments
    /// * `base_url` - Upstream node URL; API paths are appended to it
    /// * `client` - Rate-limited client shared with the execution adapter
    pub fn new(base_url: &Url, client: RateLimitedClient) -> Self {
        Self {
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            client,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
        cancel: &CancelToken,
    ) -> BeaconResult<T> {
        let request = request
            .header(ACCEPT, "application/json")
            .build()
            .map_err(TransportError::from)?;

        let start = Instant::now();
        let response = self
            .client
            .execute(RequestKind::Rest, request, cancel)
            .await?;
        let status = response.status();
        let body = response.bytes().await.map_err(TransportError::from)?;
        self.client
            .metrics()
            .observe_upstream_latency(operation, start.elapsed().as_secs_f64());

        match status {
            StatusCode::BAD_REQUEST => Err(BeaconError::SlotMissing),
            StatusCode::NOT_FOUND => Err(BeaconError::FutureSlot),
            status if !status.is_success() => {
                warn!(operation, %status, "Beacon API request failed");
                Err(BeaconError::Upstream(status))
            }
            _ => Ok(serde_json::from_slice(&body)?),
        }
    }
}

#[async_trait]
impl BeaconAdapter for HttpBeaconAdapter {
    async fn current_head_slot(&self, cancel: &CancelToken) -> BeaconResult<Slot> {
        let request = self.client.http().get(self.endpoint(HEADERS_PATH));
        let response: HeadersResponse = self.fetch("beacon_headers", request, cancel).await?;

        let raw = response
            .data
            .into_iter()
            .next()
            .ok_or(BeaconError::EmptyResponse("headers"))?
            .header
            .message
            .slot;
        let slot = raw
            .parse::<Slot>()
            .map_err(|_| BeaconError::InvalidHeadSlot(raw))?;

        debug!(slot, "Fetched head slot");
        Ok(slot)
    }

    async fn block_hash(&self, slot_id: &str, cancel: &CancelToken) -> BeaconResult<B256> {
        let request = self
            .client
            .http()
            .get(self.endpoint(&format!("{BLOCK_DETAIL_PATH}{slot_id}")));
        let response: BlockResponse = self.fetch("beacon_block", request, cancel).await?;

        let block_hash = response.data.message.body.execution_payload.block_hash;
        debug!(slot_id, %block_hash, "Resolved execution block hash");
        Ok(block_hash)
    }

    async fn sync_committee_indexes(
        &self,
        slot_id: &str,
        cancel: &CancelToken,
    ) -> BeaconResult<Vec<ValidatorIndex>> {
        let request = self
            .client
            .http()
            .get(self.endpoint(&format!("{STATE_PATH}{slot_id}/sync_committees")));
        let response: SyncCommitteeResponse =
            self.fetch("beacon_sync_committees", request, cancel).await?;

        debug!(slot_id, count = response.data.validators.len(), "Fetched sync committee");
        Ok(response.data.validators)
    }

    async fn validator_pubkeys(
        &self,
        slot_id: &str,
        indexes: &[ValidatorIndex],
        cancel: &CancelToken,
    ) -> BeaconResult<Vec<ValidatorPubkey>> {
        if indexes.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<(&str, &str)> = indexes.iter().map(|index| ("id", index.as_str())).collect();
        let request = self
            .client
            .http()
            .get(self.endpoint(&format!("{STATE_PATH}{slot_id}/validators")))
            .query(&ids);
        let response: ValidatorsResponse = self.fetch("beacon_validators", request, cancel).await?;

        Ok(response
            .data
            .into_iter()
            .map(|entry| entry.validator.pubkey)
            .collect())
    }
}
