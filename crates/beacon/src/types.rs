//! Response records for the beacon API, holding only the fields we read.

use alloy::primitives::B256;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct HeadersResponse {
    pub data: Vec<HeaderEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HeaderEntry {
    pub header: SignedHeader,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SignedHeader {
    pub message: HeaderMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HeaderMessage {
    pub slot: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BlockResponse {
    pub data: SignedBlock,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SignedBlock {
    pub message: BlockMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BlockMessage {
    pub body: BlockBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BlockBody {
    pub execution_payload: ExecutionPayload,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExecutionPayload {
    pub block_hash: B256,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SyncCommitteeResponse {
    pub data: SyncCommittee,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SyncCommittee {
    pub validators: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ValidatorsResponse {
    pub data: Vec<ValidatorEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ValidatorEntry {
    pub validator: ValidatorDetail,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ValidatorDetail {
    pub pubkey: String,
}
