//! Slot bounds checks for reward queries.

use crate::{QueryError, QueryResult};
use slotwatch_beacon::{BeaconAdapter, Slot};
use slotwatch_transport::CancelToken;
use std::num::IntErrorKind;
use tracing::debug;

/// Last slot without an execution payload. The merge activated at 4_700_013.
pub const MERGE_FLOOR_SLOT: Slot = 4_700_012;

/// Parse a decimal slot literal.
///
/// Literals too large for a `Slot` are valid but lie beyond any head, so they
/// fail as `FutureSlot` rather than as malformed input.
pub fn parse_slot(slot_id: &str) -> QueryResult<Slot> {
    if slot_id.is_empty() || !slot_id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(QueryError::InvalidSlot(slot_id.to_string()));
    }
    slot_id.parse::<Slot>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow => QueryError::FutureSlot,
        _ => QueryError::InvalidSlot(slot_id.to_string()),
    })
}

/// Named state ids the beacon API accepts besides slots and state roots.
const NAMED_STATE_IDS: [&str; 4] = ["head", "genesis", "finalized", "justified"];

/// Accept only beacon state ids: a decimal slot, a named id, or a 0x state root.
///
/// The id becomes a URL path segment, so anything else is refused before a
/// request is built.
pub fn check_state_id(slot_id: &str) -> QueryResult<()> {
    let is_slot = !slot_id.is_empty() && slot_id.bytes().all(|b| b.is_ascii_digit());
    let is_root = slot_id
        .strip_prefix("0x")
        .is_some_and(|hex| hex.len() == 64 && hex.bytes().all(|b| b.is_ascii_hexdigit()));

    if is_slot || is_root || NAMED_STATE_IDS.contains(&slot_id) {
        Ok(())
    } else {
        Err(QueryError::InvalidSlot(slot_id.to_string()))
    }
}

/// Reject slots at or below the merge floor.
pub fn check_floor(slot: Slot) -> QueryResult<()> {
    if slot <= MERGE_FLOOR_SLOT {
        return Err(QueryError::SlotMissing);
    }
    Ok(())
}

/// Reject slots past the chain head.
pub fn check_head(slot: Slot, head: Slot) -> QueryResult<()> {
    if slot > head {
        return Err(QueryError::FutureSlot);
    }
    Ok(())
}

/// Parse `slot_id` and check it against the floor, then the current head.
///
/// The head is only fetched for slots that pass the floor check.
pub async fn validate_slot(
    beacon: &dyn BeaconAdapter,
    slot_id: &str,
    cancel: &CancelToken,
) -> QueryResult<Slot> {
    let slot = parse_slot(slot_id)?;
    check_floor(slot)?;

    let head = beacon
        .current_head_slot(cancel)
        .await
        .map_err(QueryError::head_unavailable)?;
    check_head(slot, head)?;

    debug!(slot, head, "Slot within bounds");
    Ok(slot)
}
