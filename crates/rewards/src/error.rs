//! Errors surfaced by slot queries.

use slotwatch_beacon::BeaconError;
use slotwatch_execution::ExecutionError;
use slotwatch_transport::TransportError;

/// Error type for slot queries.
///
/// `SlotMissing` and `FutureSlot` are expected outcomes a caller reports back
/// to its user; every other variant is an internal failure.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("Slot is missing")]
    SlotMissing,
    #[error("Slot is in the future")]
    FutureSlot,
    #[error("Invalid slot: {0:?}")]
    InvalidSlot(String),
    #[error("request cancelled")]
    Cancelled,
    #[error("Could not determine head slot: {0}")]
    HeadUnavailable(#[source] BeaconError),
    #[error(transparent)]
    Beacon(BeaconError),
    #[error(transparent)]
    Execution(ExecutionError),
}

/// Result type for slot queries.
pub type QueryResult<T> = Result<T, QueryError>;

impl QueryError {
    /// Whether the error is an expected, user-facing slot outcome.
    pub fn is_slot_error(&self) -> bool {
        matches!(self, Self::SlotMissing | Self::FutureSlot)
    }

    pub(crate) fn head_unavailable(error: BeaconError) -> Self {
        match error {
            BeaconError::Transport(TransportError::Cancelled) => Self::Cancelled,
            other => Self::HeadUnavailable(other),
        }
    }
}

impl From<BeaconError> for QueryError {
    fn from(error: BeaconError) -> Self {
        match error {
            BeaconError::SlotMissing => Self::SlotMissing,
            BeaconError::FutureSlot => Self::FutureSlot,
            BeaconError::Transport(TransportError::Cancelled) => Self::Cancelled,
            other => Self::Beacon(other),
        }
    }
}

impl From<ExecutionError> for QueryError {
    fn from(error: ExecutionError) -> Self {
        match error {
            ExecutionError::Transport(TransportError::Cancelled) => Self::Cancelled,
            other => Self::Execution(other),
        }
    }
}
