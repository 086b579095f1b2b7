//! Block reward accounting and sync committee duty lookup per beacon slot.

pub mod error;
pub mod reward;
pub mod service;
pub mod slot;

pub use error::{QueryError, QueryResult};
pub use reward::{summarize, BlockReward, BlockStatus, FeeSource, SignedWei, TxFee};
pub use service::{RewardReport, SlotService};
pub use slot::MERGE_FLOOR_SLOT;
