//! Net block reward and MEV classification.
//!
//! The reward of a block is what its transactions paid minus what the base fee
//! burnt. A block counts as MEV-built when any transaction paid more than
//! [`MEV_FEE_FACTOR`] times the base fee per gas.

use alloy::primitives::U256;
use serde::Serialize;
use slotwatch_execution::{BlockTransaction, TransactionReceipt};
use std::fmt;

/// Multiple of the base fee above which a gas price marks a block as MEV.
pub const MEV_FEE_FACTOR: u64 = 3;

/// Wei per gwei.
pub const GWEI: u64 = 1_000_000_000;

/// How a block was built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockStatus {
    Vanilla,
    Mev,
}

impl BlockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vanilla => "vanilla",
            Self::Mev => "mev",
        }
    }
}

impl fmt::Display for BlockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a transaction's fee figures came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeeSource {
    /// Effective price and gas used from the receipt.
    Receipt,
    /// Declared price and gas limit, used when the receipt was unavailable.
    Declared,
}

/// Fee paid by one transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxFee {
    pub cost: U256,
    pub gas_price: U256,
    pub source: FeeSource,
}

impl TxFee {
    pub fn from_receipt(receipt: &TransactionReceipt) -> Self {
        Self {
            cost: receipt.cost(),
            gas_price: receipt.effective_gas_price,
            source: FeeSource::Receipt,
        }
    }

    pub fn declared(tx: &BlockTransaction) -> Self {
        Self {
            cost: tx.declared_cost(),
            gas_price: tx.declared_gas_price(),
            source: FeeSource::Declared,
        }
    }
}

/// Reward accounting for one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockReward {
    /// Sum of all transaction costs, in wei.
    pub total_fees: U256,
    /// Base fee times block gas used, in wei.
    pub burnt_fees: U256,
    pub status: BlockStatus,
}

impl BlockReward {
    /// Fees kept by the proposer, which is negative when burning exceeds the take.
    pub fn net_reward(&self) -> SignedWei {
        SignedWei::difference(self.total_fees, self.burnt_fees)
    }
}

/// Fold per-transaction fees into a block reward.
///
/// Both the fee sum and the MEV flag are order-independent, so the result does
/// not depend on the order of `fees`.
pub fn summarize(
    base_fee: U256,
    gas_used: U256,
    fees: impl IntoIterator<Item = TxFee>,
) -> BlockReward {
    let threshold = base_fee.saturating_mul(U256::from(MEV_FEE_FACTOR));
    let (total_fees, is_mev) = fees
        .into_iter()
        .fold((U256::ZERO, false), |(total, is_mev), fee| {
            (total.saturating_add(fee.cost), is_mev || fee.gas_price > threshold)
        });

    BlockReward {
        total_fees,
        burnt_fees: base_fee.saturating_mul(gas_used),
        status: if is_mev {
            BlockStatus::Mev
        } else {
            BlockStatus::Vanilla
        },
    }
}

/// Signed wei amount.
///
/// Displays in gwei with exactly nine decimal places, e.g. `-0.000000005`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignedWei {
    negative: bool,
    magnitude: U256,
}

impl SignedWei {
    /// `minuend - subtrahend`.
    pub fn difference(minuend: U256, subtrahend: U256) -> Self {
        if minuend >= subtrahend {
            Self {
                negative: false,
                magnitude: minuend - subtrahend,
            }
        } else {
            Self {
                negative: true,
                magnitude: subtrahend - minuend,
            }
        }
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn magnitude(&self) -> U256 {
        self.magnitude
    }
}

impl fmt::Display for SignedWei {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let gwei = U256::from(GWEI);
        let whole = self.magnitude / gwei;
        let fraction = (self.magnitude % gwei).to::<u64>();
        let sign = if self.negative { "-" } else { "" };
        write!(f, "{sign}{whole}.{fraction:09}")
    }
}
