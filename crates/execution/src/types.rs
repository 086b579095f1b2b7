//! Block and receipt records, reduced to the fields reward accounting reads.

use alloy::primitives::{B256, U256};
use serde::Deserialize;

/// Block returned by `eth_getBlockByHash` with full transactions.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionBlock {
    pub hash: B256,
    pub base_fee_per_gas: U256,
    pub gas_used: U256,
    pub transactions: Vec<BlockTransaction>,
}

impl ExecutionBlock {
    /// Base fee burnt by the whole block.
    pub fn burnt_fees(&self) -> U256 {
        self.base_fee_per_gas.saturating_mul(self.gas_used)
    }
}

/// Transaction as embedded in a block.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockTransaction {
    pub hash: B256,
    #[serde(default)]
    pub gas_price: Option<U256>,
    #[serde(default)]
    pub max_fee_per_gas: Option<U256>,
    pub gas: U256,
}

impl BlockTransaction {
    /// Price the sender declared: the EIP-1559 fee cap, else legacy `gasPrice`.
    ///
    /// Nodes report a derived effective `gasPrice` for mined dynamic-fee
    /// transactions, which is not what the sender signed.
    pub fn declared_gas_price(&self) -> U256 {
        self.max_fee_per_gas
            .or(self.gas_price)
            .unwrap_or_default()
    }

    /// Upper bound on the fee: declared price times gas limit.
    pub fn declared_cost(&self) -> U256 {
        self.declared_gas_price().saturating_mul(self.gas)
    }
}

/// Receipt returned by `eth_getTransactionReceipt`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub effective_gas_price: U256,
    pub gas_used: U256,
}

impl TransactionReceipt {
    /// Fee actually paid by the transaction.
    pub fn cost(&self) -> U256 {
        self.effective_gas_price.saturating_mul(self.gas_used)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_block_decodes_hex_quantities() {
        let block: ExecutionBlock = serde_json::from_value(json!({
            "hash": format!("0x{}", "11".repeat(32)),
            "number": "0xe4f1f2",
            "baseFeePerGas": "0x3b9aca00",
            "gasUsed": "0x5208",
            "transactions": [{
                "hash": format!("0x{}", "22".repeat(32)),
                "type": "0x2",
                "gas": "0x5208",
                "gasPrice": "0x77359400",
                "maxFeePerGas": "0xb2d05e00"
            }]
        }))
        .unwrap();

        assert_eq!(block.base_fee_per_gas, U256::from(1_000_000_000u64));
        assert_eq!(block.burnt_fees(), U256::from(21_000_000_000_000u64));
        assert_eq!(block.transactions[0].declared_gas_price(), U256::from(3_000_000_000u64));
    }

    #[test]
    fn test_dynamic_fee_transaction_uses_fee_cap() {
        let tx = BlockTransaction {
            hash: B256::ZERO,
            gas_price: None,
            max_fee_per_gas: Some(U256::from(30)),
            gas: U256::from(100),
        };
        assert_eq!(tx.declared_gas_price(), U256::from(30));
        assert_eq!(tx.declared_cost(), U256::from(3000));
    }

    #[test]
    fn test_legacy_transaction_uses_gas_price() {
        let tx = BlockTransaction {
            hash: B256::ZERO,
            gas_price: Some(U256::from(25)),
            max_fee_per_gas: None,
            gas: U256::from(4),
        };
        assert_eq!(tx.declared_gas_price(), U256::from(25));
        assert_eq!(tx.declared_cost(), U256::from(100));
    }

    #[test]
    fn test_receipt_cost() {
        let receipt: TransactionReceipt = serde_json::from_value(json!({
            "transactionHash": format!("0x{}", "22".repeat(32)),
            "status": "0x1",
            "effectiveGasPrice": "0xa",
            "gasUsed": "0x3"
        }))
        .unwrap();
        assert_eq!(receipt.cost(), U256::from(30));
    }
}
