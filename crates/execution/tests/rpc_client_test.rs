//! Integration tests for the JSON-RPC execution client against a mock node.

#[cfg(test)]
mod tests {
    use alloy::primitives::{B256, U256};
    use reqwest::Url;
    use serde_json::json;
    use slotwatch_execution::{ExecutionAdapter, ExecutionError, RpcClient};
    use slotwatch_telemetry::Metrics;
    use slotwatch_transport::{CancelToken, RateLimitedClient};
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn rpc_client(server: &MockServer) -> RpcClient {
        let client = RateLimitedClient::new(1000.0, Metrics::new().unwrap()).unwrap();
        RpcClient::new(&Url::parse(&server.uri()).unwrap(), client)
    }

    fn hash(byte: u8) -> B256 {
        B256::repeat_byte(byte)
    }

    #[tokio::test]
    async fn test_block_by_hash() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "method": "eth_getBlockByHash",
                "params": [hash(1), true]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": {
                    "hash": hash(1),
                    "baseFeePerGas": "0x7",
                    "gasUsed": "0x2",
                    "transactions": [
                        {"hash": hash(2), "gas": "0x1", "gasPrice": "0x8"},
                        {"hash": hash(3), "gas": "0x1", "maxFeePerGas": "0x9"}
                    ]
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let block = rpc_client(&server)
            .block_by_hash(hash(1), &CancelToken::new())
            .await
            .unwrap();

        assert_eq!(block.hash, hash(1));
        assert_eq!(block.base_fee_per_gas, U256::from(7));
        assert_eq!(block.gas_used, U256::from(2));
        assert_eq!(block.transactions.len(), 2);
        assert_eq!(block.transactions[1].declared_gas_price(), U256::from(9));
    }

    #[tokio::test]
    async fn test_unknown_block_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": null
            })))
            .mount(&server)
            .await;

        let result = rpc_client(&server)
            .block_by_hash(hash(9), &CancelToken::new())
            .await;
        assert!(matches!(result, Err(ExecutionError::BlockNotFound(h)) if h == hash(9)));
    }

    #[tokio::test]
    async fn test_transaction_receipt() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "method": "eth_getTransactionReceipt",
                "params": [hash(2)]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": {"effectiveGasPrice": "0x5", "gasUsed": "0x4", "status": "0x1"}
            })))
            .mount(&server)
            .await;

        let receipt = rpc_client(&server)
            .transaction_receipt(hash(2), &CancelToken::new())
            .await
            .unwrap();
        assert_eq!(receipt.cost(), U256::from(20));
    }

    #[tokio::test]
    async fn test_rpc_error_object() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "error": {"code": -32000, "message": "header not found"}
            })))
            .mount(&server)
            .await;

        let result = rpc_client(&server)
            .transaction_receipt(hash(2), &CancelToken::new())
            .await;
        match result {
            Err(ExecutionError::Rpc { code, message }) => {
                assert_eq!(code, -32000);
                assert_eq!(message, "header not found");
            }
            other => panic!("expected RPC error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_http_failure_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let result = rpc_client(&server)
            .block_by_hash(hash(1), &CancelToken::new())
            .await;
        assert!(matches!(result, Err(ExecutionError::Upstream(status)) if status.as_u16() == 502));
    }
}
