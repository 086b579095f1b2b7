//! REST and JSON-RPC calls of one query draw from the same rate limiter.

#[cfg(test)]
mod tests {
    use reqwest::Url;
    use serde_json::json;
    use slotwatch_rewards::{BlockStatus, SlotService};
    use slotwatch_telemetry::Metrics;
    use slotwatch_transport::CancelToken;
    use std::time::{Duration, Instant};
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const BLOCK_HASH: &str = "0x00000000000000000000000000000000000000000000000000000000000000bb";

    // 4 requests per second admits one call every 250ms.
    const RATE: f64 = 4.0;

    async fn mock_node() -> MockServer {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/eth/v1/beacon/headers"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"header": {"message": {"slot": "5000000"}}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/eth/v2/beacon/blocks/4700013"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"message": {"body": {"execution_payload": {"block_hash": BLOCK_HASH}}}}
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(body_partial_json(json!({"method": "eth_getBlockByHash"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": {
                    "hash": BLOCK_HASH,
                    "baseFeePerGas": "0x0",
                    "gasUsed": "0x0",
                    "transactions": []
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        server
    }

    #[tokio::test]
    async fn test_rest_and_rpc_share_one_budget() {
        let server = mock_node().await;
        let url = Url::parse(&server.uri()).unwrap();
        let metrics = Metrics::new().unwrap();
        let service = SlotService::connect(&url, RATE, metrics.clone()).unwrap();

        let started = Instant::now();
        let report = service
            .block_reward("4700013", &CancelToken::new())
            .await
            .unwrap();
        let elapsed = started.elapsed();

        assert_eq!(report.reward.status, BlockStatus::Vanilla);

        // Two REST calls then one RPC call: the third admission comes two
        // intervals after the first only when the RPC call waits behind the
        // REST calls in the same bucket.
        assert!(
            elapsed >= Duration::from_millis(480),
            "three calls at {RATE}/s finished in {elapsed:?}"
        );

        let exposition = metrics.gather().unwrap();
        assert!(exposition.contains("slotwatch_rate_limit_wait_seconds_count 3"));
    }
}
