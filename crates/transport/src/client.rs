//! HTTP client wrapper that routes every request through the shared limiter.

use crate::{CancelToken, RateLimiter, TransportError, TransportResult};
use reqwest::header::RETRY_AFTER;
use reqwest::{Client, Request, Response, StatusCode};
use slotwatch_telemetry::Metrics;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Delay used when a 429 carries no usable `Retry-After` header.
const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(1);

/// Upper bound on how long a single `Retry-After` is honored.
const MAX_RETRY_AFTER: Duration = Duration::from_secs(30);

/// Which upstream surface a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// Consensus-layer REST API.
    Rest,
    /// Execution-layer JSON-RPC.
    Rpc,
}

impl RequestKind {
    /// Metric label for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rest => "rest",
            Self::Rpc => "rpc",
        }
    }
}

/// Rate-limited HTTP client.
///
/// Cloning is cheap and every clone shares the same limiter and connection pool.
#[derive(Clone)]
pub struct RateLimitedClient {
    http: Client,
    limiter: Arc<RateLimiter>,
    metrics: Metrics,
}

impl RateLimitedClient {
    /// Create a new client.
    ///
    /// # Arguments
    /// * `requests_per_second` - Sustained rate shared by all requests
    /// * `metrics` - Metrics collector
    pub fn new(requests_per_second: f64, metrics: Metrics) -> TransportResult<Self> {
        let limiter = Arc::new(RateLimiter::new(requests_per_second)?);
        let http = Client::builder().build()?;
        Ok(Self {
            http,
            limiter,
            metrics,
        })
    }

    /// Underlying client, for building requests.
    pub fn http(&self) -> &Client {
        &self.http
    }

    /// Metrics collector shared with the adapters.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Send a request once a token is available.
    ///
    /// A `429 Too Many Requests` answer is retried exactly once after the
    /// delay named by `Retry-After`; the retry waits on the limiter again.
    pub async fn execute(
        &self,
        kind: RequestKind,
        request: Request,
        cancel: &CancelToken,
    ) -> TransportResult<Response> {
        let retry = request.try_clone();
        let response = self.send_once(kind, request, cancel).await?;
        if response.status() != StatusCode::TOO_MANY_REQUESTS {
            return Ok(response);
        }

        let Some(retry) = retry else {
            return Ok(response);
        };
        let delay = retry_after(&response);
        self.metrics.inc_upstream_requests(kind.as_str(), "throttled");
        warn!(
            kind = kind.as_str(),
            delay_ms = delay.as_millis() as u64,
            "Upstream throttled request, retrying once"
        );

        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(TransportError::Cancelled),
            _ = tokio::time::sleep(delay) => {}
        }
        self.send_once(kind, retry, cancel).await
    }

    async fn send_once(
        &self,
        kind: RequestKind,
        request: Request,
        cancel: &CancelToken,
    ) -> TransportResult<Response> {
        let waited = self.limiter.wait(cancel).await?;
        self.metrics.observe_rate_limit_wait(waited.as_secs_f64());
        debug!(kind = kind.as_str(), url = %request.url(), "Sending upstream request");

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(TransportError::Cancelled),
            result = self.http.execute(request) => result,
        };

        match result {
            Ok(response) => {
                self.metrics.inc_upstream_requests(kind.as_str(), "ok");
                Ok(response)
            }
            Err(e) => {
                self.metrics.inc_upstream_requests(kind.as_str(), "error");
                Err(e.into())
            }
        }
    }
}

/// Delay requested by a throttling response, in whole seconds.
fn retry_after(response: &Response) -> Duration {
    response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_RETRY_AFTER)
        .min(MAX_RETRY_AFTER)
}
