//! Prometheus metrics for the slotwatch service.

use prometheus::{
    Encoder, Histogram, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry,
    TextEncoder,
};

/// Metrics collector for the slotwatch service.
///
/// Every instance owns its registry, so several clients (tests, one-shot
/// commands) can coexist in one process.
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    upstream_requests: IntCounterVec,
    upstream_latency: HistogramVec,
    rate_limit_wait: Histogram,
    receipt_fallbacks: IntCounter,
    reward_queries: IntCounterVec,
}

impl Metrics {
    /// Create a new metrics instance.
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let upstream_requests = IntCounterVec::new(
            Opts::new(
                "slotwatch_upstream_requests_total",
                "Total number of upstream requests by kind and outcome",
            ),
            &["kind", "outcome"],
        )?;

        let upstream_latency = HistogramVec::new(
            HistogramOpts::new(
                "slotwatch_upstream_latency_seconds",
                "Upstream call latency in seconds",
            ),
            &["operation"],
        )?;

        let rate_limit_wait = Histogram::with_opts(HistogramOpts::new(
            "slotwatch_rate_limit_wait_seconds",
            "Time spent waiting for a rate limiter token",
        ))?;

        let receipt_fallbacks = IntCounter::new(
            "slotwatch_receipt_fallbacks_total",
            "Transactions priced from declared gas because the receipt was unavailable",
        )?;

        let reward_queries = IntCounterVec::new(
            Opts::new(
                "slotwatch_reward_queries_total",
                "Successful block reward queries by classification",
            ),
            &["status"],
        )?;

        registry.register(Box::new(upstream_requests.clone()))?;
        registry.register(Box::new(upstream_latency.clone()))?;
        registry.register(Box::new(rate_limit_wait.clone()))?;
        registry.register(Box::new(receipt_fallbacks.clone()))?;
        registry.register(Box::new(reward_queries.clone()))?;

        Ok(Self {
            registry,
            upstream_requests,
            upstream_latency,
            rate_limit_wait,
            receipt_fallbacks,
            reward_queries,
        })
    }

    /// Count an upstream request.
    ///
    /// # Arguments
    /// * `kind` - "rest" or "rpc"
    /// * `outcome` - "ok", "error", or "throttled"
    pub fn inc_upstream_requests(&self, kind: &str, outcome: &str) {
        self.upstream_requests.with_label_values(&[kind, outcome]).inc();
    }

    /// Record upstream call latency.
    pub fn observe_upstream_latency(&self, operation: &str, duration_secs: f64) {
        self.upstream_latency
            .with_label_values(&[operation])
            .observe(duration_secs);
    }

    /// Record how long a request waited on the rate limiter.
    pub fn observe_rate_limit_wait(&self, duration_secs: f64) {
        self.rate_limit_wait.observe(duration_secs);
    }

    /// Increment the receipt fallback counter.
    pub fn inc_receipt_fallbacks(&self) {
        self.receipt_fallbacks.inc();
    }

    /// Increment the reward query counter for a classification.
    pub fn inc_reward_queries(&self, status: &str) {
        self.reward_queries.with_label_values(&[status]).inc();
    }

    /// Get Prometheus metrics as a string.
    pub fn gather(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
