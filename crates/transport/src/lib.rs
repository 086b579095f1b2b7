//! Rate-limited HTTP transport shared by the beacon REST and execution RPC adapters.
//!
//! Both adapters talk to the same upstream host, so every outbound request
//! passes through one token bucket owned by a [`RateLimitedClient`].

pub mod cancel;
pub mod client;
pub mod limiter;

pub use cancel::CancelToken;
pub use client::{RateLimitedClient, RequestKind};
pub use limiter::RateLimiter;

/// Error type for transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request cancelled")]
    Cancelled,
    #[error("invalid rate limit: {0} requests/second")]
    InvalidRate(f64),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;
