//! Token bucket with a burst size of one.
//!
//! Admission is tracked as the next instant a token becomes available. Each
//! caller reserves the earliest free instant and then sleeps until it.

use crate::{CancelToken, TransportError, TransportResult};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};
use tracing::debug;

/// Shared limiter for all upstream traffic.
#[derive(Debug)]
pub struct RateLimiter {
    interval: Duration,
    next_admission: Mutex<Instant>,
}

impl RateLimiter {
    /// Create a limiter admitting `requests_per_second` requests on average.
    pub fn new(requests_per_second: f64) -> TransportResult<Self> {
        if !requests_per_second.is_finite() || requests_per_second <= 0.0 {
            return Err(TransportError::InvalidRate(requests_per_second));
        }
        let interval = Duration::try_from_secs_f64(1.0 / requests_per_second)
            .map_err(|_| TransportError::InvalidRate(requests_per_second))?;

        Ok(Self {
            interval,
            next_admission: Mutex::new(Instant::now()),
        })
    }

    /// Minimum spacing between two admissions.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait for a token.
    ///
    /// Returns how long the caller was delayed. Fails with
    /// [`TransportError::Cancelled`] if `cancel` fires first, in which case the
    /// reservation is handed back when nobody queued behind it.
    pub async fn wait(&self, cancel: &CancelToken) -> TransportResult<Duration> {
        if cancel.is_cancelled() {
            return Err(TransportError::Cancelled);
        }

        let now = Instant::now();
        let admit_at = {
            let mut next = self.next_admission.lock().await;
            let admit_at = (*next).max(now);
            *next = admit_at + self.interval;
            admit_at
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                let mut next = self.next_admission.lock().await;
                if *next == admit_at + self.interval {
                    *next = admit_at;
                }
                debug!("Rate limiter wait cancelled");
                Err(TransportError::Cancelled)
            }
            _ = sleep_until(admit_at) => Ok(admit_at.saturating_duration_since(now)),
        }
    }
}
