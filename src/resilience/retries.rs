//! Retry policy for upstream provider calls.
//!
//! # Responsibilities
//! - Decide whether an upstream outcome is worth another attempt
//! - Enforce a retry budget so retries stay a fraction of total traffic
//!
//! # Design Decisions
//! - Only GET calls are retried; POSTs to downloaders are not replayed
//! - Transport errors, 429 and 502/503/504 are retryable; other statuses are final

use std::sync::atomic::{AtomicU64, Ordering};

use reqwest::{Method, StatusCode};

/// Whether an upstream outcome should be retried.
///
/// `status` is `None` when the request failed before a response arrived.
pub fn is_retryable(method: &Method, status: Option<StatusCode>) -> bool {
    if method != Method::GET && method != Method::HEAD {
        return false;
    }

    match status {
        None => true,
        Some(status) => matches!(
            status,
            StatusCode::TOO_MANY_REQUESTS
                | StatusCode::BAD_GATEWAY
                | StatusCode::SERVICE_UNAVAILABLE
                | StatusCode::GATEWAY_TIMEOUT
        ),
    }
}

/// Token budget limiting retries to a ratio of first attempts.
///
/// Each recorded request deposits `ratio` tokens (scaled by 1000); each retry
/// withdraws one whole token. A small floor lets a cold process retry at all.
#[derive(Debug)]
pub struct RetryBudget {
    ratio_milli: u64,
    balance_milli: AtomicU64,
    max_balance_milli: u64,
}

impl RetryBudget {
    pub fn new(ratio: f32, min_retries: u64) -> Self {
        let ratio_milli = (ratio.clamp(0.0, 1.0) * 1000.0) as u64;
        Self {
            ratio_milli,
            balance_milli: AtomicU64::new(min_retries * 1000),
            max_balance_milli: (min_retries.max(1) * 1000) * 10,
        }
    }

    /// Record a first attempt, topping up the budget.
    pub fn record_request(&self) {
        let _ = self
            .balance_milli
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |b| {
                Some((b + self.ratio_milli).min(self.max_balance_milli))
            });
    }

    /// Try to spend one retry token.
    pub fn can_retry(&self) -> bool {
        self.balance_milli
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |b| b.checked_sub(1000))
            .is_ok()
    }
}
