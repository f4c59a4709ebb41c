//! Opt-in retry policy for `MealDbClient`.
//!
//! The client never retries unless given a policy. Only transport failures
//! are retried; a response that arrived and failed to decode is final.

use std::time::Duration;

use crate::error::TransportError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    backoff: Duration,
    retry_timeouts: bool,
}

impl RetryPolicy {
    /// Retry connection failures up to `max_retries` times, with no delay.
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            backoff: Duration::ZERO,
            retry_timeouts: false,
        }
    }

    /// Base delay, doubled after each failed attempt.
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Also retry `TransportError::Timeout`.
    pub fn retry_timeouts(mut self, enabled: bool) -> Self {
        self.retry_timeouts = enabled;
        self
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Whether to try again after `error`, given `retries` already made.
    pub fn should_retry(&self, error: &TransportError, retries: u32) -> bool {
        if retries >= self.max_retries {
            return false;
        }
        match error {
            TransportError::ConnectionFailed(_) => true,
            TransportError::Timeout => self.retry_timeouts,
            TransportError::InvalidRequest(_) => false,
        }
    }

    /// Delay before retry number `retry` (1-based).
    pub fn delay(&self, retry: u32) -> Duration {
        let factor = 1u32.checked_shl(retry.saturating_sub(1)).unwrap_or(u32::MAX);
        self.backoff.saturating_mul(factor)
    }
}
