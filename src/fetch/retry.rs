//! Bounded retry with exponential back-off.

use reqwest::StatusCode;
use std::time::Duration;

pub const DEFAULT_RETRIES: u32 = 5;
pub const DEFAULT_BACKOFF_FACTOR: f64 = 0.2;

/// Statuses worth asking again for. Everything else is returned to the caller as is.
pub const RETRY_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

const MAX_BACKOFF_SECS: f64 = 120.0;

/// How often and how patiently a failed request is repeated.
///
/// `retries` counts the extra attempts after the first one. Before retry `n`
/// (1-based) the session sleeps `backoff_factor * 2^(n - 1)` seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub retries: u32,
    pub backoff_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: DEFAULT_RETRIES,
            backoff_factor: DEFAULT_BACKOFF_FACTOR,
        }
    }
}

impl RetryPolicy {
    pub fn new(retries: u32, backoff_factor: f64) -> Self {
        Self {
            retries,
            backoff_factor,
        }
    }

    /// A policy that never retries.
    pub fn none() -> Self {
        Self::new(0, 0.0)
    }

    /// Total number of requests made before giving up.
    pub fn max_attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }

    /// Sleep before retry number `attempt`. Attempt 0 is the initial request.
    pub fn delay(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        let exponent = attempt.saturating_sub(1).min(30) as i32;
        let secs = (self.backoff_factor.max(0.0) * 2f64.powi(exponent)).min(MAX_BACKOFF_SECS);
        Duration::from_secs_f64(secs)
    }
}

pub fn is_retryable_status(status: StatusCode) -> bool {
    RETRY_STATUSES.contains(&status.as_u16())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_delays() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts(), 6);
        assert_eq!(policy.delay(0), Duration::ZERO);
        assert_eq!(policy.delay(1), Duration::from_millis(200));
        assert_eq!(policy.delay(2), Duration::from_millis(400));
        assert_eq!(policy.delay(5), Duration::from_millis(3200));
    }

    #[test]
    fn test_delay_is_capped() {
        let policy = RetryPolicy::new(100, 10.0);
        assert_eq!(policy.delay(60), Duration::from_secs(120));
        assert_eq!(RetryPolicy::new(3, -1.0).delay(2), Duration::ZERO);
    }

    #[test]
    fn test_retryable_statuses() {
        assert!(is_retryable_status(StatusCode::TOO_MANY_REQUESTS));
        assert!(is_retryable_status(StatusCode::SERVICE_UNAVAILABLE));
        assert!(is_retryable_status(StatusCode::GATEWAY_TIMEOUT));
        assert!(!is_retryable_status(StatusCode::NOT_FOUND));
        assert!(!is_retryable_status(StatusCode::UNAUTHORIZED));
        assert!(!is_retryable_status(StatusCode::NOT_IMPLEMENTED));
    }
}
