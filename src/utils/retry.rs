// Retry policy and backoff schedule for the request executor
// Author: kelexine (https://github.com/kelexine)

use crate::config::RetryConfig;
use backoff::ExponentialBackoff;
use std::time::Duration;

/// Attempt budget and delay schedule for one logical operation.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub multiplier: f64,
    pub max_backoff: Duration,
}

impl RetryPolicy {
    /// Policy for ordinary operations (3 attempts by default).
    pub fn standard(config: &RetryConfig) -> Self {
        Self::with_attempts(config, config.standard_attempts)
    }

    /// Policy for the status polling operation (5 attempts by default).
    pub fn polling(config: &RetryConfig) -> Self {
        Self::with_attempts(config, config.polling_attempts)
    }

    fn with_attempts(config: &RetryConfig, attempts: u32) -> Self {
        Self {
            max_attempts: attempts.max(1),
            initial_backoff: Duration::from_millis(config.initial_backoff_ms),
            multiplier: config.backoff_multiplier.max(1.0),
            max_backoff: Duration::from_millis(config.max_backoff_ms),
        }
    }

    /// Create the exponential backoff driving delays between attempts.
    ///
    /// No jitter and no elapsed-time cutoff: the attempt count is the only bound.
    pub fn backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            current_interval: self.initial_backoff,
            initial_interval: self.initial_backoff,
            randomization_factor: 0.0,
            multiplier: self.multiplier,
            max_interval: self.max_backoff,
            max_elapsed_time: None,
            ..Default::default()
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::standard(&RetryConfig::default())
    }
}

/// Determine if an HTTP status code signals a transient server failure
pub fn is_retryable_status(status: u16) -> bool {
    status >= 500
}

#[cfg(test)]
mod tests {
    use super::*;
    use backoff::backoff::Backoff;

    #[test]
    fn test_policy_defaults() {
        let config = RetryConfig::default();
        assert_eq!(RetryPolicy::standard(&config).max_attempts, 3);
        assert_eq!(RetryPolicy::polling(&config).max_attempts, 5);
    }

    #[test]
    fn test_backoff_doubles_from_500ms() {
        let policy = RetryPolicy::polling(&RetryConfig::default());
        let mut backoff = policy.backoff();
        let delays: Vec<u128> = (0..4)
            .map(|_| backoff.next_backoff().unwrap().as_millis())
            .collect();
        assert_eq!(delays, vec![500, 1000, 2000, 4000]);
    }

    #[test]
    fn test_backoff_is_capped() {
        let config = RetryConfig {
            max_backoff_ms: 1500,
            ..RetryConfig::default()
        };
        let mut backoff = RetryPolicy::standard(&config).backoff();
        backoff.next_backoff();
        backoff.next_backoff();
        assert_eq!(backoff.next_backoff().unwrap().as_millis(), 1500);
    }

    #[test]
    fn test_zero_attempts_is_clamped() {
        let config = RetryConfig {
            standard_attempts: 0,
            ..RetryConfig::default()
        };
        assert_eq!(RetryPolicy::standard(&config).max_attempts, 1);
    }

    #[test]
    fn test_is_retryable_status() {
        assert!(is_retryable_status(500));
        assert!(is_retryable_status(502));
        assert!(is_retryable_status(503));
        assert!(!is_retryable_status(401));
        assert!(!is_retryable_status(404));
        assert!(!is_retryable_status(429));
    }
}
