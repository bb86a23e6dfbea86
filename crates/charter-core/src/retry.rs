//! Bounded exponential backoff for Layer B retries.

use std::time::Duration;

/// How many times to call the classifier and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Zero is treated as one.
    pub max_attempts: u32,
    pub backoff_base: Duration,
    pub backoff_max: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_base: Duration::from_millis(250),
            backoff_max: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Delay before retry number `retry` (0 for the first retry).
    ///
    /// Doubles from `backoff_base` up to `backoff_max`, then applies a small
    /// deterministic spread so concurrent runs do not retry in lockstep.
    pub fn backoff_delay(&self, retry: u32) -> Duration {
        let base = self.backoff_base.as_millis().max(1) as f64;
        let max = self.backoff_max.as_millis().max(1) as f64;
        let exp = retry.min(30) as i32;
        let without_jitter = (base * 2f64.powi(exp)).min(max);
        let jitter_factor = 0.9 + (retry % 3) as f64 * 0.05;
        Duration::from_millis((without_jitter * jitter_factor) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_grows_then_caps() {
        let policy = RetryPolicy::default();
        let d0 = policy.backoff_delay(0);
        let d1 = policy.backoff_delay(1);
        let d2 = policy.backoff_delay(2);
        assert!(d0 < d1 && d1 < d2);
        assert!(policy.backoff_delay(10) <= Duration::from_millis(2_200));
        assert!(policy.backoff_delay(u32::MAX) <= Duration::from_millis(2_200));
    }

    #[test]
    fn test_first_delay_near_base() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff_delay(0), Duration::from_millis(225));
    }

    #[test]
    fn test_zero_attempts_means_one() {
        let policy = RetryPolicy {
            max_attempts: 0,
            ..RetryPolicy::default()
        };
        assert_eq!(policy.attempts(), 1);
        assert_eq!(RetryPolicy::no_retry().attempts(), 1);
    }
}
