//! Reconnect backoff configuration.
//!
//! The delay before reconnect attempt `n` (zero-based) is
//! `factor * exponent_base^n` milliseconds. After `num_of_retries` attempts the
//! delay stops growing and reconnects continue at that ceiling.

use std::time::Duration;

use fred::types::config::ReconnectPolicy;

/// Exponential reconnect backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffStrategy {
    /// Attempts during which the delay grows.
    pub num_of_retries: u32,
    /// Base delay in milliseconds.
    pub factor: u32,
    /// Growth rate of the delay.
    pub exponent_base: u32,
}

impl Default for BackoffStrategy {
    fn default() -> Self {
        Self {
            num_of_retries: 3,
            factor: 2,
            exponent_base: 10,
        }
    }
}

impl BackoffStrategy {
    pub fn new(num_of_retries: u32, factor: u32, exponent_base: u32) -> Self {
        Self {
            num_of_retries,
            factor,
            exponent_base,
        }
    }

    /// Delay before the zero-based reconnect attempt `attempt`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let capped = attempt.min(self.num_of_retries);
        let millis = u64::from(self.exponent_base)
            .saturating_pow(capped)
            .saturating_mul(u64::from(self.factor));
        Duration::from_millis(millis)
    }

    /// Largest delay the strategy produces.
    pub fn max_delay(&self) -> Duration {
        self.delay_for_attempt(self.num_of_retries)
    }

    /// Equivalent fred reconnect policy.
    ///
    /// fred computes `min_delay * base^(k - 1)` for the one-based attempt `k`,
    /// which lines up with `delay_for_attempt(k - 1)`. `max_attempts = 0`
    /// keeps reconnecting at the ceiling instead of giving up.
    pub fn to_reconnect_policy(&self) -> ReconnectPolicy {
        let max_delay = u32::try_from(self.max_delay().as_millis()).unwrap_or(u32::MAX);
        ReconnectPolicy::new_exponential(0, self.factor, max_delay, self.exponent_base)
    }
}

impl From<BackoffStrategy> for ReconnectPolicy {
    fn from(strategy: BackoffStrategy) -> Self {
        strategy.to_reconnect_policy()
    }
}
