use crate::config::CrawlerConfig;
use rand::Rng;
use std::time::Duration;

/// Exponent cap for the backoff; keeps the delay bounded for large retry counts
const MAX_BACKOFF_EXPONENT: u32 = 6;

/// How the controller retries a transient fetch failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first
    pub max_retries: u32,

    /// Delay before the first retry; doubles on every further retry
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay: Duration::from_millis(config.retry_base_delay_ms),
        }
    }

    /// A policy that never retries
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::ZERO,
        }
    }

    /// Delay before retry number `attempt` (0-based), with ±30% jitter
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let exponent = attempt.min(MAX_BACKOFF_EXPONENT);
        let base = self.base_delay.saturating_mul(2_u32.pow(exponent));

        let jitter_factor = rand::thread_rng().gen_range(0.7..1.3);
        base.mul_f64(jitter_factor)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&CrawlerConfig::default())
    }
}
