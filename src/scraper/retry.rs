// src/scraper/retry.rs

use std::time::Duration;

use rand::Rng;

/// Pacing for repeated attempts at the same page. The policy is injected
/// into the fetcher so callers can trade politeness for speed without
/// touching the fetch loop.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts per page, the first try included.
    pub max_attempts: u32,
    /// Wait after failed attempt n is `backoff * n`, capped at
    /// `max_backoff`. Equal values give a constant wait.
    pub backoff: Duration,
    pub max_backoff: Duration,
    /// Random extra slack in whole seconds, drawn from 0..=jitter_secs and
    /// added to every wait.
    pub jitter_secs: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_secs(5),
            max_backoff: Duration::from_secs(5),
            jitter_secs: 0,
        }
    }
}

impl RetryPolicy {
    /// Delay to sleep after failed attempt number `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let ramped = self.backoff.saturating_mul(attempt).min(self.max_backoff);
        let jitter = rand::thread_rng().gen_range(0..=self.jitter_secs);
        ramped + Duration::from_secs(jitter)
    }
}
