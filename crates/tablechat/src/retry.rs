//! Backoff policy for rate-limited model calls.

use std::time::Duration;

/// A fixed attempt ceiling with a doubling delay between attempts. The
/// schedule is pure data; the pipeline owns the sleeping.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(6),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, initial_delay: Duration) -> Self {
        Self {
            max_attempts,
            initial_delay,
        }
    }

    /// Delay before the retry that follows `attempt` (1-based): the initial
    /// delay after the first attempt, doubled after each further one.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.initial_delay * 2u32.saturating_pow(attempt.saturating_sub(1))
    }
}
