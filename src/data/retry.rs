//! Retry policy for upstream calls
//!
//! Explicit, bounded retry with exponential backoff, applied only at the
//! provider boundary and only on rate-limit signals. Other failures
//! surface immediately; the caller decides how to degrade.

use std::thread;
use std::time::Duration;

use crate::core::{DashError, DashResult};

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Run `op`, retrying with exponential backoff while the upstream
    /// reports throttling.
    pub fn run<T>(&self, mut op: impl FnMut() -> DashResult<T>) -> DashResult<T> {
        let mut last: Option<DashError> = None;

        for attempt in 0..self.max_attempts {
            match op() {
                Ok(value) => return Ok(value),
                Err(err) if err.is_rate_limit() && attempt + 1 < self.max_attempts => {
                    let delay = self.base_delay * 2u32.pow(attempt);
                    tracing::warn!(attempt, ?delay, "rate limited, backing off");
                    thread::sleep(delay);
                    last = Some(err);
                }
                Err(err) => return Err(err),
            }
        }

        Err(last.unwrap_or_else(|| DashError::network("retry budget exhausted")))
    }
}
