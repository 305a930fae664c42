use std::time::Duration;

use crate::foundation::error::{ReelError, ReelResult};

/// Bounded retry with exponential backoff: the wait after attempt `n` (0-based) is `base * 2^n`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> ReelResult<Self> {
        if max_attempts == 0 {
            return Err(ReelError::validation("retry max_attempts must be >= 1"));
        }
        Ok(Self {
            max_attempts,
            base_delay,
        })
    }

    /// Delay before retrying after the failed 0-based `attempt`.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay
            .checked_mul(1u32.checked_shl(attempt).unwrap_or(u32::MAX))
            .unwrap_or(Duration::MAX)
    }

    /// Run `op` until it succeeds or the attempts are used up; the last error is returned.
    pub fn run<T>(&self, what: &str, mut op: impl FnMut(u32) -> ReelResult<T>) -> ReelResult<T> {
        let mut attempt = 0;
        loop {
            match op(attempt) {
                Ok(v) => return Ok(v),
                Err(e) if attempt + 1 >= self.max_attempts => {
                    tracing::warn!(what, attempts = attempt + 1, error = %e, "giving up");
                    return Err(e);
                }
                Err(e) => {
                    let delay = self.delay_after(attempt);
                    tracing::warn!(
                        what,
                        attempt = attempt + 1,
                        max_attempts = self.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "attempt failed, retrying"
                    );
                    std::thread::sleep(delay);
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/collab/retry.rs"]
mod tests;
