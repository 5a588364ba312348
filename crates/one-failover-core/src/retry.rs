//! Bounded retries with a fixed delay

use std::{thread, time::Duration};

/// An explicit retry contract: how often and how spaced
///
/// The readiness probes and the shutdown convergence loop poll at fixed
/// intervals, so there is no backoff.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    #[must_use]
    pub const fn new(max_attempts: u32, delay: Duration) -> Self {
        Self { max_attempts, delay }
    }

    /// Run `op` until it succeeds or the attempt budget is exhausted
    ///
    /// `op` runs at least once. The delay is slept between attempts, not
    /// after the last one. Returns the first success or the last error.
    pub fn run<T, E, F>(&self, mut op: F) -> Result<T, E>
    where
        F: FnMut() -> Result<T, E>,
    {
        let mut attempt = 1;
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(err) => {
                    if attempt >= self.max_attempts {
                        return Err(err);
                    }
                    attempt += 1;
                    thread::sleep(self.delay);
                }
            }
        }
    }
}
