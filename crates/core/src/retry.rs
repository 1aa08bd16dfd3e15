//! Bounded retry with a fixed backoff delay.

use std::fmt::Display;
use std::thread;
use std::time::Duration;

/// How many times to try an operation and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub attempts: u32,

    /// Pause between attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// Create the default policy: 3 attempts, 2 seconds apart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the total number of attempts (at least 1).
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts.max(1);
        self
    }

    /// Set the pause between attempts.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Run `op` until it succeeds, fails with a non-retryable error, or
    /// the attempts run out. The last error is returned unchanged.
    pub fn run<T, E, F, R>(&self, is_retryable: R, mut op: F) -> Result<T, E>
    where
        F: FnMut() -> Result<T, E>,
        R: Fn(&E) -> bool,
        E: Display,
    {
        let attempts = self.attempts.max(1);
        let mut attempt = 1;

        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(e) if attempt < attempts && is_retryable(&e) => {
                    log::warn!(
                        "Attempt {}/{} failed, retrying in {:?}: {}",
                        attempt,
                        attempts,
                        self.delay,
                        e
                    );
                    if !self.delay.is_zero() {
                        thread::sleep(self.delay);
                    }
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Run `op` under `policy`, retrying whatever `is_retryable` allows.
pub fn retry<T, E, F, R>(policy: &RetryPolicy, is_retryable: R, op: F) -> Result<T, E>
where
    F: FnMut() -> Result<T, E>,
    R: Fn(&E) -> bool,
    E: Display,
{
    policy.run(is_retryable, op)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn quick(attempts: u32) -> RetryPolicy {
        RetryPolicy::new()
            .with_attempts(attempts)
            .with_delay(Duration::ZERO)
    }

    fn transient() -> Error {
        Error::Transport {
            provider: "OpenAI".to_string(),
            message: "timed out".to_string(),
        }
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.attempts, 3);
        assert_eq!(policy.delay, Duration::from_secs(2));
    }

    #[test]
    fn test_succeeds_first_try() {
        let mut calls = 0;
        let result: Result<u32, Error> = retry(&quick(3), Error::is_retryable, || {
            calls += 1;
            Ok(7)
        });
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_recovers_after_transient_failures() {
        let mut calls = 0;
        let result = retry(&quick(3), Error::is_retryable, || {
            calls += 1;
            if calls < 3 {
                Err(transient())
            } else {
                Ok("done")
            }
        });
        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_gives_up_after_attempts() {
        let mut calls = 0;
        let result: Result<(), Error> = retry(&quick(3), Error::is_retryable, || {
            calls += 1;
            Err(transient())
        });
        assert!(matches!(result, Err(Error::Transport { .. })));
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_does_not_retry_permanent_errors() {
        let mut calls = 0;
        let result: Result<(), Error> = retry(&quick(5), Error::is_retryable, || {
            calls += 1;
            Err(Error::Api {
                provider: "Anthropic".to_string(),
                status: 401,
                message: "invalid x-api-key".to_string(),
            })
        });
        assert!(result.is_err());
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_zero_attempts_still_runs_once() {
        let policy = RetryPolicy {
            attempts: 0,
            delay: Duration::ZERO,
        };
        let mut calls = 0;
        let result: Result<(), Error> = retry(&policy, |_| true, || {
            calls += 1;
            Err(transient())
        });
        assert!(result.is_err());
        assert_eq!(calls, 1);
    }
}
