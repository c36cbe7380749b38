//! Bounded retry with exponential backoff and per-attempt timeout

use crate::llm::GeneratorError;
use log::warn;
use std::future::Future;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub attempt_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_millis(1000),
            attempt_timeout: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `retry` (1-based): base, 2*base, 4*base, ...
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 1u32.checked_shl(retry.saturating_sub(1)).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }

    /// Run `operation` until it succeeds, fails with a non-retryable error,
    /// or the attempts run out.
    pub async fn run<T, F, Fut>(&self, mut operation: F) -> Result<T, GeneratorError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, GeneratorError>>,
    {
        let attempts = self.max_attempts.max(1);
        let mut last_error = GeneratorError::Unavailable;

        for attempt in 1..=attempts {
            if attempt > 1 {
                let delay = self.delay_for(attempt - 1);
                warn!(
                    "Generator attempt {} failed ({}), retrying after {}ms...",
                    attempt - 1,
                    last_error,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let outcome = match tokio::time::timeout(self.attempt_timeout, operation(attempt)).await {
                Ok(outcome) => outcome,
                Err(_) => Err(GeneratorError::Timeout(self.attempt_timeout.as_secs())),
            };

            match outcome {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() => last_error = e,
                Err(e) => return Err(e),
            }
        }

        Err(GeneratorError::Exhausted {
            attempts,
            last: last_error.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_delay: Duration::from_millis(100),
            attempt_timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_backoff_doubles() {
        let policy = policy(5);
        assert_eq!(policy.delay_for(1), Duration::from_millis(100));
        assert_eq!(policy.delay_for(2), Duration::from_millis(200));
        assert_eq!(policy.delay_for(4), Duration::from_millis(800));
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let result = policy(5)
            .run(|attempt| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if attempt < 3 {
                        Err(GeneratorError::Transient("503".to_string()))
                    } else {
                        Ok(attempt)
                    }
                }
            })
            .await;

        assert_eq!(result, Ok(3));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = policy(4)
            .run(|_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(GeneratorError::Transient("connection reset".to_string())) }
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 4);
        match result {
            Err(GeneratorError::Exhausted { attempts, last }) => {
                assert_eq!(attempts, 4);
                assert!(last.contains("connection reset"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejection_is_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = policy(5)
            .run(|_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(GeneratorError::Rejected("401 invalid x-api-key".to_string())) }
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(GeneratorError::Rejected(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_attempts_time_out() {
        let result: Result<(), _> = RetryPolicy {
            max_attempts: 2,
            base_delay: Duration::from_millis(10),
            attempt_timeout: Duration::from_secs(1),
        }
        .run(|_| async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok(())
        })
        .await;

        match result {
            Err(GeneratorError::Exhausted { attempts, last }) => {
                assert_eq!(attempts, 2);
                assert!(last.contains("timed out"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
