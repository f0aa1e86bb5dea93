use rand::Rng;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Explicit retry policy: attempt cap, exponential base and wait ceiling.
///
/// The wait before attempt `n` is drawn uniformly from
/// `0..=min(base * 2^n, max_delay)` (full jitter).
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// Policy for document downloads: 3 attempts, waits capped at 5s.
    pub fn download() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(5),
        }
    }

    /// Policy for model invocations: 3 attempts, waits capped at 10s.
    pub fn model() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
        }
    }

    fn backoff(&self, attempt: u32) -> Duration {
        let exp = self
            .base_delay
            .saturating_mul(2u32.saturating_pow(attempt));
        let capped = exp.min(self.max_delay);
        let millis = capped.as_millis() as u64;
        if millis == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::thread_rng().gen_range(0..=millis))
    }
}

/// Run `operation` until it succeeds or the policy's attempt cap is hit,
/// returning the last error on exhaustion.
pub async fn retry<T, E, F, Fut>(policy: RetryPolicy, mut operation: F) -> Result<T, E>
where
    E: Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                attempt += 1;
                if attempt >= policy.max_attempts {
                    return Err(err);
                }
                let wait = policy.backoff(attempt);
                log::warn!(
                    "attempt {attempt}/{} failed ({err}), retrying in {}ms",
                    policy.max_attempts,
                    wait.as_millis()
                );
                tokio::time::sleep(wait).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test(start_paused = true)]
    async fn succeeds_on_third_attempt() {
        let calls = AtomicU32::new(0);
        let result = retry(RetryPolicy::download(), || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if n <= 2 {
                    Err(format!("transient failure {n}"))
                } else {
                    Ok("content")
                }
            }
        })
        .await;
        assert_eq!(result, Ok("content"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn exhaustion_returns_last_error() {
        let calls = AtomicU32::new(0);
        let result: Result<&str, String> = retry(RetryPolicy::download(), || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move { Err(format!("transient failure {n}")) }
        })
        .await;
        assert_eq!(result, Err("transient failure 3".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn first_success_does_not_retry() {
        let calls = AtomicU32::new(0);
        let result: Result<&str, String> = retry(RetryPolicy::model(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok("content") }
        })
        .await;
        assert_eq!(result, Ok("content"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn backoff_respects_ceiling() {
        let policy = RetryPolicy {
            max_attempts: 5,
            base_delay: Duration::from_secs(4),
            max_delay: Duration::from_secs(5),
        };
        for attempt in 0..5 {
            assert!(policy.backoff(attempt) <= policy.max_delay);
        }
    }
}
