use std::future::Future;
use std::time::Duration;

/// Политика повторных попыток загрузки данных
///
/// Executor-agnostic: the caller passes the sleep function (`gloo_timers` in the
/// browser, `tokio::time::sleep` on the server).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Runs `op` until it succeeds or attempts are exhausted, sleeping `delay`
    /// between attempts. `op` receives the 1-based attempt number. Returns the
    /// last error on exhaustion.
    pub async fn run<T, E, Op, Fut, Sleep, SleepFut>(&self, mut op: Op, mut sleep: Sleep) -> Result<T, E>
    where
        Op: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        Sleep: FnMut(Duration) -> SleepFut,
        SleepFut: Future<Output = ()>,
    {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if attempt >= attempts => return Err(e),
                Err(_) => {
                    sleep(self.delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[tokio::test]
    async fn test_succeeds_after_transient_failures() {
        let policy = RetryPolicy::new(3, Duration::from_millis(5));
        let sleeps = Cell::new(0);
        let result: Result<&str, String> = policy
            .run(
                |attempt| async move {
                    if attempt < 3 {
                        Err(format!("attempt {} failed", attempt))
                    } else {
                        Ok("rows")
                    }
                },
                |_| {
                    sleeps.set(sleeps.get() + 1);
                    async {}
                },
            )
            .await;
        assert_eq!(result, Ok("rows"));
        assert_eq!(sleeps.get(), 2);
    }

    #[tokio::test]
    async fn test_returns_last_error_when_exhausted() {
        let policy = RetryPolicy::default();
        let calls = Cell::new(0);
        let result: Result<(), String> = policy
            .run(
                |attempt| {
                    calls.set(calls.get() + 1);
                    async move { Err(format!("attempt {}", attempt)) }
                },
                |_| async {},
            )
            .await;
        assert_eq!(result, Err("attempt 3".to_string()));
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn test_zero_attempts_still_tries_once() {
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_attempts, 1);
    }
}
