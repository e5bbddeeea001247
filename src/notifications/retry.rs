use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;

use crate::config::NotificationConfig;

/// Exponential backoff for notification delivery.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub delay_multiplier: f64,
    pub max_delay_ms: u64,
    pub attempt_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_ms: 500,
            delay_multiplier: 2.0,
            max_delay_ms: 30_000,
            attempt_timeout: Duration::from_secs(15),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &NotificationConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            initial_delay_ms: config.retry_delay_ms,
            ..Self::default()
        }
    }

    /// Delay to wait after the given failed attempt (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = self
            .delay_multiplier
            .powi(attempt.saturating_sub(1).min(32) as i32);
        let delay = (self.initial_delay_ms as f64 * factor) as u64;
        Duration::from_millis(delay.min(self.max_delay_ms))
    }

    /// Runs `operation` until it succeeds or attempts run out. Returns the
    /// last error message on exhaustion.
    pub async fn run<F, Fut, T, E>(&self, operation_name: &str, mut operation: F) -> Result<T, String>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let mut last_error = String::new();

        for attempt in 1..=self.max_attempts {
            match timeout(self.attempt_timeout, operation()).await {
                Ok(Ok(value)) => {
                    if attempt > 1 {
                        tracing::info!(operation = operation_name, attempt, "Succeeded after retry");
                    }
                    return Ok(value);
                }
                Ok(Err(e)) => {
                    last_error = e.to_string();
                    tracing::warn!(operation = operation_name, attempt, error = %last_error, "Attempt failed");
                }
                Err(_) => {
                    last_error = format!("timed out after {:?}", self.attempt_timeout);
                    tracing::warn!(operation = operation_name, attempt, "Attempt timed out");
                }
            }

            if attempt < self.max_attempts {
                tokio::time::sleep(self.delay_after(attempt)).await;
            }
        }

        Err(last_error)
    }
}
