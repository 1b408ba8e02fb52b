//! Retry with exponential backoff and jitter, used to absorb transient
//! external failures (search provider, page fetch, adjudicator) so a
//! blip doesn't need a human to intervene before the next worker tick.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{error, info, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub backoff_multiplier: f64,
    pub jitter_factor: f64,
    pub use_exponential_backoff: bool,
    pub use_jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_ms: 1000,
            max_delay_ms: 30_000,
            backoff_multiplier: 2.0,
            jitter_factor: 0.1,
            use_exponential_backoff: true,
            use_jitter: true,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RetryError {
    #[error("max retry attempts exceeded: {attempts}")]
    MaxAttemptsExceeded { attempts: u32 },
    #[error("retry aborted: {reason}")]
    Aborted { reason: String },
    #[error("underlying error: {0}")]
    Underlying(#[from] Box<dyn std::error::Error + Send + Sync>),
}

pub trait RetryPolicy: Send + Sync {
    fn should_retry(&self, attempt: u32, error: &dyn std::error::Error) -> bool;
}

pub struct DefaultRetryPolicy {
    max_attempts: u32,
}

impl RetryPolicy for DefaultRetryPolicy {
    fn should_retry(&self, attempt: u32, _error: &dyn std::error::Error) -> bool {
        attempt < self.max_attempts
    }
}

pub struct RetryExecutor {
    config: RetryConfig,
    policy: Box<dyn RetryPolicy>,
}

impl RetryExecutor {
    pub fn new(config: RetryConfig, policy: Box<dyn RetryPolicy>) -> Self {
        Self { config, policy }
    }

    pub fn with_default_policy(config: RetryConfig) -> Self {
        let policy = Box::new(DefaultRetryPolicy {
            max_attempts: config.max_attempts,
        });
        Self::new(config, policy)
    }

    pub async fn execute<F, T, E>(&self, operation: F) -> Result<T, RetryError>
    where
        F: Fn() -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<T, E>> + Send>>,
        E: std::error::Error + Send + Sync + 'static,
    {
        let mut attempt = 0;
        let mut total_delay_ms = 0;

        loop {
            attempt += 1;

            match operation().await {
                Ok(result) => {
                    info!(attempt, total_delay_ms, "operation succeeded");
                    return Ok(result);
                }
                Err(error) => {
                    if !self.policy.should_retry(attempt, &error) || attempt >= self.config.max_attempts {
                        error!(attempt, total_delay_ms, %error, "operation failed, not retrying");
                        return Err(RetryError::MaxAttemptsExceeded { attempts: attempt });
                    }

                    let delay_ms = self.calculate_delay(attempt);
                    total_delay_ms += delay_ms;
                    warn!(attempt, delay_ms, %error, "operation failed, retrying");
                    sleep(Duration::from_millis(delay_ms)).await;
                }
            }
        }
    }

    fn calculate_delay(&self, attempt: u32) -> u64 {
        let mut delay_ms = self.config.initial_delay_ms;

        if self.config.use_exponential_backoff {
            delay_ms = (delay_ms as f64 * self.config.backoff_multiplier.powi(attempt as i32 - 1)) as u64;
        }
        delay_ms = delay_ms.min(self.config.max_delay_ms);

        if self.config.use_jitter && self.config.jitter_factor > 0.0 {
            let jitter_range = (delay_ms as f64 * self.config.jitter_factor) as u64;
            let jitter = rand::thread_rng().gen_range(0..=jitter_range);
            delay_ms = delay_ms.saturating_sub(jitter);
        }

        delay_ms
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }
}

pub async fn retry<F, T, E>(operation: F, config: RetryConfig) -> Result<T, RetryError>
where
    F: Fn() -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<T, E>> + Send>>,
    E: std::error::Error + Send + Sync + 'static,
{
    RetryExecutor::with_default_policy(config).execute(operation).await
}
