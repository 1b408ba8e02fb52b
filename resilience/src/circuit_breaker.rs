//! Circuit breaker: prevents cascading failures by detecting repeated
//! errors from an external dependency and temporarily refusing calls to
//! it.
//!
//! States:
//! - Closed: normal operation
//! - Open: failing, reject all requests
//! - HalfOpen: testing whether the dependency has recovered

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};
use tokio::sync::RwLock;
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
#[error("circuit breaker is open: {message}")]
pub struct CircuitBreakerOpenError {
    pub message: String,
    pub circuit_name: Option<String>,
    pub stats: CircuitBreakerStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircuitBreakerConfig {
    pub name: Option<String>,
    pub failure_threshold: u64,
    pub success_threshold: u64,
    pub timeout_ms: Option<u64>,
    pub reset_timeout_ms: u64,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            name: None,
            failure_threshold: 5,
            success_threshold: 2,
            timeout_ms: Some(15_000),
            reset_timeout_ms: 60_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircuitBreakerStats {
    pub state: CircuitState,
    pub failure_count: u64,
    pub success_count: u64,
    pub total_requests: u64,
    pub last_failure: Option<SystemTime>,
    pub last_success: Option<SystemTime>,
}

/// Wraps an external call (evidence search, page fetch, adjudicator
/// tier) so repeated failures trip the circuit instead of piling up
/// timeouts on every subsequent request.
pub struct CircuitBreaker {
    config: CircuitBreakerConfig,
    state: AtomicU8,
    failure_count: AtomicU64,
    success_count: AtomicU64,
    total_requests: AtomicU64,
    next_attempt: Arc<RwLock<Instant>>,
    last_failure: Arc<RwLock<Option<SystemTime>>>,
    last_success: Arc<RwLock<Option<SystemTime>>>,
}

type BoxedError = Box<dyn std::error::Error + Send + Sync>;

impl CircuitBreaker {
    pub fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            next_attempt: Arc::new(RwLock::new(Instant::now())),
            last_failure: Arc::new(RwLock::new(None)),
            last_success: Arc::new(RwLock::new(None)),
            state: AtomicU8::new(0),
            failure_count: AtomicU64::new(0),
            success_count: AtomicU64::new(0),
            total_requests: AtomicU64::new(0),
            config,
        }
    }

    /// Execute `operation`, falling back to `fallback` if the circuit is
    /// open or `operation` fails and a fallback was given.
    pub async fn execute<F, T>(
        &self,
        operation: F,
        fallback: Option<Box<dyn Fn() -> Result<T, BoxedError> + Send + Sync>>,
    ) -> Result<T, BoxedError>
    where
        F: FnOnce() -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<T, BoxedError>> + Send>>,
    {
        self.total_requests.fetch_add(1, Ordering::Relaxed);

        if self.get_state() == CircuitState::Open {
            let next_attempt = *self.next_attempt.read().await;
            if Instant::now() < next_attempt {
                if let Some(fallback_fn) = fallback {
                    return fallback_fn();
                }
                return Err(Box::new(CircuitBreakerOpenError {
                    message: format!(
                        "circuit breaker open, next attempt in {}ms",
                        next_attempt.duration_since(Instant::now()).as_millis()
                    ),
                    circuit_name: self.config.name.clone(),
                    stats: self.get_stats().await,
                }));
            }
            self.state.store(2, Ordering::Relaxed);
            self.success_count.store(0, Ordering::Relaxed);
        }

        let result = if let Some(timeout_ms) = self.config.timeout_ms {
            self.execute_with_timeout(operation, timeout_ms).await
        } else {
            operation().await
        };

        match result {
            Ok(value) => {
                self.on_success().await;
                Ok(value)
            }
            Err(error) => {
                self.on_failure().await;
                if let Some(fallback_fn) = fallback {
                    return fallback_fn();
                }
                Err(error)
            }
        }
    }

    async fn execute_with_timeout<F, T>(&self, operation: F, timeout_ms: u64) -> Result<T, BoxedError>
    where
        F: FnOnce() -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<T, BoxedError>> + Send>>,
    {
        match tokio::time::timeout(Duration::from_millis(timeout_ms), operation()).await {
            Ok(result) => result,
            Err(_) => Err(Box::new(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                "operation timed out",
            ))),
        }
    }

    async fn on_success(&self) {
        self.failure_count.store(0, Ordering::Relaxed);
        *self.last_success.write().await = Some(SystemTime::now());

        if self.get_state() == CircuitState::HalfOpen {
            let success_count = self.success_count.fetch_add(1, Ordering::Relaxed) + 1;
            if success_count >= self.config.success_threshold {
                self.state.store(0, Ordering::Relaxed);
                self.success_count.store(0, Ordering::Relaxed);
                info!(
                    circuit = self.config.name.as_deref().unwrap_or("unnamed"),
                    success_count, "circuit breaker closed"
                );
            }
        }
    }

    async fn on_failure(&self) {
        let failure_count = self.failure_count.fetch_add(1, Ordering::Relaxed) + 1;
        *self.last_failure.write().await = Some(SystemTime::now());

        if self.get_state() == CircuitState::HalfOpen || failure_count >= self.config.failure_threshold {
            self.state.store(1, Ordering::Relaxed);
            *self.next_attempt.write().await = Instant::now() + Duration::from_millis(self.config.reset_timeout_ms);
            self.success_count.store(0, Ordering::Relaxed);
            warn!(
                circuit = self.config.name.as_deref().unwrap_or("unnamed"),
                failure_count, "circuit breaker opened"
            );
        }
    }

    pub fn get_state(&self) -> CircuitState {
        match self.state.load(Ordering::Relaxed) {
            0 => CircuitState::Closed,
            1 => CircuitState::Open,
            2 => CircuitState::HalfOpen,
            _ => CircuitState::Closed,
        }
    }

    pub async fn get_stats(&self) -> CircuitBreakerStats {
        CircuitBreakerStats {
            state: self.get_state(),
            failure_count: self.failure_count.load(Ordering::Relaxed),
            success_count: self.success_count.load(Ordering::Relaxed),
            total_requests: self.total_requests.load(Ordering::Relaxed),
            last_failure: *self.last_failure.read().await,
            last_success: *self.last_success.read().await,
        }
    }

    pub async fn reset(&self) {
        self.state.store(0, Ordering::Relaxed);
        self.failure_count.store(0, Ordering::Relaxed);
        self.success_count.store(0, Ordering::Relaxed);
        *self.last_failure.write().await = None;
        *self.last_success.write().await = None;
    }

    pub async fn force_open(&self, timeout_ms: Option<u64>) {
        self.state.store(1, Ordering::Relaxed);
        let timeout = timeout_ms.unwrap_or(self.config.reset_timeout_ms);
        *self.next_attempt.write().await = Instant::now() + Duration::from_millis(timeout);
    }
}

impl std::fmt::Debug for CircuitBreaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CircuitBreaker")
            .field("config", &self.config)
            .field("state", &self.get_state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn starts_closed() {
        let cb = CircuitBreaker::new(CircuitBreakerConfig::default());
        assert_eq!(cb.get_state(), CircuitState::Closed);
    }

    #[tokio::test]
    async fn success_keeps_circuit_closed() {
        let cb = CircuitBreaker::new(CircuitBreakerConfig {
            failure_threshold: 2,
            success_threshold: 1,
            ..Default::default()
        });

        let result = cb
            .execute(|| Box::pin(async { Ok::<i32, BoxedError>(42) }), None)
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(cb.get_state(), CircuitState::Closed);
    }

    #[tokio::test]
    async fn repeated_failure_opens_circuit() {
        let cb = CircuitBreaker::new(CircuitBreakerConfig {
            failure_threshold: 2,
            success_threshold: 1,
            ..Default::default()
        });

        for _ in 0..2 {
            let _ = cb
                .execute::<_, i32>(
                    || Box::pin(async { Err(Box::new(std::io::Error::new(std::io::ErrorKind::Other, "boom")) as BoxedError) }),
                    None,
                )
                .await;
        }

        assert_eq!(cb.get_state(), CircuitState::Open);
    }

    #[tokio::test]
    async fn fallback_is_used_when_open() {
        let cb = CircuitBreaker::new(CircuitBreakerConfig {
            failure_threshold: 1,
            success_threshold: 1,
            ..Default::default()
        });
        cb.force_open(None).await;

        let fallback: Box<dyn Fn() -> Result<i32, BoxedError> + Send + Sync> = Box::new(|| Ok(99));
        let result = cb
            .execute(
                || Box::pin(async { Err(Box::new(std::io::Error::new(std::io::ErrorKind::Other, "boom")) as BoxedError) }),
                Some(fallback),
            )
            .await;

        assert_eq!(result.unwrap(), 99);
    }

    #[tokio::test]
    async fn reset_returns_to_closed() {
        let cb = CircuitBreaker::new(CircuitBreakerConfig::default());
        cb.force_open(None).await;
        assert_eq!(cb.get_state(), CircuitState::Open);
        cb.reset().await;
        assert_eq!(cb.get_state(), CircuitState::Closed);
    }
}
