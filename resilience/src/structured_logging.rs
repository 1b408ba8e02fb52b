//! Structured logging helper layered on top of `tracing`.
//!
//! Plain `tracing::{info,warn,error}!` calls are used throughout the
//! workspace for ordinary events. This module exists for the worker
//! loop and orchestrator, which want a correlation id threaded through
//! a whole tick or a whole verification so related log lines can be
//! grepped together.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub service_name: String,
    pub component_name: String,
    pub log_level: LogLevel,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            service_name: "claimguard".to_string(),
            component_name: "unknown".to_string(),
            log_level: LogLevel::Info,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredLogEntry {
    pub correlation_id: String,
    pub service: String,
    pub component: String,
    pub operation: String,
    pub metadata: HashMap<String, serde_json::Value>,
}

/// Carries a correlation id and a bag of metadata across the lifetime of
/// a worker tick or a single verification call.
#[derive(Clone)]
pub struct StructuredLogger {
    config: LoggingConfig,
    correlation_id: Arc<RwLock<Option<String>>>,
    metadata: Arc<RwLock<HashMap<String, serde_json::Value>>>,
}

impl StructuredLogger {
    pub fn new(config: LoggingConfig) -> Self {
        Self {
            config,
            correlation_id: Arc::new(RwLock::new(None)),
            metadata: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn set_correlation_id(&self, id: impl Into<String>) {
        *self.correlation_id.write().await = Some(id.into());
    }

    pub async fn add_metadata(&self, key: impl Into<String>, value: serde_json::Value) {
        self.metadata.write().await.insert(key.into(), value);
    }

    async fn entry(&self, operation: &str) -> StructuredLogEntry {
        StructuredLogEntry {
            correlation_id: self.correlation_id.read().await.clone().unwrap_or_default(),
            service: self.config.service_name.clone(),
            component: self.config.component_name.clone(),
            operation: operation.to_string(),
            metadata: self.metadata.read().await.clone(),
        }
    }

    pub async fn info(&self, operation: &str, message: &str) {
        let entry = self.entry(operation).await;
        info!(correlation_id = %entry.correlation_id, component = %entry.component, operation, "{message}");
    }

    pub async fn warn(&self, operation: &str, message: &str) {
        let entry = self.entry(operation).await;
        warn!(correlation_id = %entry.correlation_id, component = %entry.component, operation, "{message}");
    }

    pub async fn error(&self, operation: &str, message: &str) {
        let entry = self.entry(operation).await;
        error!(correlation_id = %entry.correlation_id, component = %entry.component, operation, "{message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_correlation_id_and_metadata() {
        let logger = StructuredLogger::new(LoggingConfig::default());
        logger.set_correlation_id("tick-1").await;
        logger.add_metadata("batch_size", serde_json::json!(5)).await;

        let entry = logger.entry("worker_tick").await;
        assert_eq!(entry.correlation_id, "tick-1");
        assert_eq!(entry.metadata.get("batch_size"), Some(&serde_json::json!(5)));
    }
}
