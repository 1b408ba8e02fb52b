//! Eager configuration validation, run once at startup.

use thiserror::Error;

use crate::pipeline::PipelineConfig;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("similarity_threshold must be in [0, 1], got {0}")]
    SimilarityThresholdOutOfRange(String),
    #[error("detection_threshold must be in [0, 1], got {0}")]
    DetectionThresholdOutOfRange(String),
    #[error("unparseable_confidence must be in [0, 1], got {0}")]
    UnparseableConfidenceOutOfRange(String),
    #[error("worker_batch_size must be at least 1")]
    WorkerBatchSizeZero,
    #[error("worker_interval_seconds must be at least 1")]
    WorkerIntervalZero,
    #[error("embedding_dim must be at least 1")]
    EmbeddingDimZero,
    #[error("vector_index_path must not be empty")]
    VectorIndexPathEmpty,
    #[error("memory_graph_path must not be empty")]
    MemoryGraphPathEmpty,
}

/// Validate a `PipelineConfig`, returning every violation found rather
/// than failing fast on the first one.
pub fn validate_config(config: &PipelineConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if !(0.0..=1.0).contains(&config.similarity_threshold) {
        errors.push(ValidationError::SimilarityThresholdOutOfRange(
            config.similarity_threshold.to_string(),
        ));
    }
    if !(0.0..=1.0).contains(&config.detection_threshold) {
        errors.push(ValidationError::DetectionThresholdOutOfRange(
            config.detection_threshold.to_string(),
        ));
    }
    if !(0.0..=1.0).contains(&config.unparseable_confidence) {
        errors.push(ValidationError::UnparseableConfidenceOutOfRange(
            config.unparseable_confidence.to_string(),
        ));
    }
    if config.worker_batch_size == 0 {
        errors.push(ValidationError::WorkerBatchSizeZero);
    }
    if config.worker_interval_seconds == 0 {
        errors.push(ValidationError::WorkerIntervalZero);
    }
    if config.embedding_dim == 0 {
        errors.push(ValidationError::EmbeddingDimZero);
    }
    if config.vector_index_path.trim().is_empty() {
        errors.push(ValidationError::VectorIndexPathEmpty);
    }
    if config.memory_graph_path.trim().is_empty() {
        errors.push(ValidationError::MemoryGraphPathEmpty);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&PipelineConfig::default()).is_ok());
    }

    #[test]
    fn rejects_out_of_range_thresholds() {
        let mut config = PipelineConfig::default();
        config.similarity_threshold = 1.5;
        config.worker_batch_size = 0;

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::WorkerBatchSizeZero));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::SimilarityThresholdOutOfRange(_))));
    }
}
