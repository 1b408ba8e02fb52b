//! Embedder trait and implementations.

use async_trait::async_trait;
use thiserror::Error;

use crate::similarity::normalize_vector;

#[derive(Debug, Error)]
pub enum EmbedderError {
    #[error("embedder backend unavailable: {0}")]
    Unavailable(String),
    #[error("embedder request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("malformed embedder response: {0}")]
    Malformed(String),
}

/// Produces a unit-norm embedding for a piece of text. Inputs longer
/// than 5000 characters are truncated before encoding, matching the
/// original service's behavior.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedderError>;
    fn dimension(&self) -> usize;
    async fn is_available(&self) -> bool;
}

const MAX_INPUT_CHARS: usize = 5000;

fn truncate(text: &str) -> &str {
    match text.char_indices().nth(MAX_INPUT_CHARS) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Deterministic, hash-based embedder used for tests and as a last-resort
/// fallback when no real embedding backend is configured. Produces a
/// stable unit vector for a given input so clustering behavior is
/// reproducible without a network call.
pub struct DummyEmbedder {
    dimension: usize,
}

impl DummyEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

#[async_trait]
impl Embedder for DummyEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedderError> {
        let text = truncate(text);
        let mut vector = vec![0.0f32; self.dimension];

        for (i, byte) in text.bytes().enumerate() {
            let slot = i % self.dimension;
            vector[slot] += (byte as f32 + 1.0) * ((i % 7) as f32 + 1.0);
        }
        // Guarantee a non-zero vector even for empty input.
        if vector.iter().all(|v| *v == 0.0) {
            vector[0] = 1.0;
        }

        normalize_vector(&mut vector).map_err(|e| EmbedderError::Malformed(e.to_string()))?;
        Ok(vector)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn is_available(&self) -> bool {
        true
    }
}

/// Embedder backed by an Ollama-compatible `/api/embeddings` endpoint.
pub struct OllamaEmbedder {
    client: reqwest::Client,
    base_url: String,
    model: String,
    dimension: usize,
}

impl OllamaEmbedder {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, dimension: usize) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            model: model.into(),
            dimension,
        }
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedderError> {
        let text = truncate(text);
        let response = self
            .client
            .post(format!("{}/api/embeddings", self.base_url))
            .json(&serde_json::json!({ "model": self.model, "prompt": text }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(EmbedderError::Unavailable(format!(
                "ollama returned status {}",
                response.status()
            )));
        }

        let body: serde_json::Value = response.json().await?;
        let raw = body["embedding"]
            .as_array()
            .ok_or_else(|| EmbedderError::Malformed("missing embedding field".to_string()))?;

        let mut vector: Vec<f32> = raw.iter().map(|v| v.as_f64().unwrap_or(0.0) as f32).collect();
        if vector.len() != self.dimension {
            return Err(EmbedderError::Malformed(format!(
                "expected dimension {}, got {}",
                self.dimension,
                vector.len()
            )));
        }

        normalize_vector(&mut vector).map_err(|e| EmbedderError::Malformed(e.to_string()))?;
        Ok(vector)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn is_available(&self) -> bool {
        self.client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn dummy_embedder_produces_unit_vector() {
        let embedder = DummyEmbedder::new(16);
        let vector = embedder.embed("hello world").await.unwrap();
        let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-4);
    }

    #[tokio::test]
    async fn dummy_embedder_is_deterministic() {
        let embedder = DummyEmbedder::new(16);
        let a = embedder.embed("same text").await.unwrap();
        let b = embedder.embed("same text").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn truncates_inputs_past_5000_chars() {
        let embedder = DummyEmbedder::new(8);
        let long_a = "a".repeat(6000);
        let long_b = format!("{}{}", "a".repeat(5000), "b".repeat(1000));
        let embed_a = embedder.embed(&long_a).await.unwrap();
        let embed_b = embedder.embed(&long_b).await.unwrap();
        assert_eq!(embed_a, embed_b);
    }
}
