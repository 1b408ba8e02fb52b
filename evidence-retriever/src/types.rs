use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single piece of evidence returned by a search provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvidenceResult {
    pub url: String,
    pub title: String,
    pub snippet: String,
    pub source_name: String,
    pub relevance_score: f32,
    pub retrieved_at: DateTime<Utc>,
}

impl EvidenceResult {
    pub fn new(url: String, title: String, snippet: String, source_name: String) -> Self {
        Self {
            url,
            title,
            snippet,
            source_name,
            relevance_score: 0.0,
            retrieved_at: Utc::now(),
        }
    }
}
