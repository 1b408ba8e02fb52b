use chrono::{DateTime, Utc};
use cluster_manager::ClaimStatus;
use serde::{Deserialize, Serialize};

/// The outcome of a single verification pass over a cluster's canonical
/// text, independent of which adjudicator tier produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerdictResult {
    pub status: ClaimStatus,
    pub confidence: f32,
    pub short_reply: String,
    pub long_reply: String,
    pub sources: Vec<String>,
    pub evidence_snippets: Vec<String>,
    pub verified_at: DateTime<Utc>,
}

impl VerdictResult {
    /// The default synthesized when the model response is empty or carries
    /// no recognizable fields, and when every adjudicator tier errors out.
    /// Confidence 0.3 (not the original's 0.5) per this project's adopted
    /// default.
    pub fn unparseable(sources: Vec<String>, evidence_snippets: Vec<String>) -> Self {
        Self {
            status: ClaimStatus::Unknown,
            confidence: 0.3,
            short_reply: "We could not verify this claim. Please check official sources.".to_string(),
            long_reply: "This claim requires further verification.".to_string(),
            sources,
            evidence_snippets,
            verified_at: Utc::now(),
        }
    }
}
