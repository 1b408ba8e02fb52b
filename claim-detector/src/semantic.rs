//! Semantic scoring seam. The original implementation compares a
//! message's embedding against a fixed corpus of claim trigger phrases
//! and clips anything under 0.3 to zero; that embedding model is the
//! same one used by the embedding-index crate, so it is injected here
//! as a trait rather than hardcoded, mirroring the embedding-index
//! crate's own `EmbeddingProvider` seam.

/// Scores how semantically close `text` is to the corpus of known claim
/// trigger phrases. Implementations must clip low-confidence matches to
/// 0.0 below 0.3, per the original behavior.
pub trait SemanticScorer {
    fn score(&self, text: &str) -> f32;
}

/// Deterministic scorer used when no real embedding backend is wired
/// up (tests, or a deployment that only wants the rule-based score).
/// Always returns 0.0, matching the original's behavior when the
/// embedding model fails to load.
pub struct DummySemanticScorer;

impl SemanticScorer for DummySemanticScorer {
    fn score(&self, _text: &str) -> f32 {
        0.0
    }
}
