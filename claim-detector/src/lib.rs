//! Claim detection: decides whether a message carries a verifiable
//! factual claim, produces its canonical text, detects its language,
//! and extracts coarse topics.

mod canonical;
mod language;
mod patterns;
mod semantic;
mod topics;
mod types;

pub use semantic::{DummySemanticScorer, SemanticScorer};
pub use types::Classification;

use tracing::info;

const MIN_CLAIM_LENGTH: usize = 10;
const MAX_CLAIM_LENGTH: usize = 5000;

/// Stateless-ish facade over the detector algorithm. Holds a
/// `SemanticScorer` implementation and the threshold, generalized out
/// of a hardcoded constant per the configuration requirements.
pub struct ClaimDetector<S: SemanticScorer> {
    scorer: S,
    threshold: f32,
}

impl<S: SemanticScorer> ClaimDetector<S> {
    pub fn new(scorer: S, threshold: f32) -> Self {
        Self { scorer, threshold }
    }

    /// Classify a raw message. Mirrors the five-step algorithm: hard
    /// override, rule score, semantic score, threshold decision,
    /// generic-fact fallback.
    pub fn classify(&self, text: &str) -> Classification {
        let trimmed = text.trim();

        if trimmed.chars().count() < MIN_CLAIM_LENGTH {
            return Classification::non_claim(trimmed);
        }

        let is_claim = if patterns::is_high_priority_claim(trimmed) {
            info!(text = trimmed, "high priority claim override");
            true
        } else {
            let rule_score = patterns::rule_based_claim_score(trimmed, MIN_CLAIM_LENGTH, MAX_CLAIM_LENGTH);
            let semantic_score = self.scorer.score(trimmed);
            let final_score = rule_score.max(semantic_score);

            info!(rule_score, semantic_score, final_score, "claim score computed");

            if final_score >= self.threshold {
                true
            } else {
                patterns::looks_like_generic_fact(trimmed)
            }
        };

        if !is_claim {
            return Classification::non_claim(trimmed);
        }

        let canonical_text = canonical::extract_canonical_claim(trimmed);
        let language = language::detect_language(trimmed);
        let topics = topics::get_claim_topics(trimmed);

        Classification {
            is_claim: true,
            canonical_text,
            language,
            topics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_short_text() {
        let detector = ClaimDetector::new(DummySemanticScorer, 0.3);
        let result = detector.classify("hi");
        assert!(!result.is_claim);
    }

    #[test]
    fn rejects_greeting() {
        let detector = ClaimDetector::new(DummySemanticScorer, 0.3);
        let result = detector.classify("Good morning everyone, hope you have a nice day");
        assert!(!result.is_claim);
    }

    #[test]
    fn rejects_question() {
        let detector = ClaimDetector::new(DummySemanticScorer, 0.3);
        let result = detector.classify("is it going to rain tomorrow?");
        assert!(!result.is_claim);
    }

    #[test]
    fn detects_death_claim_via_hard_override() {
        let detector = ClaimDetector::new(DummySemanticScorer, 0.3);
        let result = detector.classify("Breaking: famous actor has been found dead at his home today");
        assert!(result.is_claim);
    }

    #[test]
    fn detects_rule_based_misinformation_claim() {
        let detector = ClaimDetector::new(DummySemanticScorer, 0.3);
        let result = detector.classify("URGENT: scientists have discovered that this vaccine causes cancer, share this now");
        assert!(result.is_claim);
        assert!(result.topics.contains(&"health".to_string()));
    }

    #[test]
    fn detects_generic_fact_via_fallback() {
        let detector = ClaimDetector::new(DummySemanticScorer, 0.3);
        let result = detector.classify("India has won a bid to host Commonwealth Games 2030");
        assert!(result.is_claim);
    }

    #[test]
    fn max_length_boundary_rejects_long_text() {
        let long_text = "a ".repeat(3000);
        let detector = ClaimDetector::new(DummySemanticScorer, 0.3);
        let result = detector.classify(&long_text);
        assert!(!result.is_claim);
    }
}
