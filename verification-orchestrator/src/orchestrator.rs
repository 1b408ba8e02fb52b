use std::sync::Arc;

use cluster_manager::ClaimStatus;
use resilience::{retry, RetryConfig};
use tracing::{info, warn};

use crate::adjudicator::{AdjudicationRequest, AdjudicatorTier};
use crate::coverage::assess_evidence_coverage;
use crate::rebuttal::{extract_sources, generate_short_reply};
use crate::types::VerdictResult;
use crate::parser::parse_response;

const ADJUDICATION_RUBRIC: &str = "You are a professional fact-checker.\n\n\
Your job:\n\
- Compare the claim with the evidence.\n\
- Use common sense and background knowledge, but do not invent specific events or dates that are not supported.\n\
- Be conservative: if evidence is weak or unrelated, prefer UNKNOWN or UNVERIFIABLE over FALSE.\n\n\
Decision rules:\n\
1. Mark FALSE only with clear, direct evidence the claim is wrong.\n\
2. Mark TRUE when evidence strongly supports the claim.\n\
3. Mark PARTIALLY_TRUE when the core idea is supported but specific details (date, number, location) are unconfirmed.\n\
4. Mark MISLEADING when the claim mixes truth with exaggeration or missing context.\n\
5. Mark UNKNOWN or UNVERIFIABLE when coverage is NONE/LOW and there is no direct refutation. Absence of evidence must never be construed as FALSE.";

fn build_user_prompt(claim_text: &str, coverage_label: &str, evidence_snippets: &[String]) -> String {
    let evidence_text = if evidence_snippets.is_empty() {
        "No evidence found from search.".to_string()
    } else {
        evidence_snippets
            .iter()
            .take(5)
            .enumerate()
            .map(|(i, snippet)| format!("{}. {}", i + 1, snippet))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "Fact-check this claim based on the evidence provided.\n\n\
CLAIM:\n{claim_text}\n\n\
EVIDENCE COVERAGE: {coverage_label}\n\n\
EVIDENCE SNIPPETS:\n{evidence_text}\n\n\
Provide your analysis in exactly this format:\n\
STATUS: <one of TRUE, FALSE, MISLEADING, PARTIALLY_TRUE, UNVERIFIABLE, UNKNOWN>\n\
CONFIDENCE: <0.0-1.0>\n\
SHORT_REPLY: <single line>\n\
LONG_REPLY: <multi-line explanation>\n\
SOURCES: <free text>"
    )
}

/// Tries each adjudicator tier in order (capable chat model, local
/// inference, deterministic fallback) and turns the first usable response
/// into a verdict. Retriever and adjudicator errors are absorbed into an
/// UNKNOWN verdict rather than propagated — only the detector, embedder,
/// and cluster manager are fatal for a request.
pub struct VerificationOrchestrator {
    tiers: Vec<Arc<dyn AdjudicatorTier>>,
    retry_config: RetryConfig,
}

impl VerificationOrchestrator {
    pub fn new(tiers: Vec<Arc<dyn AdjudicatorTier>>) -> Self {
        Self {
            tiers,
            retry_config: RetryConfig::default(),
        }
    }

    async fn select_tier(&self) -> Option<&Arc<dyn AdjudicatorTier>> {
        for tier in &self.tiers {
            if tier.is_available().await {
                return Some(tier);
            }
        }
        None
    }

    pub async fn verify(&self, claim_text: &str, evidence_snippets: Vec<String>) -> VerdictResult {
        let coverage = assess_evidence_coverage(claim_text, &evidence_snippets);
        let sources = extract_sources(&evidence_snippets);

        let Some(tier) = self.select_tier().await else {
            warn!("no adjudicator tier available, synthesizing unknown verdict");
            return VerdictResult::unparseable(sources, evidence_snippets);
        };

        info!(tier = tier.name(), coverage = coverage.as_str(), "selected adjudicator tier");

        let user_prompt = build_user_prompt(claim_text, coverage.as_str(), &evidence_snippets);
        let tier = Arc::clone(tier);
        let claim_owned = claim_text.to_string();
        let user_prompt_owned = user_prompt.clone();

        let response = retry(
            move || {
                let tier = Arc::clone(&tier);
                let claim_text = claim_owned.clone();
                let user_prompt = user_prompt_owned.clone();
                Box::pin(async move {
                    let request = AdjudicationRequest {
                        claim_text: &claim_text,
                        system_prompt: Some(ADJUDICATION_RUBRIC),
                        user_prompt: &user_prompt,
                        max_tokens: 2000,
                        temperature: 0.3,
                    };
                    tier.generate(&request).await
                })
            },
            self.retry_config.clone(),
        )
        .await;

        let response = match response {
            Ok(text) => text,
            Err(error) => {
                warn!(%error, "adjudicator tier failed after retries, synthesizing unknown verdict");
                return VerdictResult::unparseable(sources, evidence_snippets);
            }
        };

        let mut fields = parse_response(&response);

        if fields.status == ClaimStatus::False {
            fields.short_reply = generate_short_reply(ClaimStatus::False, claim_text, &fields.short_reply, &sources, fields.confidence);
        }

        VerdictResult {
            status: fields.status,
            confidence: fields.confidence,
            short_reply: fields.short_reply,
            long_reply: fields.long_reply,
            sources,
            evidence_snippets,
            verified_at: chrono::Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adjudicator::AdjudicatorError;
    use async_trait::async_trait;

    struct StubTier {
        response: String,
        available: bool,
    }

    #[async_trait]
    impl AdjudicatorTier for StubTier {
        async fn generate(&self, _request: &AdjudicationRequest<'_>) -> Result<String, AdjudicatorError> {
            Ok(self.response.clone())
        }

        async fn is_available(&self) -> bool {
            self.available
        }

        fn name(&self) -> &'static str {
            "stub"
        }
    }

    #[tokio::test]
    async fn verify_reformats_short_reply_for_false_status() {
        let tier = Arc::new(StubTier {
            response: "STATUS: FALSE\nCONFIDENCE: 0.9\nSHORT_REPLY: This is debunked.\nLONG_REPLY: Detailed explanation.".to_string(),
            available: true,
        });
        let orchestrator = VerificationOrchestrator::new(vec![tier]);

        let verdict = orchestrator.verify("Drinking bleach cures disease", vec![]).await;
        assert_eq!(verdict.status, ClaimStatus::False);
        assert!(verdict.short_reply.contains("DO NOT FORWARD"));
    }

    #[tokio::test]
    async fn verify_skips_unavailable_tiers() {
        let unavailable = Arc::new(StubTier {
            response: String::new(),
            available: false,
        });
        let available = Arc::new(StubTier {
            response: "STATUS: TRUE\nCONFIDENCE: 0.8\nSHORT_REPLY: Confirmed.\nLONG_REPLY: Detailed.".to_string(),
            available: true,
        });
        let orchestrator = VerificationOrchestrator::new(vec![unavailable, available]);

        let verdict = orchestrator.verify("claim text", vec![]).await;
        assert_eq!(verdict.status, ClaimStatus::True);
    }

    #[tokio::test]
    async fn verify_synthesizes_unknown_when_no_tier_available() {
        let unavailable = Arc::new(StubTier {
            response: String::new(),
            available: false,
        });
        let orchestrator = VerificationOrchestrator::new(vec![unavailable]);

        let verdict = orchestrator.verify("claim text", vec![]).await;
        assert_eq!(verdict.status, ClaimStatus::Unknown);
        assert_eq!(verdict.confidence, 0.3);
    }
}
