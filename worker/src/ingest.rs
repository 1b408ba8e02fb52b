use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use cluster_manager::ClaimStatus;
use evidence_retriever::EvidenceResult;
use tracing::{info, warn};

use crate::dependencies::Dependencies;
use crate::types::{IngestRequest, IngestResponse, Metadata};

const MIN_TEXT_LEN: usize = 1;
const MAX_TEXT_LEN: usize = 10_000;

fn rate_limit_key(source: &crate::types::Source, metadata: &Option<Metadata>) -> String {
    match metadata.as_ref().and_then(|m| m.chat_id.as_deref()) {
        Some(chat_id) => chat_id.to_string(),
        None => format!("{source:?}"),
    }
}

pub(crate) fn evidence_to_snippets(evidence: &[EvidenceResult]) -> Vec<String> {
    evidence
        .iter()
        .map(|e| format!("{} — {} (source: {}, {})", e.title, e.snippet, e.source_name, e.url))
        .collect()
}

/// Runs the synchronous fast path: detect → embed → cluster → (on first
/// sighting only) verify. Returns `Ok(None)` for a silent rate-limit
/// drop, matching spec.md section 7's "no side effects" requirement.
/// Detector, embedder, and cluster-manager failures are fatal and
/// propagate; memory-graph bookkeeping never fails the request.
pub async fn ingest(deps: &Dependencies, request: IngestRequest) -> Result<Option<IngestResponse>> {
    let char_len = request.text.chars().count();
    if !(MIN_TEXT_LEN..=MAX_TEXT_LEN).contains(&char_len) {
        return Err(anyhow!("text length {char_len} outside the allowed [{MIN_TEXT_LEN}, {MAX_TEXT_LEN}] range"));
    }

    let key = rate_limit_key(&request.source, &request.metadata);
    if !deps.rate_limiter.allow(&key, Utc::now()) {
        info!(key, "ingestion dropped by rate limiter");
        return Ok(None);
    }

    let message_id = deps.message_store.next_message_id();
    let classification = deps.detector.classify(&request.text);

    if !classification.is_claim {
        let response = IngestResponse {
            message_id,
            is_claim: false,
            cluster_id: None,
            cluster_status: None,
            short_reply: None,
            audio_url: None,
            needs_verification: false,
        };
        deps.notifier.notify(message_id, None, None);
        return Ok(Some(response));
    }

    let embedding = deps
        .embedder
        .embed(&classification.canonical_text)
        .await
        .context("embedding generation failed")?;

    let topic = classification.topics.first().cloned().unwrap_or_else(|| "general".to_string());
    let (cluster, is_new) = deps
        .cluster_manager
        .assign(&classification.canonical_text, &topic, &embedding)
        .context("cluster assignment failed")?;

    let now = Utc::now();
    deps.message_store.record_sighting(cluster.id, now);
    deps.memory_graph.add_cluster_node(cluster.id);

    let response = if is_new {
        let evidence = deps.evidence_retriever.gather_evidence(&classification.canonical_text, 3, 5).await;
        let snippets = evidence_to_snippets(&evidence);
        let verdict = deps.orchestrator.verify(&classification.canonical_text, snippets).await;

        if let Err(error) = deps.cluster_manager.set_status(cluster.id, verdict.status) {
            warn!(%error, cluster_id = cluster.id, "failed to persist cluster status");
        }
        let short_reply = verdict.short_reply.clone();
        let status = verdict.status;
        deps.message_store.store_verdict(cluster.id, verdict);

        IngestResponse {
            message_id,
            is_claim: true,
            cluster_id: Some(cluster.id),
            cluster_status: Some(status),
            short_reply: Some(short_reply),
            audio_url: None,
            needs_verification: false,
        }
    } else if cluster.status == ClaimStatus::Unknown {
        IngestResponse {
            message_id,
            is_claim: true,
            cluster_id: Some(cluster.id),
            cluster_status: Some(ClaimStatus::Unknown),
            short_reply: None,
            audio_url: None,
            needs_verification: true,
        }
    } else {
        let short_reply = deps.message_store.verdict_for(cluster.id).map(|v| v.short_reply);
        IngestResponse {
            message_id,
            is_claim: true,
            cluster_id: Some(cluster.id),
            cluster_status: Some(cluster.status),
            short_reply,
            audio_url: None,
            needs_verification: false,
        }
    };

    deps.notifier.notify(message_id, response.cluster_id, response.short_reply.as_deref());
    Ok(Some(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Source;
    use pipeline_config::PipelineConfig;

    fn test_config() -> PipelineConfig {
        let mut config = PipelineConfig::default();
        config.embedding_dim = 16;
        config
    }

    #[tokio::test]
    async fn rejects_empty_text() {
        let deps = Dependencies::new(test_config());
        let request = IngestRequest {
            text: String::new(),
            source: Source::Api,
            metadata: None,
        };
        assert!(ingest(&deps, request).await.is_err());
    }

    #[tokio::test]
    async fn non_claim_text_short_circuits() {
        let deps = Dependencies::new(test_config());
        let request = IngestRequest {
            text: "good morning everyone".to_string(),
            source: Source::Api,
            metadata: None,
        };
        let response = ingest(&deps, request).await.unwrap().unwrap();
        assert!(!response.is_claim);
        assert!(response.cluster_id.is_none());
    }

    #[tokio::test]
    async fn rate_limiter_silently_drops_repeat_from_same_chat() {
        let deps = Dependencies::new(test_config());
        let metadata = Some(Metadata {
            chat_id: Some("chat-1".to_string()),
            user_id: None,
            platform_specific: None,
        });

        let first = IngestRequest {
            text: "good morning everyone".to_string(),
            source: Source::WhatsappMock,
            metadata: metadata.clone(),
        };
        assert!(ingest(&deps, first).await.unwrap().is_some());

        let second = IngestRequest {
            text: "good morning again".to_string(),
            source: Source::WhatsappMock,
            metadata,
        };
        assert!(ingest(&deps, second).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn second_sighting_of_unknown_cluster_requests_verification() {
        let deps = Dependencies::new(test_config());
        let claim = "Scientists discover a microchip in the new vaccine batch causing tracking concerns";

        let first = IngestRequest {
            text: claim.to_string(),
            source: Source::Api,
            metadata: Some(Metadata {
                chat_id: Some("chat-a".to_string()),
                user_id: None,
                platform_specific: None,
            }),
        };
        let first_response = ingest(&deps, first).await.unwrap().unwrap();
        assert!(first_response.is_claim);
        assert_eq!(first_response.needs_verification, false);

        let second = IngestRequest {
            text: claim.to_string(),
            source: Source::Api,
            metadata: Some(Metadata {
                chat_id: Some("chat-b".to_string()),
                user_id: None,
                platform_specific: None,
            }),
        };
        let second_response = ingest(&deps, second).await.unwrap().unwrap();
        assert_eq!(second_response.cluster_id, first_response.cluster_id);
    }
}
