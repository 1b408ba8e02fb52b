use std::sync::Arc;

use claim_detector::{ClaimDetector, DummySemanticScorer};
use cluster_manager::ClusterManager;
use embedding_index::{DummyEmbedder, Embedder, OllamaEmbedder};
use evidence_retriever::{DuckDuckGoHtmlProvider, EvidenceRetriever, HttpPageFetcher};
use memory_graph::MemoryGraph;
use pipeline_config::{AdjudicatorBackend, PipelineConfig};
use verification_orchestrator::{AdjudicatorTier, ChatCompletionAdjudicator, LocalInferenceAdjudicator, ModelKind, RuleBasedAdjudicator, VerificationOrchestrator};

use crate::rate_limit::RateLimiter;
use crate::store::{InMemoryMessageStore, LoggingNotifier, MessageStore, Notifier};

/// Bundles every collaborator the synchronous ingestion path and the
/// periodic worker loop need. Built once at startup from a
/// `PipelineConfig` and shared across request handlers behind `Arc`.
pub struct Dependencies {
    pub config: PipelineConfig,
    pub detector: ClaimDetector<DummySemanticScorer>,
    pub embedder: Arc<dyn Embedder>,
    pub cluster_manager: Arc<ClusterManager>,
    pub evidence_retriever: Arc<EvidenceRetriever>,
    pub orchestrator: Arc<VerificationOrchestrator>,
    pub memory_graph: Arc<MemoryGraph>,
    pub message_store: Arc<dyn MessageStore>,
    pub notifier: Arc<dyn Notifier>,
    pub rate_limiter: Arc<RateLimiter>,
}

fn ordered_tiers(config: &PipelineConfig) -> Vec<Arc<dyn AdjudicatorTier>> {
    let chat: Arc<dyn AdjudicatorTier> = Arc::new(ChatCompletionAdjudicator::new("http://localhost:11434", config.adjudicator_model.clone()));
    let local: Arc<dyn AdjudicatorTier> = Arc::new(LocalInferenceAdjudicator::new("http://localhost:8008", ModelKind::Seq2Seq));
    let rule: Arc<dyn AdjudicatorTier> = Arc::new(RuleBasedAdjudicator);

    match config.adjudicator_backend {
        AdjudicatorBackend::ChatCompletion => vec![chat, local, rule],
        AdjudicatorBackend::LocalSeq2SeqOrCausal => vec![local, chat, rule],
        AdjudicatorBackend::RuleBased => vec![rule, chat, local],
    }
}

impl Dependencies {
    pub fn new(config: PipelineConfig) -> Self {
        let embedder: Arc<dyn Embedder> = if config.embedding_model == "dummy-embedder-v1" {
            Arc::new(DummyEmbedder::new(config.embedding_dim))
        } else {
            Arc::new(OllamaEmbedder::new("http://localhost:11434", config.embedding_model.clone(), config.embedding_dim))
        };

        let cluster_manager = Arc::new(ClusterManager::new(config.embedding_dim, config.similarity_threshold));

        let search_provider = Arc::new(DuckDuckGoHtmlProvider::new());
        let page_fetcher = Arc::new(HttpPageFetcher::new());
        let evidence_retriever = Arc::new(EvidenceRetriever::new(search_provider, page_fetcher, config.authoritative_domains.clone()));

        let orchestrator = Arc::new(VerificationOrchestrator::new(ordered_tiers(&config)));

        let memory_graph = Arc::new(MemoryGraph::new());

        Self {
            detector: ClaimDetector::new(DummySemanticScorer, config.detection_threshold),
            embedder,
            cluster_manager,
            evidence_retriever,
            orchestrator,
            memory_graph,
            message_store: Arc::new(InMemoryMessageStore::new()),
            notifier: Arc::new(LoggingNotifier),
            rate_limiter: Arc::new(RateLimiter::new(config.rate_limit_seconds)),
            config,
        }
    }
}
