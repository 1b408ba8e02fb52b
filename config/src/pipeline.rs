//! Pipeline configuration: the named constants spec.md insists on keeping
//! out of algorithm bodies, plus the external-interface paths and keys
//! enumerated in spec.md section 6.

use serde::{Deserialize, Serialize};

/// Which adjudicator tier the verification orchestrator should prefer.
/// The orchestrator still falls back through the remaining tiers in
/// order if the preferred one reports unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjudicatorBackend {
    ChatCompletion,
    LocalSeq2SeqOrCausal,
    RuleBased,
}

impl Default for AdjudicatorBackend {
    fn default() -> Self {
        AdjudicatorBackend::ChatCompletion
    }
}

/// All of the thresholds, paths and timeouts the pipeline needs at
/// runtime. Defaults match the values spec.md names explicitly; anything
/// not named there falls back to a conservative value chosen from the
/// original implementation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Internal auth token used to authenticate worker/ingestion calls.
    pub internal_auth_token: String,

    /// Path to the vector index's binary side file.
    pub vector_index_path: String,
    /// Path to the memory graph's JSON side file.
    pub memory_graph_path: String,
    /// Path under which fetched/generated media would be written, were
    /// the TTS renderer not out of scope. Kept for interface parity.
    pub media_path: String,

    /// Embedding model identifier passed to the configured embedder.
    pub embedding_model: String,
    /// Dimensionality the embedder is expected to produce.
    pub embedding_dim: usize,

    /// Clustering similarity threshold (tau). Default 0.75.
    pub similarity_threshold: f32,
    /// Claim-detector rule/semantic score threshold. Default 0.3.
    pub detection_threshold: f32,

    /// Preferred adjudicator backend.
    pub adjudicator_backend: AdjudicatorBackend,
    /// Model identifier for the preferred adjudicator backend.
    pub adjudicator_model: String,
    /// Confidence synthesized when the adjudicator's output cannot be
    /// parsed. spec.md section 7 names this value explicitly.
    pub unparseable_confidence: f32,

    /// Search provider region code, e.g. "in-en".
    pub search_region: String,
    /// Search provider recency window, e.g. "w" for one week.
    pub search_timelimit: String,
    /// Domains treated as authoritative (relevance score 1.0 instead of 0.5).
    pub authoritative_domains: Vec<String>,

    /// Worker tick interval in seconds. Default 60.
    pub worker_interval_seconds: u64,
    /// Maximum UNKNOWN clusters processed per worker tick. Default 5.
    pub worker_batch_size: usize,
    /// Per-source rate limit in seconds, applied at the ingestion boundary.
    pub rate_limit_seconds: u64,

    /// Spike-detection lookback window in hours. Default 24.
    pub spike_window_hours: i64,
    /// Spike-detection multiplier over the average rate. Default 3.0.
    pub spike_multiplier: f64,

    /// Timeout budgets for blocking external calls (spec.md section 5).
    pub search_timeout_seconds: u64,
    pub adjudicator_timeout_seconds: u64,
    pub fetch_timeout_seconds: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            internal_auth_token: String::new(),
            vector_index_path: "data/vector_index.json".to_string(),
            memory_graph_path: "data/memory_graph.json".to_string(),
            media_path: "data/media".to_string(),
            embedding_model: "dummy-embedder-v1".to_string(),
            embedding_dim: 384,
            similarity_threshold: 0.75,
            detection_threshold: 0.3,
            adjudicator_backend: AdjudicatorBackend::ChatCompletion,
            adjudicator_model: "llama2".to_string(),
            unparseable_confidence: 0.3,
            search_region: "in-en".to_string(),
            search_timelimit: "w".to_string(),
            authoritative_domains: default_authoritative_domains(),
            worker_interval_seconds: 60,
            worker_batch_size: 5,
            rate_limit_seconds: 3,
            spike_window_hours: 24,
            spike_multiplier: 3.0,
            search_timeout_seconds: 15,
            adjudicator_timeout_seconds: 120,
            fetch_timeout_seconds: 10,
        }
    }
}

/// Domains recognized as authoritative sources, carried over from the
/// original implementation's allowlist.
pub fn default_authoritative_domains() -> Vec<String> {
    [
        "who.int",
        "cdc.gov",
        "nih.gov",
        "fda.gov",
        "icmr.gov.in",
        "mohfw.gov.in",
        "gov.in",
        "pib.gov.in",
        "ndma.gov.in",
        "imd.gov.in",
        "india.gov.in",
        "mygov.in",
        "factcheck.org",
        "snopes.com",
        "politifact.com",
        "fullfact.org",
        "altnews.in",
        "boomlive.in",
        "thequint.com",
        "vishvasnews.com",
        "factly.in",
        "newschecker.in",
        "reuters.com",
        "apnews.com",
        "afp.com",
        "bbc.com",
        "bbc.co.uk",
        "nature.com",
        "science.org",
        "thelancet.com",
        "nejm.org",
        "pubmed.ncbi.nlm.nih.gov",
        "wikipedia.org",
        "hindustantimes.com",
        "timesofindia.com",
        "indiatoday.in",
        "indianexpress.com",
        "ndtv.com",
        "thehindu.com",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
