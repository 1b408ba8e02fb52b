use chrono::{DateTime, Utc};
use cluster_manager::ClusterId;
use serde::{Deserialize, Serialize};
use verification_orchestrator::VerdictResult;

/// Where an ingested message originated. `WhatsappMock` stands in for the
/// bot-adapter integration that is out of scope here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    WebForm,
    Telegram,
    Discord,
    WhatsappMock,
    Api,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    pub chat_id: Option<String>,
    pub user_id: Option<String>,
    pub platform_specific: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IngestRequest {
    pub text: String,
    pub source: Source,
    #[serde(default)]
    pub metadata: Option<Metadata>,
}

/// The normative ingestion output. `audio_url` is always `None`: the TTS
/// renderer is out of scope but the field is kept for interface parity.
#[derive(Debug, Clone, Serialize)]
pub struct IngestResponse {
    pub message_id: u64,
    pub is_claim: bool,
    pub cluster_id: Option<ClusterId>,
    pub cluster_status: Option<cluster_manager::ClaimStatus>,
    pub short_reply: Option<String>,
    pub audio_url: Option<String>,
    pub needs_verification: bool,
}

/// Cluster retrieval output: the cluster's own metadata, an optional
/// verdict if one has been recorded, and the ids of related clusters per
/// the memory graph.
#[derive(Debug, Clone, Serialize)]
pub struct ClusterView {
    pub id: ClusterId,
    pub canonical_text: String,
    pub topic: String,
    pub message_count: u64,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    pub status: cluster_manager::ClaimStatus,
    pub verdict: Option<VerdictResult>,
    pub related_cluster_ids: Vec<ClusterId>,
}
