use chrono::{DateTime, Utc};
use cluster_manager::ClusterId;
use serde::{Deserialize, Serialize};

/// An edge between two clusters. Weight accumulates on repeated
/// `add_relationship` calls for the same pair; the relationship type is
/// fixed at edge-creation time and not updated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub other: ClusterId,
    pub relationship_type: String,
    pub weight: f32,
}

/// A predicted re-emergence: cluster id, probability in `[0, 1]`, and a
/// human-readable reason string suitable for surfacing to an operator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Prediction {
    pub cluster_id: ClusterId,
    pub probability: f32,
    pub reason: String,
}

/// On-disk shape for the memory graph: adjacency list plus spike history,
/// serialized as a single JSON blob.
#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct GraphFile {
    pub nodes: Vec<ClusterId>,
    pub edges: Vec<(ClusterId, Edge)>,
    pub spike_history: Vec<(ClusterId, Vec<DateTime<Utc>>)>,
}
