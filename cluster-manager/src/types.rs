use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type ClusterId = i64;

/// Closed verdict status set. A cluster starts `Unknown` and moves to a
/// terminal status exactly once per verification pass, though an
/// explicit re-verification request may overwrite a terminal status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClaimStatus {
    Unknown,
    True,
    False,
    Misleading,
    PartiallyTrue,
    Unverifiable,
}

impl Default for ClaimStatus {
    fn default() -> Self {
        ClaimStatus::Unknown
    }
}

/// A set of messages judged to express the same claim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cluster {
    pub id: ClusterId,
    pub canonical_text: String,
    pub topic: String,
    pub centroid: Vec<f32>,
    pub message_count: u64,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    pub status: ClaimStatus,
}

impl Cluster {
    pub fn new(id: ClusterId, canonical_text: String, topic: String, centroid: Vec<f32>, now: DateTime<Utc>) -> Self {
        Self {
            id,
            canonical_text,
            topic,
            centroid,
            message_count: 1,
            first_seen: now,
            last_seen: now,
            status: ClaimStatus::Unknown,
        }
    }
}
