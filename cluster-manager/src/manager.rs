use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

use chrono::Utc;
use embedding_index::{average_embedding, VectorIndex};
use thiserror::Error;
use tracing::info;

use crate::types::{ClaimStatus, Cluster, ClusterId};

#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("cluster {0} not found")]
    NotFound(ClusterId),
    #[error("vector index error: {0}")]
    Index(#[from] embedding_index::IndexError),
    #[error("cannot recompute centroid from an empty embedding set")]
    EmptyMembers,
    #[error("similarity computation failed: {0}")]
    Similarity(#[from] embedding_index::SimilarityError),
}

/// Assigns messages to clusters and maintains cluster centroids. Holds
/// the cluster map under a single lock; per-cluster centroid/count
/// updates are therefore serialized relative to each other, which is
/// what guarantees `centroid = mean(members)` after every completed
/// assignment.
pub struct ClusterManager {
    similarity_threshold: f32,
    index: VectorIndex,
    clusters: Mutex<HashMap<ClusterId, Cluster>>,
    next_id: AtomicI64,
}

impl ClusterManager {
    pub fn new(dimension: usize, similarity_threshold: f32) -> Self {
        Self {
            similarity_threshold,
            index: VectorIndex::new(dimension),
            clusters: Mutex::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    pub fn with_index(index: VectorIndex, similarity_threshold: f32) -> Self {
        Self {
            similarity_threshold,
            index,
            clusters: Mutex::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Assign a claim to the nearest cluster at or above the similarity
    /// threshold, or open a new one. Returns the resulting cluster and
    /// whether it was newly created.
    pub fn assign(&self, canonical_text: &str, topic: &str, embedding: &[f32]) -> Result<(Cluster, bool), ClusterError> {
        if let Some((cluster_id, similarity)) = self.index.nearest(embedding, self.similarity_threshold)? {
            let mut clusters = self.clusters.lock().expect("cluster map lock poisoned");
            if let Some(cluster) = clusters.get_mut(&cluster_id) {
                info!(cluster_id, similarity, "merging claim into existing cluster");
                let n = cluster.message_count as f32;
                let merged: Vec<f32> = cluster
                    .centroid
                    .iter()
                    .zip(embedding.iter())
                    .map(|(c, e)| (c * n + e) / (n + 1.0))
                    .collect();
                cluster.centroid = merged;
                cluster.message_count += 1;
                cluster.last_seen = Utc::now();
                return Ok((cluster.clone(), false));
            }
            // The index pointed at a cluster id that no longer exists
            // (e.g. merged away). Fall through and open a new cluster.
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        let cluster = Cluster::new(id, canonical_text.to_string(), topic.to_string(), embedding.to_vec(), now);
        self.index.add(embedding.to_vec(), id)?;

        let mut clusters = self.clusters.lock().expect("cluster map lock poisoned");
        clusters.insert(id, cluster.clone());
        info!(cluster_id = id, "opened new cluster");
        Ok((cluster, true))
    }

    pub fn get(&self, cluster_id: ClusterId) -> Option<Cluster> {
        self.clusters.lock().expect("cluster map lock poisoned").get(&cluster_id).cloned()
    }

    pub fn set_status(&self, cluster_id: ClusterId, status: ClaimStatus) -> Result<(), ClusterError> {
        let mut clusters = self.clusters.lock().expect("cluster map lock poisoned");
        let cluster = clusters.get_mut(&cluster_id).ok_or(ClusterError::NotFound(cluster_id))?;
        cluster.status = status;
        Ok(())
    }

    /// Up to `limit` clusters with status `Unknown`, oldest `last_seen`
    /// first. Feeds the worker loop's periodic verification batch.
    pub fn pending_unverified(&self, limit: usize) -> Vec<Cluster> {
        let clusters = self.clusters.lock().expect("cluster map lock poisoned");
        let mut pending: Vec<Cluster> = clusters
            .values()
            .filter(|c| c.status == ClaimStatus::Unknown)
            .cloned()
            .collect();
        pending.sort_by_key(|c| c.last_seen);
        pending.truncate(limit);
        pending
    }

    /// Fold `secondary` into `primary`: weighted centroid, summed count,
    /// extremes of first/last-seen, then delete `secondary`. The vector
    /// index is not compacted; the secondary id simply becomes
    /// unreachable. Caller is responsible for reassigning member
    /// messages in the message store.
    pub fn merge(&self, primary_id: ClusterId, secondary_id: ClusterId) -> Result<Cluster, ClusterError> {
        let mut clusters = self.clusters.lock().expect("cluster map lock poisoned");
        let secondary = clusters.get(&secondary_id).cloned().ok_or(ClusterError::NotFound(secondary_id))?;
        let primary = clusters.get(&primary_id).cloned().ok_or(ClusterError::NotFound(primary_id))?;

        let total_count = primary.message_count + secondary.message_count;
        let p_n = primary.message_count as f32;
        let s_n = secondary.message_count as f32;
        let centroid: Vec<f32> = primary
            .centroid
            .iter()
            .zip(secondary.centroid.iter())
            .map(|(p, s)| (p * p_n + s * s_n) / total_count as f32)
            .collect();

        let merged = clusters.get_mut(&primary_id).expect("checked above");
        merged.centroid = centroid;
        merged.message_count = total_count;
        merged.first_seen = primary.first_seen.min(secondary.first_seen);
        merged.last_seen = primary.last_seen.max(secondary.last_seen);
        let result = merged.clone();

        clusters.remove(&secondary_id);
        info!(primary_id, secondary_id, "merged cluster");
        Ok(result)
    }

    /// Recalculate a cluster's centroid from an explicit set of member
    /// embeddings (e.g. after a manual correction) and re-add the fresh
    /// centroid to the index under the same cluster id.
    pub fn recompute(&self, cluster_id: ClusterId, member_embeddings: &[Vec<f32>]) -> Result<Cluster, ClusterError> {
        if member_embeddings.is_empty() {
            return Err(ClusterError::EmptyMembers);
        }
        let centroid = average_embedding(member_embeddings)?;

        let mut clusters = self.clusters.lock().expect("cluster map lock poisoned");
        let cluster = clusters.get_mut(&cluster_id).ok_or(ClusterError::NotFound(cluster_id))?;
        cluster.centroid = centroid.clone();
        let result = cluster.clone();
        drop(clusters);

        self.index.add(centroid, cluster_id)?;
        info!(cluster_id, "recalculated centroid");
        Ok(result)
    }

    /// Nearest-neighbor search from a cluster's own centroid, dropping
    /// the self-match.
    pub fn similar_clusters(&self, cluster_id: ClusterId, k: usize, threshold: f32) -> Result<Vec<(Cluster, f32)>, ClusterError> {
        let centroid = {
            let clusters = self.clusters.lock().expect("cluster map lock poisoned");
            clusters.get(&cluster_id).ok_or(ClusterError::NotFound(cluster_id))?.centroid.clone()
        };

        let matches = self.index.search(&centroid, k + 1, threshold)?;
        let clusters = self.clusters.lock().expect("cluster map lock poisoned");

        let mut results = Vec::with_capacity(k);
        for (matched_id, similarity) in matches {
            if matched_id == cluster_id {
                continue;
            }
            if let Some(matched_cluster) = clusters.get(&matched_id) {
                results.push((matched_cluster.clone(), similarity));
            }
            if results.len() == k {
                break;
            }
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f32, y: f32) -> Vec<f32> {
        vec![x, y]
    }

    #[test]
    fn assign_opens_new_cluster_on_first_sighting() {
        let manager = ClusterManager::new(2, 0.75);
        let (cluster, is_new) = manager.assign("claim text", "health", &v(1.0, 0.0)).unwrap();
        assert!(is_new);
        assert_eq!(cluster.message_count, 1);
        assert_eq!(cluster.status, ClaimStatus::Unknown);
    }

    #[test]
    fn assign_merges_similar_claim_into_existing_cluster() {
        let manager = ClusterManager::new(2, 0.75);
        let (first, _) = manager.assign("claim text", "health", &v(1.0, 0.0)).unwrap();
        let (merged, is_new) = manager.assign("claim text restated", "health", &v(1.0, 0.0)).unwrap();

        assert!(!is_new);
        assert_eq!(merged.id, first.id);
        assert_eq!(merged.message_count, 2);
    }

    #[test]
    fn assign_opens_distinct_cluster_for_dissimilar_claim() {
        let manager = ClusterManager::new(2, 0.75);
        let (first, _) = manager.assign("claim a", "health", &v(1.0, 0.0)).unwrap();
        let (second, is_new) = manager.assign("claim b", "politics", &v(0.0, 1.0)).unwrap();

        assert!(is_new);
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn merge_folds_secondary_into_primary() {
        let manager = ClusterManager::new(2, 0.75);
        let (a, _) = manager.assign("claim a", "health", &v(1.0, 0.0)).unwrap();
        let (b, _) = manager.assign("claim b", "politics", &v(0.0, 1.0)).unwrap();

        let merged = manager.merge(a.id, b.id).unwrap();
        assert_eq!(merged.message_count, 2);
        assert!(manager.get(b.id).is_none());
    }

    #[test]
    fn pending_unverified_returns_only_unknown_status() {
        let manager = ClusterManager::new(2, 0.75);
        let (a, _) = manager.assign("claim a", "health", &v(1.0, 0.0)).unwrap();
        manager.assign("claim b", "politics", &v(0.0, 1.0)).unwrap();
        manager.set_status(a.id, ClaimStatus::False).unwrap();

        let pending = manager.pending_unverified(10);
        assert_eq!(pending.len(), 1);
        assert_ne!(pending[0].id, a.id);
    }

    #[test]
    fn similar_clusters_excludes_self() {
        let manager = ClusterManager::new(2, 0.75);
        let (a, _) = manager.assign("claim a", "health", &v(1.0, 0.0)).unwrap();
        manager.assign("claim b", "health", &v(0.9, 0.1)).unwrap();

        let similar = manager.similar_clusters(a.id, 5, 0.0).unwrap();
        assert!(similar.iter().all(|(c, _)| c.id != a.id));
    }
}
