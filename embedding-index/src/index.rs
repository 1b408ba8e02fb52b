//! In-memory ANN vector index. Vectors are stored normalized so inner
//! product equals cosine similarity, mirroring the original FAISS
//! `IndexFlatIP` index. Persists to a JSON side file alongside a
//! parallel id list, rather than FAISS's binary format, since no FAISS
//! binding is available in this crate's dependency stack.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Mutex;
use thiserror::Error;
use tracing::{info, warn};

use crate::similarity::cosine_similarity;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("vector dimension mismatch: index is {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("failed to read index file: {0}")]
    Read(#[source] std::io::Error),
    #[error("failed to write index file: {0}")]
    Write(#[source] std::io::Error),
    #[error("failed to (de)serialize index: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Entry {
    cluster_id: i64,
    vector: Vec<f32>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct IndexFile {
    dimension: usize,
    entries: Vec<Entry>,
}

/// Append-only vector index. All mutation and query operations are
/// serialized under a single lock; callers are expected to compute the
/// embedding to add/search for *outside* the lock.
pub struct VectorIndex {
    dimension: usize,
    inner: Mutex<Vec<Entry>>,
}

impl VectorIndex {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            inner: Mutex::new(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("vector index lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append `vector` under `cluster_id`. Re-adding the same cluster id
    /// (e.g. after a centroid update) is allowed and expected; `search`
    /// dedupes by keeping the highest-similarity hit per cluster id.
    pub fn add(&self, vector: Vec<f32>, cluster_id: i64) -> Result<(), IndexError> {
        if vector.len() != self.dimension {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.len(),
            });
        }
        self.inner
            .lock()
            .expect("vector index lock poisoned")
            .push(Entry { cluster_id, vector });
        Ok(())
    }

    /// Return up to `k` neighbors at or above `min_similarity`, sorted
    /// descending, deduped to the highest-similarity hit per cluster id.
    pub fn search(&self, query: &[f32], k: usize, min_similarity: f32) -> Result<Vec<(i64, f32)>, IndexError> {
        if query.len() != self.dimension {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        let entries = self.inner.lock().expect("vector index lock poisoned").clone();
        let mut best_by_cluster: std::collections::HashMap<i64, f32> = std::collections::HashMap::new();

        for entry in &entries {
            let similarity = cosine_similarity(query, &entry.vector).unwrap_or(0.0);
            if similarity < min_similarity {
                continue;
            }
            best_by_cluster
                .entry(entry.cluster_id)
                .and_modify(|existing| {
                    if similarity > *existing {
                        *existing = similarity;
                    }
                })
                .or_insert(similarity);
        }

        let mut results: Vec<(i64, f32)> = best_by_cluster.into_iter().collect();
        results.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(k);
        Ok(results)
    }

    /// Convenience wrapper over `search` with `k = 1`.
    pub fn nearest(&self, query: &[f32], min_similarity: f32) -> Result<Option<(i64, f32)>, IndexError> {
        Ok(self.search(query, 1, min_similarity)?.into_iter().next())
    }

    pub fn save(&self, path: &Path) -> Result<(), IndexError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(IndexError::Write)?;
        }
        let entries = self.inner.lock().expect("vector index lock poisoned").clone();
        let file = IndexFile {
            dimension: self.dimension,
            entries,
        };
        let bytes = serde_json::to_vec(&file)?;
        std::fs::write(path, bytes).map_err(IndexError::Write)?;
        info!(path = %path.display(), vectors = file.entries.len(), "saved vector index");
        Ok(())
    }

    /// Load from `path`. A missing file is treated as an empty index,
    /// matching the original's tolerant-to-missing-file behavior.
    pub fn load(path: &Path, dimension: usize) -> Result<Self, IndexError> {
        if !path.exists() {
            warn!(path = %path.display(), "vector index file not found, starting empty");
            return Ok(Self::new(dimension));
        }

        let bytes = std::fs::read(path).map_err(IndexError::Read)?;
        let file: IndexFile = serde_json::from_slice(&bytes)?;
        info!(path = %path.display(), vectors = file.entries.len(), "loaded vector index");
        Ok(Self {
            dimension: file.dimension,
            inner: Mutex::new(file.entries),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_then_search_finds_exact_match() {
        let index = VectorIndex::new(3);
        index.add(vec![1.0, 0.0, 0.0], 42).unwrap();

        let results = index.search(&[1.0, 0.0, 0.0], 5, 0.75).unwrap();
        assert_eq!(results, vec![(42, 1.0)]);
    }

    #[test]
    fn search_respects_min_similarity_threshold() {
        let index = VectorIndex::new(2);
        index.add(vec![1.0, 0.0], 1).unwrap();
        index.add(vec![0.0, 1.0], 2).unwrap();

        let results = index.search(&[1.0, 0.0], 5, 0.75).unwrap();
        assert_eq!(results, vec![(1, 1.0)]);
    }

    #[test]
    fn repeated_add_for_same_cluster_dedupes_at_query_time() {
        let index = VectorIndex::new(2);
        index.add(vec![1.0, 0.0], 1).unwrap();
        index.add(vec![0.9, 0.1], 1).unwrap();

        let results = index.search(&[1.0, 0.0], 5, 0.0).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0, 1);
    }

    #[test]
    fn save_and_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");

        let index = VectorIndex::new(3);
        index.add(vec![1.0, 0.0, 0.0], 7).unwrap();
        index.save(&path).unwrap();

        let loaded = VectorIndex::load(&path, 3).unwrap();
        assert_eq!(loaded.len(), 1);
        let results = loaded.search(&[1.0, 0.0, 0.0], 5, 0.5).unwrap();
        assert_eq!(results, vec![(7, 1.0)]);
    }

    #[test]
    fn load_missing_file_returns_empty_index() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");

        let index = VectorIndex::load(&path, 3).unwrap();
        assert!(index.is_empty());
    }
}
