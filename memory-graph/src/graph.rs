use std::collections::{HashMap, HashSet, VecDeque};
use std::fs;
use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use cluster_manager::ClusterId;
use thiserror::Error;
use tracing::{info, warn};

use crate::types::{Edge, GraphFile};

const MAX_SPIKES_PER_CLUSTER: usize = 100;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("failed to read memory graph file: {0}")]
    Read(#[source] std::io::Error),
    #[error("failed to write memory graph file: {0}")]
    Write(#[source] std::io::Error),
    #[error("failed to serialize memory graph: {0}")]
    Serde(#[from] serde_json::Error),
}

struct State {
    nodes: HashSet<ClusterId>,
    edges: HashMap<ClusterId, Vec<Edge>>,
    spike_history: HashMap<ClusterId, Vec<DateTime<Utc>>>,
}

/// An undirected graph of claim clusters used to find related claims and
/// predict when a dormant claim is likely to resurface. Nodes and edges
/// live entirely in memory behind a single lock; persistence is a JSON
/// side file, tolerant of being absent.
pub struct MemoryGraph {
    state: Mutex<State>,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                nodes: HashSet::new(),
                edges: HashMap::new(),
                spike_history: HashMap::new(),
            }),
        }
    }

    pub fn add_cluster_node(&self, cluster_id: ClusterId) {
        let mut state = self.state.lock().unwrap();
        state.nodes.insert(cluster_id);
    }

    /// Adds or strengthens an edge between two clusters. The relationship
    /// type is only recorded when the edge is first created; repeated
    /// calls for the same pair accumulate weight.
    pub fn add_relationship(&self, cluster_a: ClusterId, cluster_b: ClusterId, relationship_type: &str, weight: f32) {
        let mut state = self.state.lock().unwrap();
        state.nodes.insert(cluster_a);
        state.nodes.insert(cluster_b);

        for (from, to) in [(cluster_a, cluster_b), (cluster_b, cluster_a)] {
            let edges = state.edges.entry(from).or_default();
            if let Some(existing) = edges.iter_mut().find(|e| e.other == to) {
                existing.weight += weight;
            } else {
                edges.push(Edge {
                    other: to,
                    relationship_type: relationship_type.to_string(),
                    weight,
                });
            }
        }
    }

    /// Records a spike timestamp for a cluster, keeping only the most
    /// recent `MAX_SPIKES_PER_CLUSTER` entries.
    pub fn record_spike(&self, cluster_id: ClusterId, timestamp: DateTime<Utc>) {
        let mut state = self.state.lock().unwrap();
        let spikes = state.spike_history.entry(cluster_id).or_default();
        spikes.push(timestamp);
        if spikes.len() > MAX_SPIKES_PER_CLUSTER {
            let drop = spikes.len() - MAX_SPIKES_PER_CLUSTER;
            spikes.drain(0..drop);
        }
    }

    /// A spike is detected when the count of sightings within the last
    /// `window_hours` exceeds `threshold_multiplier` times the average
    /// rate per window over the full sighting history. Records a spike
    /// timestamp when detected. `sightings` need not be sorted.
    pub fn detect_spike(&self, cluster_id: ClusterId, sightings: &[DateTime<Utc>], window_hours: i64, threshold_multiplier: f64, now: DateTime<Utc>) -> bool {
        if sightings.len() < 10 {
            return false;
        }

        let window_start = now - chrono::Duration::hours(window_hours);
        let recent_count = sightings.iter().filter(|s| **s >= window_start).count();

        let oldest = sightings.iter().min().copied().unwrap_or(now);
        let total_hours = ((now - oldest).num_seconds() as f64 / 3600.0).max(1.0);
        let windows = (total_hours / window_hours as f64).max(1.0);
        let avg_per_window = sightings.len() as f64 / windows;

        let is_spike = recent_count as f64 > avg_per_window * threshold_multiplier;
        if is_spike {
            self.record_spike(cluster_id, now);
        }
        is_spike
    }

    /// BFS over the graph up to `max_depth` hops, scoring neighbors
    /// `1 / (distance + 1)`, sorted descending by score.
    pub fn get_related_clusters(&self, cluster_id: ClusterId, max_depth: u32) -> Vec<(ClusterId, f32)> {
        let state = self.state.lock().unwrap();
        if !state.nodes.contains(&cluster_id) {
            return Vec::new();
        }

        let mut distances: HashMap<ClusterId, u32> = HashMap::new();
        distances.insert(cluster_id, 0);
        let mut queue = VecDeque::new();
        queue.push_back(cluster_id);

        while let Some(current) = queue.pop_front() {
            let depth = distances[&current];
            if depth >= max_depth {
                continue;
            }
            if let Some(edges) = state.edges.get(&current) {
                for edge in edges {
                    if !distances.contains_key(&edge.other) {
                        distances.insert(edge.other, depth + 1);
                        queue.push_back(edge.other);
                    }
                }
            }
        }

        let mut related: Vec<(ClusterId, f32)> = distances
            .into_iter()
            .filter(|(id, _)| *id != cluster_id)
            .map(|(id, distance)| (id, 1.0 / (distance as f32 + 1.0)))
            .collect();
        related.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());
        related
    }

    pub(crate) fn spike_history_for(&self, cluster_id: ClusterId) -> Vec<DateTime<Utc>> {
        self.state.lock().unwrap().spike_history.get(&cluster_id).cloned().unwrap_or_default()
    }

    pub(crate) fn all_spike_histories(&self) -> Vec<(ClusterId, Vec<DateTime<Utc>>)> {
        self.state.lock().unwrap().spike_history.iter().map(|(id, spikes)| (*id, spikes.clone())).collect()
    }

    pub fn stats(&self) -> (usize, usize, usize) {
        let state = self.state.lock().unwrap();
        let edge_count: usize = state.edges.values().map(Vec::len).sum::<usize>() / 2;
        let tracked_spikes: usize = state.spike_history.values().map(Vec::len).sum();
        (state.nodes.len(), edge_count, tracked_spikes)
    }

    pub fn save(&self, path: &Path) -> Result<(), GraphError> {
        let state = self.state.lock().unwrap();
        let file = GraphFile {
            nodes: state.nodes.iter().copied().collect(),
            edges: state
                .edges
                .iter()
                .flat_map(|(from, edges)| edges.iter().map(move |e| (*from, e.clone())))
                .collect(),
            spike_history: state.spike_history.iter().map(|(id, spikes)| (*id, spikes.clone())).collect(),
        };
        let json = serde_json::to_string(&file)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(GraphError::Write)?;
        }
        fs::write(path, json).map_err(GraphError::Write)?;
        info!(nodes = file.nodes.len(), "saved memory graph");
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, GraphError> {
        if !path.exists() {
            warn!(path = %path.display(), "memory graph file missing, starting empty");
            return Ok(Self::new());
        }

        let raw = fs::read_to_string(path).map_err(GraphError::Read)?;
        let file: GraphFile = serde_json::from_str(&raw)?;

        let mut edges: HashMap<ClusterId, Vec<Edge>> = HashMap::new();
        for (from, edge) in file.edges {
            edges.entry(from).or_default().push(edge);
        }

        let graph = Self {
            state: Mutex::new(State {
                nodes: file.nodes.into_iter().collect(),
                edges,
                spike_history: file.spike_history.into_iter().collect(),
            }),
        };
        info!(path = %path.display(), "loaded memory graph");
        Ok(graph)
    }
}

impl Default for MemoryGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_relationship_is_symmetric_and_accumulates_weight() {
        let graph = MemoryGraph::new();
        graph.add_relationship(1, 2, "co_occurrence", 1.0);
        graph.add_relationship(1, 2, "co_occurrence", 1.0);

        let related = graph.get_related_clusters(1, 2);
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].0, 2);

        let related_back = graph.get_related_clusters(2, 2);
        assert_eq!(related_back[0].0, 1);
    }

    #[test]
    fn get_related_clusters_scores_by_inverse_distance() {
        let graph = MemoryGraph::new();
        graph.add_relationship(1, 2, "related_to", 1.0);
        graph.add_relationship(2, 3, "related_to", 1.0);

        let related = graph.get_related_clusters(1, 2);
        let scores: HashMap<ClusterId, f32> = related.into_iter().collect();
        assert!(scores[&2] > scores[&3]);
    }

    #[test]
    fn get_related_clusters_respects_max_depth() {
        let graph = MemoryGraph::new();
        graph.add_relationship(1, 2, "related_to", 1.0);
        graph.add_relationship(2, 3, "related_to", 1.0);

        let related = graph.get_related_clusters(1, 1);
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].0, 2);
    }

    #[test]
    fn record_spike_caps_history_at_one_hundred() {
        let graph = MemoryGraph::new();
        let now = Utc::now();
        for i in 0..150 {
            graph.record_spike(1, now - chrono::Duration::days(i));
        }
        assert_eq!(graph.spike_history_for(1).len(), 100);
    }

    #[test]
    fn detect_spike_requires_minimum_history() {
        let graph = MemoryGraph::new();
        let now = Utc::now();
        let sightings: Vec<DateTime<Utc>> = (0..5).map(|i| now - chrono::Duration::hours(i)).collect();
        assert!(!graph.detect_spike(1, &sightings, 24, 3.0, now));
    }

    #[test]
    fn detect_spike_fires_on_recent_burst() {
        let graph = MemoryGraph::new();
        let now = Utc::now();
        let mut sightings: Vec<DateTime<Utc>> = (0..20).map(|i| now - chrono::Duration::days(i)).collect();
        for i in 0..20 {
            sightings.push(now - chrono::Duration::hours(i));
        }
        assert!(graph.detect_spike(1, &sightings, 24, 3.0, now));
    }

    #[test]
    fn save_and_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.json");

        let graph = MemoryGraph::new();
        graph.add_relationship(1, 2, "related_to", 2.5);
        graph.record_spike(1, Utc::now());
        graph.save(&path).unwrap();

        let loaded = MemoryGraph::load(&path).unwrap();
        let related = loaded.get_related_clusters(1, 1);
        assert_eq!(related[0].0, 2);
        assert_eq!(loaded.spike_history_for(1).len(), 1);
    }

    #[test]
    fn load_missing_file_returns_empty_graph() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        let graph = MemoryGraph::load(&path).unwrap();
        assert_eq!(graph.stats().0, 0);
    }
}
