use chrono::{DateTime, Utc};
use cluster_manager::ClusterId;

use crate::graph::MemoryGraph;
use crate::types::Prediction;

fn probability_for_phase(phase: f32) -> f32 {
    if phase < 0.5 {
        0.5 * phase
    } else if phase < 1.5 {
        0.5 + (1.0 - (1.0 - phase).abs()) * 0.5
    } else {
        (1.0 - (phase - 1.5) * 0.2).max(0.2)
    }
}

/// Predicts which clusters are likely to resurface, from historical spike
/// intervals plus an optional boost for clusters related to
/// `current_context`. Returns the top `top_k` by probability.
pub fn predict_reemergence(graph: &MemoryGraph, current_context: &[ClusterId], top_k: usize, now: DateTime<Utc>) -> Vec<Prediction> {
    let mut predictions: Vec<Prediction> = Vec::new();

    for (cluster_id, spikes) in graph.all_spike_histories() {
        if spikes.len() < 2 {
            continue;
        }

        let mut sorted = spikes.clone();
        sorted.sort();

        let intervals: Vec<f64> = sorted
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).num_seconds() as f64 / 86_400.0)
            .filter(|interval| *interval > 0.0)
            .collect();

        if intervals.is_empty() {
            continue;
        }

        let mean_interval = intervals.iter().sum::<f64>() / intervals.len() as f64;
        let last_spike = *sorted.last().unwrap();
        let days_since = (now - last_spike).num_seconds() as f64 / 86_400.0;

        if mean_interval <= 0.0 {
            continue;
        }

        let phase = (days_since / mean_interval) as f32;
        let probability = probability_for_phase(phase);
        let reason = format!("historical pattern: avg {mean_interval:.0} day cycle, {days_since:.0} days since last spike");

        predictions.push(Prediction {
            cluster_id,
            probability,
            reason,
        });
    }

    for &context_cluster in current_context {
        let related = graph.get_related_clusters(context_cluster, 2);
        for (related_id, score) in related {
            if let Some(existing) = predictions.iter_mut().find(|p| p.cluster_id == related_id) {
                existing.probability = (existing.probability + score * 0.3).min(1.0);
                existing.reason = format!("{} (related to active cluster {context_cluster})", existing.reason);
            } else {
                predictions.push(Prediction {
                    cluster_id: related_id,
                    probability: score * 0.4,
                    reason: format!("related to currently active cluster {context_cluster}"),
                });
            }
        }
    }

    predictions.sort_by(|a, b| b.probability.partial_cmp(&a.probability).unwrap());
    predictions.truncate(top_k);
    predictions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicts_highest_probability_near_average_interval() {
        let graph = MemoryGraph::new();
        let now = Utc::now();
        graph.record_spike(1, now - chrono::Duration::days(20));
        graph.record_spike(1, now - chrono::Duration::days(10));

        let predictions = predict_reemergence(&graph, &[], 5, now);
        assert_eq!(predictions.len(), 1);
        assert!(predictions[0].probability > 0.4);
    }

    #[test]
    fn ignores_clusters_with_fewer_than_two_spikes() {
        let graph = MemoryGraph::new();
        graph.record_spike(1, Utc::now());

        let predictions = predict_reemergence(&graph, &[], 5, Utc::now());
        assert!(predictions.is_empty());
    }

    #[test]
    fn boosts_related_clusters_in_current_context() {
        let graph = MemoryGraph::new();
        let now = Utc::now();
        graph.record_spike(1, now - chrono::Duration::days(20));
        graph.record_spike(1, now - chrono::Duration::days(10));
        graph.add_relationship(1, 2, "related_to", 1.0);

        let without_context = predict_reemergence(&graph, &[], 5, now);
        let with_context = predict_reemergence(&graph, &[2], 5, now);

        let base = without_context.iter().find(|p| p.cluster_id == 1).unwrap().probability;
        let boosted = with_context.iter().find(|p| p.cluster_id == 1).unwrap().probability;
        assert!(boosted >= base);
    }

    #[test]
    fn inserts_new_prediction_for_unspiked_related_cluster() {
        let graph = MemoryGraph::new();
        graph.add_relationship(1, 2, "related_to", 1.0);

        let predictions = predict_reemergence(&graph, &[1], 5, Utc::now());
        assert_eq!(predictions.len(), 1);
        assert_eq!(predictions[0].cluster_id, 2);
    }

    #[test]
    fn truncates_to_top_k() {
        let graph = MemoryGraph::new();
        let now = Utc::now();
        for cluster_id in 1..=10 {
            graph.record_spike(cluster_id, now - chrono::Duration::days(20));
            graph.record_spike(cluster_id, now - chrono::Duration::days(10));
        }

        let predictions = predict_reemergence(&graph, &[], 3, now);
        assert_eq!(predictions.len(), 3);
    }
}
