use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use cluster_manager::ClusterId;
use verification_orchestrator::VerdictResult;

/// Stands in for the relational store spec.md names as the source of
/// truth for messages, sightings, and verdicts. Out of scope here; this
/// in-memory implementation is sufficient for the worker and its tests
/// to run standalone.
pub trait MessageStore: Send + Sync {
    fn next_message_id(&self) -> u64;
    fn record_sighting(&self, cluster_id: ClusterId, at: DateTime<Utc>);
    fn sightings_for(&self, cluster_id: ClusterId) -> Vec<DateTime<Utc>>;
    fn store_verdict(&self, cluster_id: ClusterId, verdict: VerdictResult);
    fn verdict_for(&self, cluster_id: ClusterId) -> Option<VerdictResult>;
}

#[derive(Default)]
pub struct InMemoryMessageStore {
    next_id: AtomicU64,
    sightings: Mutex<HashMap<ClusterId, Vec<DateTime<Utc>>>>,
    verdicts: Mutex<HashMap<ClusterId, VerdictResult>>,
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MessageStore for InMemoryMessageStore {
    fn next_message_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn record_sighting(&self, cluster_id: ClusterId, at: DateTime<Utc>) {
        self.sightings.lock().unwrap().entry(cluster_id).or_default().push(at);
    }

    fn sightings_for(&self, cluster_id: ClusterId) -> Vec<DateTime<Utc>> {
        self.sightings.lock().unwrap().get(&cluster_id).cloned().unwrap_or_default()
    }

    fn store_verdict(&self, cluster_id: ClusterId, verdict: VerdictResult) {
        self.verdicts.lock().unwrap().insert(cluster_id, verdict);
    }

    fn verdict_for(&self, cluster_id: ClusterId) -> Option<VerdictResult> {
        self.verdicts.lock().unwrap().get(&cluster_id).cloned()
    }
}

/// Stands in for the bot-adapter / dashboard push layer spec.md keeps
/// out of scope. The default implementation just logs.
pub trait Notifier: Send + Sync {
    fn notify(&self, message_id: u64, cluster_id: Option<ClusterId>, short_reply: Option<&str>);
}

pub struct LoggingNotifier;

impl Notifier for LoggingNotifier {
    fn notify(&self, message_id: u64, cluster_id: Option<ClusterId>, short_reply: Option<&str>) {
        tracing::info!(message_id, ?cluster_id, short_reply, "ingestion result ready");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_ids_are_monotonic() {
        let store = InMemoryMessageStore::new();
        assert_eq!(store.next_message_id(), 1);
        assert_eq!(store.next_message_id(), 2);
    }

    #[test]
    fn verdict_round_trips() {
        let store = InMemoryMessageStore::new();
        assert!(store.verdict_for(1).is_none());
        let verdict = VerdictResult::unparseable(vec![], vec![]);
        store.store_verdict(1, verdict.clone());
        assert_eq!(store.verdict_for(1).unwrap().confidence, verdict.confidence);
    }
}
