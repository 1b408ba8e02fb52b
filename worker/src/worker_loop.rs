use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{error, info};

use crate::dependencies::Dependencies;
use crate::ingest::evidence_to_snippets;

/// Runs the periodic background worker: each tick takes up to
/// `worker_batch_size` clusters whose status is still UNKNOWN, oldest
/// `last_seen` first, and runs verification for each. A failure on one
/// cluster is logged and the tick proceeds to the next.
pub async fn run(deps: Arc<Dependencies>, mut shutdown: watch::Receiver<bool>) {
    let mut ticker = tokio::time::interval(Duration::from_secs(deps.config.worker_interval_seconds));

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(error) = tick(&deps).await {
                    error!(%error, "worker tick failed");
                }
            }
            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    info!("worker loop shutting down");
                    break;
                }
            }
        }
    }
}

async fn tick(deps: &Dependencies) -> anyhow::Result<()> {
    let pending = deps.cluster_manager.pending_unverified(deps.config.worker_batch_size);
    info!(count = pending.len(), "worker tick processing unverified clusters");

    for cluster in pending {
        let evidence = deps
            .evidence_retriever
            .gather_evidence(&cluster.canonical_text, 3, 5)
            .await;
        let snippets = evidence_to_snippets(&evidence);

        let verdict = deps.orchestrator.verify(&cluster.canonical_text, snippets).await;

        if let Err(error) = deps.cluster_manager.set_status(cluster.id, verdict.status) {
            error!(%error, cluster_id = cluster.id, "failed to persist cluster status during worker tick");
            continue;
        }
        deps.message_store.store_verdict(cluster.id, verdict);
        info!(cluster_id = cluster.id, "cluster verified by worker tick");
    }

    Ok(())
}
