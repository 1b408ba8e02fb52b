use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use cluster_manager::ClusterId;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::dependencies::Dependencies;
use crate::ingest::ingest;
use crate::types::{ClusterView, IngestRequest};

pub fn build_router(deps: Arc<Dependencies>, enable_cors: bool) -> Router {
    let router = Router::new()
        .route("/ingest", post(ingest_handler))
        .route("/clusters/:id", get(get_cluster_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(deps);

    if enable_cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

async fn ingest_handler(State(deps): State<Arc<Dependencies>>, Json(request): Json<IngestRequest>) -> impl IntoResponse {
    match ingest(&deps, request).await {
        Ok(Some(response)) => (StatusCode::OK, Json(response)).into_response(),
        Ok(None) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => (StatusCode::BAD_REQUEST, error.to_string()).into_response(),
    }
}

async fn get_cluster_handler(State(deps): State<Arc<Dependencies>>, Path(id): Path<ClusterId>) -> impl IntoResponse {
    let Some(cluster) = deps.cluster_manager.get(id) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let verdict = deps.message_store.verdict_for(id);
    let related_cluster_ids = deps.memory_graph.get_related_clusters(id, 2).into_iter().map(|(cluster_id, _)| cluster_id).collect();

    let view = ClusterView {
        id: cluster.id,
        canonical_text: cluster.canonical_text,
        topic: cluster.topic,
        message_count: cluster.message_count,
        first_seen: cluster.first_seen,
        last_seen: cluster.last_seen,
        status: cluster.status,
        verdict,
        related_cluster_ids,
    };

    (StatusCode::OK, Json(view)).into_response()
}
