//! Claimguard Worker Service
//!
//! Accepts ingestion requests over HTTP, runs the synchronous
//! detect → embed → cluster → (first-sighting) verify path, and runs a
//! periodic background worker that verifies clusters left UNKNOWN by the
//! fast path.

mod dependencies;
mod http;
mod ingest;
mod rate_limit;
mod store;
mod types;
mod worker_loop;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use pipeline_config::ConfigLoader;
use tokio::sync::watch;
use tracing::info;

use dependencies::Dependencies;

#[derive(Parser)]
#[command(name = "claimguard-worker")]
#[command(about = "Claim ingestion and verification worker")]
struct Args {
    /// Server host
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Server port
    #[arg(long, default_value = "8090")]
    port: u16,

    /// Enable permissive CORS
    #[arg(long)]
    enable_cors: bool,

    /// Optional TOML configuration overlay
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

    let args = Args::parse();

    let loader = ConfigLoader::default();
    let (config, sources) = loader.load(args.config.as_deref())?;
    info!(?sources, "loaded pipeline configuration");

    let deps = Arc::new(Dependencies::new(config));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let worker_deps = Arc::clone(&deps);
    let worker_handle = tokio::spawn(worker_loop::run(worker_deps, shutdown_rx));

    let router = http::build_router(Arc::clone(&deps), args.enable_cors);
    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "claimguard worker listening");

    axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;

    let _ = shutdown_tx.send(true);
    worker_handle.await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}
