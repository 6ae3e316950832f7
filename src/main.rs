//! DirView — read-only, periodically refreshed view over a directory tree.
//!
//! Thin binary entry point. All logic lives in the `dirview-core`
//! and `dirview-server` crates.

use std::sync::Arc;

use dirview_core::{CacheConfig, RefreshWorker, SnapshotStore};
use dirview_server::ServerConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging; RUST_LOG overrides the INFO default.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("DirView starting");

    let cache_config = CacheConfig::from_env()?;
    cache_config.validate()?;
    let server_config = ServerConfig::from_env()?;

    // The first crawl completes before the listener is bound, so the very
    // first request already sees a full tree.
    let store = {
        let config = cache_config.clone();
        tokio::task::spawn_blocking(move || SnapshotStore::open(&config)).await?
    };
    let store = Arc::new(store);

    let worker = RefreshWorker::spawn(Arc::clone(&store), cache_config.refresh_interval)?;

    let app = dirview_server::app_router(Arc::clone(&store), server_config.app_dir.as_deref());
    let listener = tokio::net::TcpListener::bind(server_config.socket_addr()).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    dirview_server::serve(listener, app, async {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("Shutdown requested");
    })
    .await?;

    // Joins the refresh thread; a crawl in progress finishes first.
    tokio::task::spawn_blocking(move || worker.stop()).await?;
    tracing::info!("DirView stopped");
    Ok(())
}
