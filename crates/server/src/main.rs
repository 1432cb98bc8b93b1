//! lectio-feed entry point.
//!
//! Serves daily reading plans as RSS. Logs are JSON on stderr.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use lectio_client::TextProvider;
use lectio_core::{AppConfig, TextCache};
use tokio::signal;
use tokio::task::JoinHandle;
use tracing_subscriber::EnvFilter;

mod error;
mod feed;
mod routes;
mod state;

use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;

    let cache = Arc::new(TextCache::open(&config.cache_path, config.cache_expiry(), config.cache_save_batch).await);
    tracing::info!(
        path = %config.cache_path.display(),
        persistent = cache.is_persistent(),
        entries = cache.len().await,
        "text cache ready"
    );

    let provider = TextProvider::from_config(&config, cache.clone()).context("failed to build text provider")?;
    let flusher = spawn_flush_task(cache.clone(), config.cache_flush_interval());

    let addr = config.bind_addr();
    let app = routes::create_router(AppState::new(config, cache.clone(), provider));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "lectio-feed listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    flusher.abort();
    cache.flush().await;
    tracing::info!("cache flushed, shutting down");

    Ok(())
}

/// Periodically drop expired entries and persist pending changes.
fn spawn_flush_task(cache: Arc<TextCache>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(every);
        // The first tick completes immediately.
        tick.tick().await;

        loop {
            tick.tick().await;
            let evicted = cache.evict_expired_at(Utc::now()).await;
            if evicted > 0 {
                tracing::debug!(evicted, "evicted expired texts");
            }
            cache.flush().await;
        }
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received ctrl-c"),
        _ = terminate => tracing::info!("received SIGTERM"),
    }
}
