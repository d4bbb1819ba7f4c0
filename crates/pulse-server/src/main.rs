mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use pulse_api::AppStateInner;
use pulse_remote::RemoteRecordService;
use pulse_store::LocalCacheStore;
use pulse_sync::{Enhancer, RefreshScheduler, SyncCoordinator};
use pulse_types::events::SyncEvent;

use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pulse=debug,pulse_sync=debug,tower_http=debug".into()),
        )
        .init();

    let config = ServerConfig::from_env()?;
    info!("Remote: {:?}", config.remote);

    let local = Arc::new(LocalCacheStore::open(&config.db_path)?);
    let remote = Arc::new(RemoteRecordService::new(config.remote.clone()));
    let sync = SyncCoordinator::new(local, remote);

    if sync.remote().is_configured() {
        info!("Remote sync enabled");
    } else {
        warn!("Remote not configured, running in local mode");
    }

    tokio::spawn(log_sync_events(sync.clone()));

    let cancel = CancellationToken::new();
    let scheduler = RefreshScheduler::spawn(sync.clone(), config.refresh_interval, cancel.clone());

    let state = Arc::new(AppStateInner {
        sync,
        feed: scheduler.handle(),
        enhancer: Enhancer::disabled(),
    });

    let app = pulse_api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Pulse listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cancel))
        .await?;

    scheduler.shutdown().await;
    Ok(())
}

/// Surfaces remote write failures as an advisory in the log.
async fn log_sync_events(sync: SyncCoordinator) {
    let mut events = sync.subscribe();
    loop {
        match events.recv().await {
            Ok(SyncEvent::RemoteWriteFailed { id }) => {
                warn!("Message {} is saved locally but not synced", id)
            }
            Ok(event) => tracing::debug!("Sync event: {:?}", event),
            Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                warn!("Sync event log lagged by {} events", n)
            }
            Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
        }
    }
}

async fn shutdown_signal(cancel: CancellationToken) {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
                }
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                ctrl_c.await.ok();
                info!("Received Ctrl+C, shutting down...");
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
    cancel.cancel();
}
