//! HTTP server listener
//!
//! Binds the TCP listener and serves the router until a shutdown signal.

use std::future::Future;
use std::sync::Arc;

use tokio::net::TcpListener;

use super::config::ServerConfig;
use super::router::build_router;
use super::state::AppState;
use crate::error::Result;
use crate::hub::PositionHub;

/// Bind to `config.bind_addr` and serve until `shutdown` resolves
///
/// On shutdown the hub is shut down too, so open event streams end and
/// graceful shutdown can complete.
pub async fn serve<F>(config: &ServerConfig, hub: Arc<PositionHub>, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(config.bind_addr).await?;
    serve_listener(listener, config, hub, shutdown).await
}

/// Serve on an already bound listener
pub async fn serve_listener<F>(
    listener: TcpListener,
    config: &ServerConfig,
    hub: Arc<PositionHub>,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    let state = Arc::new(AppState::new(Arc::clone(&hub), config.version.clone()));
    let router = build_router(state, &config.cors_origins);

    tracing::info!(
        addr = %addr,
        heartbeat_secs = config.registry.heartbeat_interval.as_secs(),
        queue_capacity = config.registry.queue_capacity,
        "Position hub listening"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            shutdown.await;
            tracing::info!("Shutdown signal received");
            hub.shutdown();
        })
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
