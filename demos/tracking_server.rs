//! Vehicle tracking server
//!
//! Run with: cargo run --example tracking_server
//!
//! Configuration comes from the environment (see `ServerConfig::from_env`):
//!   PORT=5002 CORS_ORIGINS=* HEARTBEAT_SECS=15 cargo run --example tracking_server
//!
//! ## Publishing positions
//!
//!   curl -X POST localhost:5002/api/positions \
//!        -H 'content-type: application/json' \
//!        -d '{"vehicle_id": 1, "latitude": 10.0, "longitude": 20.0}'
//!
//! ## Watching the stream
//!
//!   curl -N localhost:5002/api/stream/positions
//!
//! ## Snapshot
//!
//!   curl 'localhost:5002/api/positions?vehicle_id=1'
//!
//! Set `RUST_LOG` to control log output, or `DEBUG=true` for debug logs.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use vehicle_hub::{serve, PositionHub, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let debug = std::env::var("DEBUG")
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    let default_level = if debug { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config = ServerConfig::from_env()?;
    let hub = Arc::new(PositionHub::with_config(config.registry.clone()));

    // Periodically log hub stats
    let stats_hub = Arc::clone(&hub);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(std::time::Duration::from_secs(60));
        loop {
            ticker.tick().await;
            let stats = stats_hub.stats();
            tracing::info!(
                vehicles = stats.vehicles,
                subscribers = stats.subscribers,
                published = stats.events_published,
                dropped = stats.events_dropped,
                fan_out = stats.fan_out(),
                "Hub stats"
            );
        }
    });

    serve(&config, hub, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await?;

    Ok(())
}
