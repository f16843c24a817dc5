//! HTTP layer
//!
//! A thin axum front end over [`PositionHub`](crate::PositionHub): REST
//! ingest and snapshot endpoints plus an event-stream endpoint that
//! forwards each subscriber's delivery stream to its client.

pub mod config;
pub mod error;
pub mod handlers;
pub mod listener;
pub mod router;
pub mod sse;
pub mod state;

pub use config::ServerConfig;
pub use error::ApiError;
pub use listener::{serve, serve_listener};
pub use router::build_router;
pub use state::AppState;
