//! HTTP endpoint handlers
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Minimal HTML index |
//! | `GET` | `/healthz` | Liveness probe |
//! | `GET` | `/version` | Configured version |
//! | `GET` | `/api/positions` | Snapshot of current positions |
//! | `POST` | `/api/positions` | Ingest one position |
//! | `GET` | `/api/stream/positions` | Event stream of position updates |
//! | `GET` | `/api/stats` | Hub statistics |

use std::convert::Infallible;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::body::Body;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::header::{self, HeaderName};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use futures::StreamExt;
use serde::Deserialize;

use super::error::ApiError;
use super::sse::{encode_frame, EVENT_STREAM_CONTENT_TYPE};
use super::state::AppState;
use crate::position::{Position, SnapshotQuery, VehicleId};

/// Response header reporting how a `route_id` filter was handled
pub const ROUTE_FILTER_HEADER: HeaderName = HeaderName::from_static("x-route-filter");

/// Body of `POST /api/positions`
#[derive(Debug, Clone, Deserialize)]
pub struct IngestRequest {
    /// Reporting vehicle
    #[serde(alias = "bus_id")]
    pub vehicle_id: VehicleId,
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Optional heading
    #[serde(default)]
    pub heading: Option<f64>,
    /// Optional speed
    #[serde(default)]
    pub speed: Option<f64>,
    /// Seconds since the epoch; defaults to the time of receipt
    #[serde(default)]
    pub timestamp: Option<f64>,
}

impl IngestRequest {
    /// Build the position, stamping it with `now` if no timestamp was sent
    pub fn into_position(self, now: f64) -> Position {
        Position {
            vehicle_id: self.vehicle_id,
            latitude: self.latitude,
            longitude: self.longitude,
            heading: self.heading,
            speed: self.speed,
            timestamp: self.timestamp.unwrap_or(now),
        }
    }
}

fn unix_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

/// `GET /`
pub async fn index() -> Html<&'static str> {
    Html(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>Vehicle Position Hub</title></head>
<body style="font-family: system-ui; padding: 20px;">
    <h2>Vehicle Position Hub</h2>
    <ul>
        <li><a href="/healthz">/healthz</a></li>
        <li><a href="/version">/version</a></li>
        <li><a href="/api/positions">/api/positions</a></li>
        <li><a href="/api/stream/positions">/api/stream/positions</a> (event stream)</li>
        <li><a href="/api/stats">/api/stats</a></li>
    </ul>
</body>
</html>"#,
    )
}

/// `GET /healthz`
pub async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// `GET /version`
pub async fn version(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "version": state.version }))
}

/// `GET /api/positions?vehicle_id=&route_id=`
///
/// Returns a JSON array. The `x-route-filter` header is `none`, `applied`
/// or `unsupported`; with `unsupported` the array is not restricted to the
/// requested route.
pub async fn get_positions(
    State(state): State<Arc<AppState>>,
    query: Result<Query<SnapshotQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::InvalidPayload(e.body_text()))?;

    let snapshot = state.hub.get_snapshot(&query);

    Ok((
        [(ROUTE_FILTER_HEADER, snapshot.route_filter.as_str())],
        Json(snapshot.positions),
    )
        .into_response())
}

/// `POST /api/positions`
pub async fn post_position(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<IngestRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::InvalidPayload(e.body_text()))?;

    let position = request.into_position(unix_now());
    tracing::debug!(vehicle_id = position.vehicle_id, "Position received");
    state.hub.update_position(position);

    Ok(Json(serde_json::json!({ "ok": true })))
}

/// `GET /api/stream/positions`
///
/// The response body is the subscriber's delivery stream. When the client
/// disconnects the body is dropped, which closes the subscriber.
pub async fn stream_positions(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let stream = state.hub.subscribe()?;

    let body = stream
        .into_stream()
        .map(|frame| Ok::<_, Infallible>(encode_frame(&frame)));

    Ok((
        [
            (header::CONTENT_TYPE, EVENT_STREAM_CONTENT_TYPE),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        Body::from_stream(body),
    )
        .into_response())
}

/// `GET /api/stats`
pub async fn get_stats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.hub.stats())
}
