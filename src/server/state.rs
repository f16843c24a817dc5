//! Shared application state for the HTTP layer

use std::sync::Arc;

use crate::hub::PositionHub;

/// State injected into every handler via axum's `State` extractor
#[derive(Clone)]
pub struct AppState {
    /// The position hub
    pub hub: Arc<PositionHub>,
    /// Version reported by `/version`
    pub version: String,
}

impl AppState {
    /// Create application state around a hub
    pub fn new(hub: Arc<PositionHub>, version: impl Into<String>) -> Self {
        Self {
            hub,
            version: version.into(),
        }
    }
}
