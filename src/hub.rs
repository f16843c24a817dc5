//! Position hub
//!
//! [`PositionHub`] composes the [`PositionStore`] and the
//! [`SubscriberRegistry`] behind the two operations collaborators use:
//! [`update_position`](PositionHub::update_position) and
//! [`get_snapshot`](PositionHub::get_snapshot).
//!
//! The hub is an ordinary value. Build one at startup, share it through an
//! `Arc`, and call [`shutdown`](PositionHub::shutdown) when the service stops.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::delivery::DeliveryStream;
use crate::position::{
    Position, PositionStore, RouteAssignments, RouteFilter, Snapshot, SnapshotQuery,
};
use crate::registry::{Event, RegistryConfig, RegistryError, SubscriberRegistry};
use crate::stats::HubStats;

/// Real-time vehicle position hub
pub struct PositionHub {
    positions: PositionStore,
    registry: SubscriberRegistry,
    assignments: Option<Arc<dyn RouteAssignments>>,
    /// Set once the unsupported route filter has been reported
    route_filter_warned: AtomicBool,
}

impl PositionHub {
    /// Create a hub with default configuration
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create a hub with custom registry configuration
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            positions: PositionStore::new(),
            registry: SubscriberRegistry::with_config(config),
            assignments: None,
            route_filter_warned: AtomicBool::new(false),
        }
    }

    /// Attach route assignments so `route_id` filters can be honored
    pub fn with_route_assignments(mut self, assignments: Arc<dyn RouteAssignments>) -> Self {
        self.assignments = Some(assignments);
        self
    }

    /// Whether `route_id` filters are applied
    pub fn supports_route_filter(&self) -> bool {
        self.assignments.is_some()
    }

    /// Registry configuration
    pub fn config(&self) -> &RegistryConfig {
        self.registry.config()
    }

    /// The subscriber registry
    pub fn registry(&self) -> &SubscriberRegistry {
        &self.registry
    }

    /// Ingest a position and broadcast it
    ///
    /// The store is written before the event is published, so a client that
    /// subscribes mid-update and then takes a snapshot sees state at least as
    /// new as what was broadcast. Never blocks on subscribers.
    pub fn update_position(&self, position: Position) {
        let vehicle_id = position.vehicle_id;
        let event = Event::Position(position.clone());

        self.positions.update(position);

        match event.encode() {
            Ok(data) => {
                self.registry.publish(data);
            }
            Err(e) => {
                tracing::warn!(
                    vehicle_id = vehicle_id,
                    error = %e,
                    "Failed to encode position event"
                );
            }
        }
    }

    /// Current positions matching the query
    pub fn get_snapshot(&self, query: &SnapshotQuery) -> Snapshot {
        let mut positions = self.positions.snapshot(query.vehicle_id);

        let route_filter = match (query.route_id, &self.assignments) {
            (None, _) => RouteFilter::NotRequested,
            (Some(route_id), Some(assignments)) => {
                positions.retain(|p| assignments.route_of(p.vehicle_id) == Some(route_id));
                RouteFilter::Applied
            }
            (Some(route_id), None) => {
                if !self.route_filter_warned.swap(true, Ordering::Relaxed) {
                    tracing::warn!(
                        route_id = route_id,
                        "Route filter requested but no route assignments are configured; \
                         returning positions for all routes"
                    );
                }
                RouteFilter::Unsupported
            }
        };

        Snapshot {
            positions,
            route_filter,
        }
    }

    /// Open a new event stream
    pub fn subscribe(&self) -> Result<DeliveryStream, RegistryError> {
        let subscription = self.registry.subscribe()?;
        Ok(DeliveryStream::new(
            subscription,
            self.registry.config().heartbeat_interval,
        ))
    }

    /// Close every open stream and refuse new subscribers
    pub fn shutdown(&self) {
        self.registry.shutdown();
    }

    /// Point-in-time statistics
    pub fn stats(&self) -> HubStats {
        let counters = self.registry.counters();
        HubStats {
            vehicles: self.positions.len(),
            subscribers: self.registry.subscriber_count(),
            events_published: counters.events_published(),
            deliveries: counters.deliveries(),
            events_dropped: counters.events_dropped(),
            overflow_disconnects: counters.overflow_disconnects(),
        }
    }
}

impl Default for PositionHub {
    fn default() -> Self {
        Self::new()
    }
}
