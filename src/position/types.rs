//! Position record and snapshot query types

use serde::{Deserialize, Serialize};

/// Stable identifier of a tracked vehicle
pub type VehicleId = i64;

/// Identifier of a route, as assigned by the route collaborator
pub type RouteId = i64;

/// A single position report from a vehicle
///
/// Immutable once built. A newer report for the same vehicle replaces this
/// one in the store; fields are never merged.
///
/// Serialized output always names the vehicle `vehicle_id`. The legacy name
/// `bus_id` is accepted on input only, so older clients that read `bus_id`
/// from snapshots or stream payloads must switch to `vehicle_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Vehicle that reported the position
    #[serde(alias = "bus_id")]
    pub vehicle_id: VehicleId,
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Heading in degrees, if the device reports one
    #[serde(default)]
    pub heading: Option<f64>,
    /// Speed, if the device reports one
    #[serde(default)]
    pub speed: Option<f64>,
    /// Seconds since the Unix epoch
    pub timestamp: f64,
}

impl Position {
    /// Create a position without heading or speed
    pub fn new(vehicle_id: VehicleId, latitude: f64, longitude: f64, timestamp: f64) -> Self {
        Self {
            vehicle_id,
            latitude,
            longitude,
            heading: None,
            speed: None,
            timestamp,
        }
    }

    /// Set the heading
    pub fn with_heading(mut self, heading: f64) -> Self {
        self.heading = Some(heading);
        self
    }

    /// Set the speed
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = Some(speed);
        self
    }
}

/// Filter for snapshot queries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct SnapshotQuery {
    /// Exact-match vehicle filter
    #[serde(default, alias = "bus_id")]
    pub vehicle_id: Option<VehicleId>,
    /// Route filter (needs route assignments to be honored)
    #[serde(default)]
    pub route_id: Option<RouteId>,
}

impl SnapshotQuery {
    /// Query for a single vehicle
    pub fn vehicle(vehicle_id: VehicleId) -> Self {
        Self {
            vehicle_id: Some(vehicle_id),
            route_id: None,
        }
    }

    /// Query for all vehicles on a route
    pub fn route(route_id: RouteId) -> Self {
        Self {
            vehicle_id: None,
            route_id: Some(route_id),
        }
    }
}

/// How a requested route filter was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteFilter {
    /// No route filter was requested
    NotRequested,
    /// Route filter applied using the configured assignments
    Applied,
    /// Route filter requested but no assignments are available; the
    /// positions are NOT restricted to the route
    Unsupported,
}

impl RouteFilter {
    /// Short lowercase name, used in response headers
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteFilter::NotRequested => "none",
            RouteFilter::Applied => "applied",
            RouteFilter::Unsupported => "unsupported",
        }
    }
}

/// Result of a snapshot query
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Matching positions, ordered by vehicle id
    pub positions: Vec<Position>,
    /// Whether the route filter was honored
    pub route_filter: RouteFilter,
}
