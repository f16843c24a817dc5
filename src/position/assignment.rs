//! Route-to-vehicle linkage supplied by a collaborator

use std::collections::HashMap;

use parking_lot::RwLock;

use super::types::{RouteId, VehicleId};

/// Read interface into the vehicle-to-route assignment data
///
/// The hub does not own this data. Whoever does (typically the fleet
/// database layer) implements this trait so snapshot queries can honor a
/// `route_id` filter.
pub trait RouteAssignments: Send + Sync + 'static {
    /// Route the vehicle is currently assigned to, if any
    fn route_of(&self, vehicle_id: VehicleId) -> Option<RouteId>;
}

/// In-memory assignment table
///
/// Useful when the assignments are loaded once at startup (e.g. from a
/// fleet import) and refreshed occasionally.
#[derive(Debug, Default)]
pub struct StaticRouteAssignments {
    routes: RwLock<HashMap<VehicleId, RouteId>>,
}

impl StaticRouteAssignments {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a vehicle to a route, returning the previous route
    pub fn assign(&self, vehicle_id: VehicleId, route_id: RouteId) -> Option<RouteId> {
        self.routes.write().insert(vehicle_id, route_id)
    }

    /// Remove a vehicle's assignment
    pub fn unassign(&self, vehicle_id: VehicleId) -> Option<RouteId> {
        self.routes.write().remove(&vehicle_id)
    }
}

impl FromIterator<(VehicleId, RouteId)> for StaticRouteAssignments {
    fn from_iter<I: IntoIterator<Item = (VehicleId, RouteId)>>(iter: I) -> Self {
        Self {
            routes: RwLock::new(iter.into_iter().collect()),
        }
    }
}

impl RouteAssignments for StaticRouteAssignments {
    fn route_of(&self, vehicle_id: VehicleId) -> Option<RouteId> {
        self.routes.read().get(&vehicle_id).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_and_lookup() {
        let table = StaticRouteAssignments::new();
        assert_eq!(table.route_of(1), None);

        assert_eq!(table.assign(1, 10), None);
        assert_eq!(table.route_of(1), Some(10));

        // Reassignment returns the previous route
        assert_eq!(table.assign(1, 11), Some(10));
        assert_eq!(table.route_of(1), Some(11));

        assert_eq!(table.unassign(1), Some(11));
        assert_eq!(table.route_of(1), None);
    }

    #[test]
    fn test_from_iter() {
        let table: StaticRouteAssignments = [(1, 10), (2, 20)].into_iter().collect();

        assert_eq!(table.route_of(1), Some(10));
        assert_eq!(table.route_of(2), Some(20));
        assert_eq!(table.route_of(3), None);
    }
}
