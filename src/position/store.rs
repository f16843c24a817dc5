//! Position store implementation

use std::collections::HashMap;

use parking_lot::RwLock;

use super::types::{Position, VehicleId};

/// Latest known position per vehicle
///
/// Thread-safe via `RwLock`. Snapshot reads copy the matching entries out
/// under the read lock; filtering and sorting happen after it is released.
#[derive(Debug, Default)]
pub struct PositionStore {
    latest: RwLock<HashMap<VehicleId, Position>>,
}

impl PositionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert a position by vehicle id
    ///
    /// Last write wins. Returns the position it replaced, if any.
    pub fn update(&self, position: Position) -> Option<Position> {
        self.latest.write().insert(position.vehicle_id, position)
    }

    /// Latest position of one vehicle
    pub fn get(&self, vehicle_id: VehicleId) -> Option<Position> {
        self.latest.read().get(&vehicle_id).cloned()
    }

    /// All current positions, optionally restricted to one vehicle
    ///
    /// Ordered by vehicle id.
    pub fn snapshot(&self, vehicle_id: Option<VehicleId>) -> Vec<Position> {
        let mut positions: Vec<Position> = match vehicle_id {
            Some(id) => self.get(id).into_iter().collect(),
            None => self.latest.read().values().cloned().collect(),
        };

        positions.sort_by_key(|p| p.vehicle_id);
        positions
    }

    /// Forget a vehicle
    pub fn remove(&self, vehicle_id: VehicleId) -> Option<Position> {
        self.latest.write().remove(&vehicle_id)
    }

    /// Number of tracked vehicles
    pub fn len(&self) -> usize {
        self.latest.read().len()
    }

    /// Whether no vehicle has reported yet
    pub fn is_empty(&self) -> bool {
        self.latest.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_write_wins() {
        let store = PositionStore::new();

        assert!(store.update(Position::new(1, 10.0, 20.0, 100.0)).is_none());
        let replaced = store.update(Position::new(1, 10.5, 20.5, 101.0)).unwrap();
        assert_eq!(replaced.timestamp, 100.0);

        let snapshot = store.snapshot(None);
        assert_eq!(snapshot, vec![Position::new(1, 10.5, 20.5, 101.0)]);
    }

    #[test]
    fn test_no_timestamp_reordering() {
        let store = PositionStore::new();

        store.update(Position::new(1, 10.0, 20.0, 200.0));
        // Older timestamp arriving later still wins
        store.update(Position::new(1, 11.0, 21.0, 150.0));

        assert_eq!(store.get(1).unwrap().timestamp, 150.0);
    }

    #[test]
    fn test_superseded_fields_are_not_merged() {
        let store = PositionStore::new();

        store.update(Position::new(1, 10.0, 20.0, 100.0).with_heading(90.0));
        store.update(Position::new(1, 10.0, 20.0, 101.0));

        assert!(store.get(1).unwrap().heading.is_none());
    }

    #[test]
    fn test_snapshot_vehicle_filter() {
        let store = PositionStore::new();
        store.update(Position::new(3, 0.0, 0.0, 1.0));
        store.update(Position::new(7, 1.0, 1.0, 1.0));

        let only_seven = store.snapshot(Some(7));
        assert_eq!(only_seven.len(), 1);
        assert_eq!(only_seven[0].vehicle_id, 7);

        assert!(store.snapshot(Some(9)).is_empty());
    }

    #[test]
    fn test_snapshot_ordered_by_vehicle() {
        let store = PositionStore::new();
        for id in [5, 1, 3] {
            store.update(Position::new(id, 0.0, 0.0, 1.0));
        }

        let ids: Vec<VehicleId> = store.snapshot(None).iter().map(|p| p.vehicle_id).collect();
        assert_eq!(ids, vec![1, 3, 5]);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_remove() {
        let store = PositionStore::new();
        store.update(Position::new(1, 0.0, 0.0, 1.0));

        assert!(store.remove(1).is_some());
        assert!(store.remove(1).is_none());
        assert!(store.is_empty());
    }
}
