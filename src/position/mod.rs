//! Latest-position storage and snapshot queries
//!
//! The store keeps exactly one [`Position`] per vehicle. Writes are
//! last-write-wins in ingestion order; no timestamp-based reordering is
//! performed, so a vehicle that reports out of order is stored out of order.
//!
//! Route filtering needs to know which vehicle runs which route. That
//! linkage is owned by a collaborator and handed in as a
//! [`RouteAssignments`] implementation. Without one, a `route_id` filter is
//! reported back as [`RouteFilter::Unsupported`] instead of silently
//! returning unfiltered data as if it were filtered.

pub mod assignment;
pub mod store;
pub mod types;

pub use assignment::{RouteAssignments, StaticRouteAssignments};
pub use store::PositionStore;
pub use types::{Position, RouteFilter, RouteId, Snapshot, SnapshotQuery, VehicleId};
