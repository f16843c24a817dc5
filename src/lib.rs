//! Real-time vehicle position hub
//!
//! An in-process publish/subscribe hub that keeps the latest position of
//! every tracked vehicle and fans each update out to long-lived streaming
//! clients.
//!
//! # Architecture
//!
//! ```text
//!                        Arc<PositionHub>
//!               ┌──────────────────────────────────┐
//!  ingest ────► │ PositionStore   (latest per id)  │ ◄──── get_snapshot()
//!               │        │ store-then-broadcast    │
//!               │        ▼                         │
//!               │ SubscriberRegistry               │
//!               │   Weak<Subscriber> per client    │
//!               └────────┬───────────────┬─────────┘
//!                        ▼               ▼
//!                [bounded queue]   [bounded queue]
//!                 DeliveryStream    DeliveryStream ──► event-stream body
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use vehicle_hub::{Position, PositionHub, SnapshotQuery};
//!
//! # async fn example() -> vehicle_hub::Result<()> {
//! let hub = Arc::new(PositionHub::new());
//!
//! let mut stream = hub.subscribe()?;
//! hub.update_position(Position::new(1, 10.0, 20.0, 100.0));
//!
//! // Handshake first, then the buffered position event
//! let _handshake = stream.next_frame().await;
//! let event = stream.next_frame().await;
//! println!("{:?}", event);
//!
//! let snapshot = hub.get_snapshot(&SnapshotQuery::default());
//! assert_eq!(snapshot.positions.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod delivery;
pub mod error;
pub mod hub;
pub mod position;
pub mod registry;
pub mod server;
pub mod stats;

pub use delivery::{DeliveryStream, Frame};
pub use error::{Error, Result};
pub use hub::PositionHub;
pub use position::{
    Position, PositionStore, RouteAssignments, RouteFilter, RouteId, Snapshot, SnapshotQuery,
    StaticRouteAssignments, VehicleId,
};
pub use registry::{OverflowPolicy, RegistryConfig, RegistryError, SubscriberRegistry};
pub use server::{serve, ServerConfig};
pub use stats::HubStats;
