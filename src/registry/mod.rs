//! Subscriber registry and broadcaster
//!
//! The registry tracks live streaming subscribers and fans every published
//! event out to them. Each subscriber owns a private bounded queue, so a
//! slow consumer can only ever hurt itself.
//!
//! # Architecture
//!
//! ```text
//!                        SubscriberRegistry
//!                   ┌─────────────────────────────┐
//!                   │ members: HashMap<Id,        │
//!                   │   Weak<Subscriber>>         │
//!                   └──────────────┬──────────────┘
//!                                  │ publish(): copy list, release lock
//!         ┌────────────────────────┼────────────────────────┐
//!         ▼                        ▼                        ▼
//!   Subscriber {              Subscriber {             Subscriber {
//!     queue: Mutex<VecDeque>,   ...                      ...
//!     notify, closed }        }                        }
//!         │
//!         └──► DeliveryStream::next_frame() ──► client transport
//! ```
//!
//! # Ownership
//!
//! The registry never owns a subscriber. The stream-serving code holds the
//! [`Subscription`] handle; when the connection goes away the handle is
//! dropped, the subscriber closes, and its close callback removes it from
//! the member map.
//!
//! # Zero-Copy Fan-out
//!
//! Events are serialized once and shared as `bytes::Bytes`. Every queue
//! holds a reference-counted view of the same allocation.

pub mod config;
pub mod error;
pub mod event;
pub mod store;
pub mod subscriber;

pub use config::{OverflowPolicy, RegistryConfig};
pub use error::RegistryError;
pub use event::Event;
pub use store::SubscriberRegistry;
pub use subscriber::{PushOutcome, Subscriber, SubscriberId, Subscription};
