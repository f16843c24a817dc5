//! Per-subscriber delivery loop
//!
//! A [`DeliveryStream`] drains one subscriber's queue into a lazy sequence
//! of [`Frame`]s: a handshake, then data frames for queued events, with a
//! keepalive whenever the queue runs dry. The stream ends only when the
//! subscriber is closed.

pub mod frame;
pub mod stream;

pub use frame::Frame;
pub use stream::DeliveryStream;
