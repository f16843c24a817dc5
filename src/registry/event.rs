//! Events pushed into subscriber queues
//!
//! An event is serialized once, in the publisher's context and outside any
//! lock, and the resulting `Bytes` are shared by every subscriber queue.

use bytes::Bytes;
use serde::Serialize;

use crate::position::Position;

/// Wire event delivered to subscribers
///
/// Serialized as `{"type": "<variant>", "payload": {...}}`. Heartbeats are
/// not events; the delivery loop produces them itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Event {
    /// A vehicle reported a new position
    Position(Position),
}

impl Event {
    /// Encode as compact JSON
    pub fn encode(&self) -> serde_json::Result<Bytes> {
        serde_json::to_vec(self).map(Bytes::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_event_shape() {
        let event = Event::Position(Position::new(1, 10.0, 20.0, 100.0));
        let encoded = event.encode().unwrap();

        let json: serde_json::Value = serde_json::from_slice(&encoded).unwrap();
        assert_eq!(json["type"], "position");
        assert_eq!(json["payload"]["vehicle_id"], 1);
        assert_eq!(json["payload"]["latitude"], 10.0);
        assert_eq!(json["payload"]["timestamp"], 100.0);
    }

    #[test]
    fn test_encoded_event_is_single_line() {
        let event = Event::Position(Position::new(1, 10.0, 20.0, 100.0).with_heading(45.0));
        let encoded = event.encode().unwrap();

        assert!(!encoded.contains(&b'\n'));
    }
}
