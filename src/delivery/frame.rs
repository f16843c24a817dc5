//! Frames produced by the delivery loop

use std::time::{SystemTime, UNIX_EPOCH};

use bytes::Bytes;

/// One unit of output for a streaming client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// First frame of every stream, establishes the connection
    Handshake,
    /// An encoded event (JSON, single line)
    Data(Bytes),
    /// Idle marker carrying the current Unix time in seconds
    Keepalive(u64),
}

impl Frame {
    /// Keepalive stamped with the current wall-clock time
    pub fn keepalive_now() -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Frame::Keepalive(now)
    }

    /// Check if this is a data frame
    pub fn is_data(&self) -> bool {
        matches!(self, Frame::Data(_))
    }

    /// Check if this is a keepalive frame
    pub fn is_keepalive(&self) -> bool {
        matches!(self, Frame::Keepalive(_))
    }
}
