//! Event-stream framing for delivery frames

use bytes::{BufMut, Bytes, BytesMut};

use crate::delivery::Frame;

/// Content type of the streaming endpoint
pub const EVENT_STREAM_CONTENT_TYPE: &str = "text/event-stream";

const HANDSHAKE: &[u8] = b":ok\n\n";

/// Encode a frame as an event-stream chunk
///
/// - `Handshake` becomes `:ok`
/// - `Data` becomes `data: <json>`
/// - `Keepalive` becomes the comment `:keepalive <unix-time>`
///
/// Every chunk is terminated by a blank line.
pub fn encode_frame(frame: &Frame) -> Bytes {
    match frame {
        Frame::Handshake => Bytes::from_static(HANDSHAKE),
        Frame::Data(data) => {
            let mut buf = BytesMut::with_capacity(data.len() + 8);
            buf.put_slice(b"data: ");
            buf.put_slice(data);
            buf.put_slice(b"\n\n");
            buf.freeze()
        }
        Frame::Keepalive(ts) => Bytes::from(format!(":keepalive {}\n\n", ts)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_handshake() {
        assert_eq!(encode_frame(&Frame::Handshake), Bytes::from_static(b":ok\n\n"));
    }

    #[test]
    fn test_encode_data() {
        let frame = Frame::Data(Bytes::from_static(br#"{"type":"position"}"#));

        assert_eq!(
            encode_frame(&frame),
            Bytes::from_static(b"data: {\"type\":\"position\"}\n\n")
        );
    }

    #[test]
    fn test_encode_keepalive() {
        assert_eq!(
            encode_frame(&Frame::Keepalive(1_700_000_000)),
            Bytes::from_static(b":keepalive 1700000000\n\n")
        );
    }
}
