//! Delivery stream implementation

use std::time::Duration;

use futures::Stream;
use tokio::time::Instant;

use super::frame::Frame;
use crate::registry::config::MIN_HEARTBEAT_INTERVAL;
use crate::registry::{Subscriber, SubscriberId, Subscription};

/// Lazy, infinite frame sequence for one subscriber
///
/// Owns the [`Subscription`], so dropping the stream (for example when the
/// client connection is torn down) closes and deregisters the subscriber.
///
/// Loop per call to [`next_frame`](Self::next_frame):
/// 1. closed subscriber: the sequence ends;
/// 2. queued event: yield it as [`Frame::Data`];
/// 3. empty queue: yield [`Frame::Keepalive`], then on the next call wait up
///    to the heartbeat interval (woken early by a publish) and check again.
#[derive(Debug)]
pub struct DeliveryStream {
    subscription: Subscription,
    heartbeat_interval: Duration,
    handshake_sent: bool,
    /// Set by a keepalive; no further frame is produced before this deadline
    /// unless an event arrives
    idle_until: Option<Instant>,
}

impl DeliveryStream {
    /// Create a delivery stream over a subscription
    ///
    /// Intervals below `MIN_HEARTBEAT_INTERVAL` are raised to it.
    pub fn new(subscription: Subscription, heartbeat_interval: Duration) -> Self {
        Self {
            subscription,
            heartbeat_interval: heartbeat_interval.max(MIN_HEARTBEAT_INTERVAL),
            handshake_sent: false,
            idle_until: None,
        }
    }

    /// Id of the underlying subscriber
    pub fn id(&self) -> SubscriberId {
        self.subscription.id()
    }

    /// The underlying subscriber
    pub fn subscriber(&self) -> &Subscriber {
        self.subscription.subscriber()
    }

    /// Close the subscriber; the sequence ends at the next call
    pub fn close(&self) {
        self.subscription.close();
    }

    /// Produce the next frame, or `None` once the subscriber is closed
    ///
    /// Cancel-safe: dropping the returned future loses no events.
    pub async fn next_frame(&mut self) -> Option<Frame> {
        if !self.handshake_sent {
            self.handshake_sent = true;
            return Some(Frame::Handshake);
        }

        loop {
            let subscriber = self.subscription.subscriber();

            if subscriber.is_closed() {
                return None;
            }

            if let Some(data) = subscriber.pop() {
                self.idle_until = None;
                return Some(Frame::Data(data));
            }

            let now = Instant::now();
            if let Some(deadline) = self.idle_until {
                if now < deadline {
                    // Spurious wake-ups fall through to another wait
                    subscriber.wait(deadline - now).await;
                    continue;
                }
            }

            self.idle_until = Some(now + self.heartbeat_interval);
            return Some(Frame::keepalive_now());
        }
    }

    /// Convert into a `futures::Stream` of frames
    pub fn into_stream(self) -> impl Stream<Item = Frame> + Send + 'static {
        futures::stream::unfold(self, |mut stream| async move {
            let frame = stream.next_frame().await?;
            Some((frame, stream))
        })
    }
}
