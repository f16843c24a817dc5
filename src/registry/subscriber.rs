//! Subscriber state and the owning handle
//!
//! Each subscriber owns a private bounded queue behind its own lock. The
//! registry only ever holds a `Weak` reference; the [`Subscription`] handle
//! held by the stream-serving code is what keeps a subscriber alive, and
//! dropping it closes the subscriber.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use parking_lot::Mutex;
use tokio::sync::Notify;

use super::config::OverflowPolicy;

/// Unique subscriber identifier, never reused within a registry
pub type SubscriberId = u64;

/// Callback run exactly once when a subscriber closes
pub(super) type CloseCallback = Box<dyn FnOnce(SubscriberId) + Send>;

/// Result of pushing an event into a subscriber queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// Event queued
    Queued,
    /// Event queued after evicting the oldest pending event
    DroppedOldest,
    /// Queue was full and the subscriber was closed
    Disconnected,
    /// Subscriber already closed; event discarded
    Closed,
}

/// One open streaming connection
pub struct Subscriber {
    id: SubscriberId,

    /// Pending encoded events, oldest first
    queue: Mutex<VecDeque<Bytes>>,

    capacity: usize,
    policy: OverflowPolicy,

    closed: AtomicBool,

    /// Wakes the delivery loop when an event arrives or the subscriber closes
    notify: Notify,

    on_close: Mutex<Option<CloseCallback>>,

    /// Events evicted or refused because the queue was full
    dropped: AtomicU64,

    created_at: Instant,
}

impl Subscriber {
    pub(super) fn new(id: SubscriberId, capacity: usize, policy: OverflowPolicy) -> Self {
        Self {
            id,
            queue: Mutex::new(VecDeque::with_capacity(capacity.min(64))),
            capacity: capacity.max(1),
            policy,
            closed: AtomicBool::new(false),
            notify: Notify::new(),
            on_close: Mutex::new(None),
            dropped: AtomicU64::new(0),
            created_at: Instant::now(),
        }
    }

    pub(super) fn set_on_close(&self, callback: CloseCallback) {
        *self.on_close.lock() = Some(callback);
    }

    /// Subscriber id
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Whether the subscriber has been closed
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Number of events waiting to be delivered
    pub fn pending(&self) -> usize {
        self.queue.lock().len()
    }

    /// Number of events lost to overflow
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Time since the subscriber was created
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    /// Enqueue an encoded event
    ///
    /// Never blocks on the consumer. Pushing to a closed subscriber is a
    /// no-op.
    pub fn push(&self, data: Bytes) -> PushOutcome {
        if self.is_closed() {
            return PushOutcome::Closed;
        }

        let outcome = {
            let mut queue = self.queue.lock();
            if queue.len() < self.capacity {
                queue.push_back(data);
                PushOutcome::Queued
            } else {
                match self.policy {
                    OverflowPolicy::DropOldest => {
                        queue.pop_front();
                        queue.push_back(data);
                        PushOutcome::DroppedOldest
                    }
                    OverflowPolicy::Disconnect => PushOutcome::Disconnected,
                }
            }
        };

        match outcome {
            PushOutcome::Queued => self.notify.notify_one(),
            PushOutcome::DroppedOldest => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                self.notify.notify_one();
            }
            PushOutcome::Disconnected => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                // Queue lock is released at this point
                self.close();
            }
            PushOutcome::Closed => {}
        }

        outcome
    }

    /// Take the oldest pending event
    pub fn pop(&self) -> Option<Bytes> {
        self.queue.lock().pop_front()
    }

    /// Wait until an event arrives, the subscriber closes, or `timeout`
    /// elapses
    ///
    /// Returns `true` if woken before the timeout. Only one task should
    /// wait on a subscriber at a time.
    pub async fn wait(&self, timeout: Duration) -> bool {
        tokio::time::timeout(timeout, self.notify.notified())
            .await
            .is_ok()
    }

    /// Close the subscriber
    ///
    /// The first call discards pending events, wakes the delivery loop and
    /// runs the close callback. Later calls do nothing. Returns `true` if
    /// this call performed the close.
    pub fn close(&self) -> bool {
        if self.closed.swap(true, Ordering::AcqRel) {
            return false;
        }

        self.queue.lock().clear();
        self.notify.notify_one();

        let callback = self.on_close.lock().take();
        if let Some(callback) = callback {
            callback(self.id);
        }

        true
    }
}

impl std::fmt::Debug for Subscriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscriber")
            .field("id", &self.id)
            .field("capacity", &self.capacity)
            .field("policy", &self.policy)
            .field("closed", &self.is_closed())
            .field("dropped", &self.dropped())
            .finish()
    }
}

/// Owning handle for a registered subscriber
///
/// Dropping the handle closes the subscriber, which deregisters it from the
/// registry. This is what guarantees cleanup when a client connection is
/// torn down mid-stream.
#[derive(Debug)]
pub struct Subscription {
    subscriber: Arc<Subscriber>,
}

impl Subscription {
    pub(super) fn new(subscriber: Arc<Subscriber>) -> Self {
        Self { subscriber }
    }

    /// Subscriber id
    pub fn id(&self) -> SubscriberId {
        self.subscriber.id()
    }

    /// The underlying subscriber
    pub fn subscriber(&self) -> &Arc<Subscriber> {
        &self.subscriber
    }

    /// Close the subscriber now instead of on drop
    pub fn close(&self) -> bool {
        self.subscriber.close()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.subscriber.close();
    }
}
