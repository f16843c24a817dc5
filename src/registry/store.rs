//! Subscriber registry implementation
//!
//! The central registry that tracks live subscribers and fans published
//! events out to them.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use bytes::Bytes;
use parking_lot::RwLock;

use super::config::RegistryConfig;
use super::error::RegistryError;
use super::subscriber::{PushOutcome, Subscriber, SubscriberId, Subscription};
use crate::stats::HubCounters;

type Members = RwLock<HashMap<SubscriberId, Weak<Subscriber>>>;

/// Registry of live subscribers
///
/// Critical sections:
/// - `subscribe` holds the member write lock only to check the limit and
///   insert.
/// - `publish` holds the member read lock only to copy the member list.
/// - the close callback holds the member write lock only to remove one id.
///
/// No per-subscriber lock is ever taken while the member lock is held, and
/// the close callback runs after the subscriber has released its queue lock.
pub struct SubscriberRegistry {
    /// Non-owning references to live subscribers
    members: Arc<Members>,

    next_id: AtomicU64,

    /// Cleared by `shutdown`
    accepting: AtomicBool,

    counters: HubCounters,

    config: RegistryConfig,
}

impl SubscriberRegistry {
    /// Create a new registry with default configuration
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create a new registry with custom configuration
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            members: Arc::new(RwLock::new(HashMap::new())),
            next_id: AtomicU64::new(1),
            accepting: AtomicBool::new(true),
            counters: HubCounters::default(),
            config,
        }
    }

    /// Get the registry configuration
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Delivery counters
    pub fn counters(&self) -> &HubCounters {
        &self.counters
    }

    /// Register a new subscriber
    ///
    /// The returned handle owns the subscriber; dropping it deregisters it.
    pub fn subscribe(&self) -> Result<Subscription, RegistryError> {
        if !self.accepting.load(Ordering::Acquire) {
            return Err(RegistryError::ShuttingDown);
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let subscriber = Arc::new(Subscriber::new(
            id,
            self.config.queue_capacity,
            self.config.overflow_policy,
        ));

        let members = Arc::downgrade(&self.members);
        subscriber.set_on_close(Box::new(move |id| {
            if let Some(members) = members.upgrade() {
                let removed = members.write().remove(&id).is_some();
                if removed {
                    tracing::info!(subscriber_id = id, "Subscriber removed");
                }
            }
        }));

        let count = {
            let mut members = self.members.write();
            // Re-checked under the lock so `shutdown` cannot miss an insert
            if !self.accepting.load(Ordering::Acquire) {
                return Err(RegistryError::ShuttingDown);
            }
            let max = self.config.max_subscribers;
            if max > 0 && members.len() >= max {
                tracing::warn!(limit = max, "Subscriber rejected: limit reached");
                return Err(RegistryError::SubscriberLimitReached(max));
            }
            members.insert(id, Arc::downgrade(&subscriber));
            members.len()
        };

        tracing::info!(subscriber_id = id, subscribers = count, "Subscriber added");

        Ok(Subscription::new(subscriber))
    }

    /// Deregister and close a subscriber
    ///
    /// Idempotent: a second call for the same subscriber does nothing.
    pub fn unsubscribe(&self, subscriber: &Subscriber) {
        let removed = self.members.write().remove(&subscriber.id()).is_some();
        subscriber.close();

        if removed {
            tracing::info!(
                subscriber_id = subscriber.id(),
                age_secs = subscriber.age().as_secs(),
                "Subscriber unsubscribed"
            );
        }
    }

    /// Deliver an encoded event to every currently registered subscriber
    ///
    /// The member list is copied once under the read lock; subscribers that
    /// register afterwards do not receive this event. Returns the number of
    /// subscribers that queued it.
    pub fn publish(&self, data: Bytes) -> usize {
        let targets: Vec<Weak<Subscriber>> = self.members.read().values().cloned().collect();

        let mut delivered = 0;
        let mut dropped = 0;
        let mut disconnected = 0;

        for subscriber in targets.iter().filter_map(Weak::upgrade) {
            match subscriber.push(data.clone()) {
                PushOutcome::Queued => delivered += 1,
                PushOutcome::DroppedOldest => {
                    delivered += 1;
                    dropped += 1;
                }
                PushOutcome::Disconnected => {
                    disconnected += 1;
                    tracing::warn!(
                        subscriber_id = subscriber.id(),
                        capacity = self.config.queue_capacity,
                        age_secs = subscriber.age().as_secs(),
                        "Subscriber queue full, disconnecting"
                    );
                }
                PushOutcome::Closed => {}
            }
        }

        self.counters.record_publish(delivered, dropped, disconnected);

        tracing::debug!(
            subscribers = targets.len(),
            delivered = delivered,
            dropped = dropped,
            "Event published"
        );

        delivered as usize
    }

    /// Close every subscriber and stop accepting new ones
    pub fn shutdown(&self) {
        self.accepting.store(false, Ordering::Release);

        let targets: Vec<Weak<Subscriber>> =
            self.members.write().drain().map(|(_, s)| s).collect();

        let mut closed = 0;
        for subscriber in targets.iter().filter_map(Weak::upgrade) {
            if subscriber.close() {
                closed += 1;
            }
        }

        tracing::info!(closed = closed, "Subscriber registry shut down");
    }

    /// Whether `shutdown` has been called
    pub fn is_shut_down(&self) -> bool {
        !self.accepting.load(Ordering::Acquire)
    }

    /// Number of registered subscribers
    pub fn subscriber_count(&self) -> usize {
        self.members.read().len()
    }

    /// Whether a subscriber id is still registered
    pub fn contains(&self, id: SubscriberId) -> bool {
        self.members.read().contains_key(&id)
    }
}

impl Default for SubscriberRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::OverflowPolicy;

    fn event(n: u8) -> Bytes {
        Bytes::from(vec![n])
    }

    #[test]
    fn test_subscribe_unsubscribe() {
        let registry = SubscriberRegistry::new();

        let sub = registry.subscribe().unwrap();
        assert_eq!(registry.subscriber_count(), 1);

        registry.unsubscribe(sub.subscriber());
        assert_eq!(registry.subscriber_count(), 0);
        assert!(sub.subscriber().is_closed());
    }

    #[test]
    fn test_unsubscribe_is_idempotent() {
        let registry = SubscriberRegistry::new();
        let first = registry.subscribe().unwrap();
        let second = registry.subscribe().unwrap();

        registry.unsubscribe(first.subscriber());
        registry.unsubscribe(first.subscriber());

        // The other subscriber is untouched
        assert_eq!(registry.subscriber_count(), 1);
        assert!(registry.contains(second.id()));
        assert!(!second.subscriber().is_closed());
    }

    #[test]
    fn test_drop_deregisters() {
        let registry = SubscriberRegistry::new();

        let sub = registry.subscribe().unwrap();
        let id = sub.id();
        drop(sub);

        assert!(!registry.contains(id));
        assert_eq!(registry.subscriber_count(), 0);
    }

    #[test]
    fn test_publish_reaches_all_members() {
        let registry = SubscriberRegistry::new();
        let a = registry.subscribe().unwrap();
        let b = registry.subscribe().unwrap();

        assert_eq!(registry.publish(event(1)), 2);

        assert_eq!(a.subscriber().pop(), Some(event(1)));
        assert_eq!(b.subscriber().pop(), Some(event(1)));
    }

    #[test]
    fn test_publish_skips_unsubscribed() {
        let registry = SubscriberRegistry::new();
        let s1 = registry.subscribe().unwrap();
        let s2 = registry.subscribe().unwrap();

        registry.unsubscribe(s2.subscriber());
        assert_eq!(registry.publish(event(1)), 1);

        assert_eq!(s1.subscriber().pop(), Some(event(1)));
        assert_eq!(s2.subscriber().pop(), None);
    }

    #[test]
    fn test_late_subscriber_misses_earlier_event() {
        let registry = SubscriberRegistry::new();
        registry.publish(event(1));

        let late = registry.subscribe().unwrap();
        registry.publish(event(2));

        assert_eq!(late.subscriber().pop(), Some(event(2)));
        assert_eq!(late.subscriber().pop(), None);
    }

    #[test]
    fn test_subscriber_limit() {
        let registry = SubscriberRegistry::with_config(RegistryConfig::default().max_subscribers(1));

        let first = registry.subscribe().unwrap();
        assert_eq!(
            registry.subscribe().unwrap_err(),
            RegistryError::SubscriberLimitReached(1)
        );

        // Slot frees up once the first subscriber goes away
        drop(first);
        assert!(registry.subscribe().is_ok());
    }

    #[test]
    fn test_overflow_disconnect_deregisters() {
        let config = RegistryConfig::default()
            .queue_capacity(1)
            .overflow_policy(OverflowPolicy::Disconnect);
        let registry = SubscriberRegistry::with_config(config);
        let sub = registry.subscribe().unwrap();

        assert_eq!(registry.publish(event(1)), 1);
        assert_eq!(registry.publish(event(2)), 0);

        assert!(sub.subscriber().is_closed());
        assert_eq!(registry.subscriber_count(), 0);
        assert_eq!(registry.counters().overflow_disconnects(), 1);
    }

    #[test]
    fn test_overflow_drop_oldest_counts() {
        let registry =
            SubscriberRegistry::with_config(RegistryConfig::default().queue_capacity(2));
        let sub = registry.subscribe().unwrap();

        for n in 1..=5 {
            registry.publish(event(n));
        }

        assert_eq!(sub.subscriber().pending(), 2);
        assert_eq!(sub.subscriber().pop(), Some(event(4)));
        assert_eq!(registry.counters().events_dropped(), 3);
    }

    #[test]
    fn test_shutdown_closes_and_rejects() {
        let registry = SubscriberRegistry::new();
        let sub = registry.subscribe().unwrap();

        registry.shutdown();

        assert!(sub.subscriber().is_closed());
        assert_eq!(registry.subscriber_count(), 0);
        assert_eq!(registry.subscribe().unwrap_err(), RegistryError::ShuttingDown);
        assert!(registry.is_shut_down());
    }
}
