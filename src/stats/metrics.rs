//! Statistics and metrics for the position hub

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Running delivery counters, updated lock-free on the publish path
#[derive(Debug, Default)]
pub struct HubCounters {
    events_published: AtomicU64,
    deliveries: AtomicU64,
    events_dropped: AtomicU64,
    overflow_disconnects: AtomicU64,
}

impl HubCounters {
    /// Record the outcome of one publish call
    pub fn record_publish(&self, delivered: u64, dropped: u64, disconnected: u64) {
        self.events_published.fetch_add(1, Ordering::Relaxed);
        self.deliveries.fetch_add(delivered, Ordering::Relaxed);
        // A disconnect also loses the event that overflowed
        self.events_dropped
            .fetch_add(dropped + disconnected, Ordering::Relaxed);
        self.overflow_disconnects
            .fetch_add(disconnected, Ordering::Relaxed);
    }

    /// Events handed to the broadcaster
    pub fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }

    /// Events queued across all subscribers
    pub fn deliveries(&self) -> u64 {
        self.deliveries.load(Ordering::Relaxed)
    }

    /// Events lost to full queues
    pub fn events_dropped(&self) -> u64 {
        self.events_dropped.load(Ordering::Relaxed)
    }

    /// Subscribers closed by the `Disconnect` overflow policy
    pub fn overflow_disconnects(&self) -> u64 {
        self.overflow_disconnects.load(Ordering::Relaxed)
    }
}

/// Point-in-time hub statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HubStats {
    /// Vehicles with a known position
    pub vehicles: usize,
    /// Currently registered subscribers
    pub subscribers: usize,
    /// Events handed to the broadcaster
    pub events_published: u64,
    /// Events queued across all subscribers
    pub deliveries: u64,
    /// Events lost to full queues
    pub events_dropped: u64,
    /// Subscribers closed because their queue overflowed
    pub overflow_disconnects: u64,
}

impl HubStats {
    /// Average number of subscribers reached per published event
    pub fn fan_out(&self) -> f64 {
        if self.events_published > 0 {
            self.deliveries as f64 / self.events_published as f64
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_new() {
        let counters = HubCounters::default();
        assert_eq!(counters.events_published(), 0);
        assert_eq!(counters.deliveries(), 0);
        assert_eq!(counters.events_dropped(), 0);
        assert_eq!(counters.overflow_disconnects(), 0);
    }

    #[test]
    fn test_record_publish() {
        let counters = HubCounters::default();

        counters.record_publish(3, 1, 0);
        counters.record_publish(2, 0, 1);

        assert_eq!(counters.events_published(), 2);
        assert_eq!(counters.deliveries(), 5);
        assert_eq!(counters.events_dropped(), 2);
        assert_eq!(counters.overflow_disconnects(), 1);
    }

    #[test]
    fn test_fan_out() {
        let stats = HubStats {
            events_published: 4,
            deliveries: 10,
            ..Default::default()
        };

        assert_eq!(stats.fan_out(), 2.5);
    }

    #[test]
    fn test_fan_out_no_events() {
        let stats = HubStats::default();

        // With zero events, fan-out should be 0
        assert_eq!(stats.fan_out(), 0.0);
    }
}
