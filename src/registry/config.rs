//! Registry configuration

use std::time::Duration;

/// Default per-subscriber queue capacity (events)
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Default heartbeat interval for idle subscribers
pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(15);

/// Shortest heartbeat interval accepted; shorter values are raised to this
pub const MIN_HEARTBEAT_INTERVAL: Duration = Duration::from_millis(100);

/// Default maximum number of concurrent subscribers
pub const DEFAULT_MAX_SUBSCRIBERS: usize = 10_000;

/// What to do when a subscriber's queue is full
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Evict the oldest queued event to make room for the new one
    #[default]
    DropOldest,
    /// Close the subscriber; its stream ends and it is deregistered
    Disconnect,
}

impl std::str::FromStr for OverflowPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "drop-oldest" | "drop_oldest" => Ok(OverflowPolicy::DropOldest),
            "disconnect" => Ok(OverflowPolicy::Disconnect),
            other => Err(format!("unknown overflow policy: {}", other)),
        }
    }
}

/// Subscriber registry configuration
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Maximum events buffered per subscriber (at least 1)
    pub queue_capacity: usize,

    /// Policy applied when a subscriber's queue is full
    pub overflow_policy: OverflowPolicy,

    /// Idle time between keepalive frames (at least `MIN_HEARTBEAT_INTERVAL`)
    pub heartbeat_interval: Duration,

    /// Maximum concurrent subscribers (0 = unlimited)
    pub max_subscribers: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            overflow_policy: OverflowPolicy::DropOldest,
            heartbeat_interval: DEFAULT_HEARTBEAT_INTERVAL,
            max_subscribers: DEFAULT_MAX_SUBSCRIBERS,
        }
    }
}

impl RegistryConfig {
    /// Set the per-subscriber queue capacity
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }

    /// Set the overflow policy
    pub fn overflow_policy(mut self, policy: OverflowPolicy) -> Self {
        self.overflow_policy = policy;
        self
    }

    /// Set the heartbeat interval
    pub fn heartbeat_interval(mut self, interval: Duration) -> Self {
        self.heartbeat_interval = interval.max(MIN_HEARTBEAT_INTERVAL);
        self
    }

    /// Set the maximum number of subscribers
    pub fn max_subscribers(mut self, max: usize) -> Self {
        self.max_subscribers = max;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RegistryConfig::default();

        assert_eq!(config.queue_capacity, DEFAULT_QUEUE_CAPACITY);
        assert_eq!(config.overflow_policy, OverflowPolicy::DropOldest);
        assert_eq!(config.heartbeat_interval, Duration::from_secs(15));
        assert_eq!(config.max_subscribers, DEFAULT_MAX_SUBSCRIBERS);
    }

    #[test]
    fn test_builder_queue_capacity_minimum() {
        let config = RegistryConfig::default().queue_capacity(0);

        assert_eq!(config.queue_capacity, 1);
    }

    #[test]
    fn test_builder_heartbeat_minimum() {
        let config = RegistryConfig::default().heartbeat_interval(Duration::ZERO);
        assert_eq!(config.heartbeat_interval, MIN_HEARTBEAT_INTERVAL);

        let config = RegistryConfig::default().heartbeat_interval(Duration::from_millis(1));
        assert_eq!(config.heartbeat_interval, MIN_HEARTBEAT_INTERVAL);
    }

    #[test]
    fn test_builder_chaining() {
        let config = RegistryConfig::default()
            .queue_capacity(8)
            .overflow_policy(OverflowPolicy::Disconnect)
            .heartbeat_interval(Duration::from_secs(1))
            .max_subscribers(0);

        assert_eq!(config.queue_capacity, 8);
        assert_eq!(config.overflow_policy, OverflowPolicy::Disconnect);
        assert_eq!(config.heartbeat_interval, Duration::from_secs(1));
        assert_eq!(config.max_subscribers, 0);
    }

    #[test]
    fn test_overflow_policy_from_str() {
        assert_eq!(
            "drop-oldest".parse::<OverflowPolicy>(),
            Ok(OverflowPolicy::DropOldest)
        );
        assert_eq!(
            "Disconnect".parse::<OverflowPolicy>(),
            Ok(OverflowPolicy::Disconnect)
        );
        assert!("drop-newest".parse::<OverflowPolicy>().is_err());
    }
}
