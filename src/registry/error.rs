//! Registry error types
//!
//! Error types for subscriber admission.

/// Error type for registry operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The configured subscriber limit has been reached
    SubscriberLimitReached(usize),
    /// The hub is shutting down and no longer accepts subscribers
    ShuttingDown,
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::SubscriberLimitReached(limit) => {
                write!(f, "Subscriber limit reached: {}", limit)
            }
            RegistryError::ShuttingDown => write!(f, "Registry is shutting down"),
        }
    }
}

impl std::error::Error for RegistryError {}
