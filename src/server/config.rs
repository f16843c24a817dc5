//! Server configuration

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::registry::{OverflowPolicy, RegistryConfig};

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 5002;

/// Server configuration options
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to
    pub bind_addr: SocketAddr,

    /// Allowed CORS origins (empty = any origin)
    pub cors_origins: Vec<String>,

    /// Version string reported by `/version`
    pub version: String,

    /// Hub registry configuration
    pub registry: RegistryConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            cors_origins: Vec::new(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            registry: RegistryConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Create a new config with custom bind address
    pub fn with_addr(addr: SocketAddr) -> Self {
        Self {
            bind_addr: addr,
            ..Default::default()
        }
    }

    /// Build a config from environment variables
    ///
    /// Unset variables keep their defaults:
    /// `HOST`, `PORT`, `CORS_ORIGINS` (`*` or comma-separated), `APP_VERSION`,
    /// `HEARTBEAT_SECS`, `SUBSCRIBER_QUEUE_CAPACITY`, `SUBSCRIBER_OVERFLOW`
    /// (`drop-oldest` or `disconnect`), `MAX_SUBSCRIBERS`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup("HOST") {
            let ip: IpAddr = parse_var("HOST", &host)?;
            config.bind_addr.set_ip(ip);
        }
        if let Some(port) = lookup("PORT") {
            config.bind_addr.set_port(parse_var("PORT", &port)?);
        }
        if let Some(origins) = lookup("CORS_ORIGINS") {
            config = config.cors_origins(&origins);
        }
        if let Some(version) = lookup("APP_VERSION") {
            config.version = version;
        }

        if let Some(secs) = lookup("HEARTBEAT_SECS") {
            let secs: u64 = parse_var("HEARTBEAT_SECS", &secs)?;
            if secs == 0 {
                return Err(Error::Config("HEARTBEAT_SECS must be positive".into()));
            }
            config.registry = config
                .registry
                .heartbeat_interval(Duration::from_secs(secs));
        }
        if let Some(capacity) = lookup("SUBSCRIBER_QUEUE_CAPACITY") {
            config.registry = config
                .registry
                .queue_capacity(parse_var("SUBSCRIBER_QUEUE_CAPACITY", &capacity)?);
        }
        if let Some(policy) = lookup("SUBSCRIBER_OVERFLOW") {
            let policy: OverflowPolicy = parse_var("SUBSCRIBER_OVERFLOW", &policy)?;
            config.registry = config.registry.overflow_policy(policy);
        }
        if let Some(max) = lookup("MAX_SUBSCRIBERS") {
            config.registry = config
                .registry
                .max_subscribers(parse_var("MAX_SUBSCRIBERS", &max)?);
        }

        Ok(config)
    }

    /// Set the bind address
    pub fn bind(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Set allowed CORS origins from a `*` or comma-separated list
    pub fn cors_origins(mut self, origins: &str) -> Self {
        let origins: Vec<&str> = origins
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .collect();

        self.cors_origins = if origins.contains(&"*") {
            Vec::new()
        } else {
            origins.into_iter().map(String::from).collect()
        };
        self
    }

    /// Set the reported version
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Set the registry configuration
    pub fn registry(mut self, registry: RegistryConfig) -> Self {
        self.registry = registry;
        self
    }
}

fn parse_var<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| Error::Config(format!("invalid {} {:?}: {}", key, value, e)))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();

        assert_eq!(config.bind_addr.port(), DEFAULT_PORT);
        assert!(config.cors_origins.is_empty());
        assert_eq!(config.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_with_addr() {
        let addr: SocketAddr = "127.0.0.1:8080".parse().unwrap();
        let config = ServerConfig::with_addr(addr);

        assert_eq!(config.bind_addr, addr);
    }

    #[test]
    fn test_from_lookup_empty_keeps_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.bind_addr.port(), DEFAULT_PORT);
        assert_eq!(config.registry.heartbeat_interval, Duration::from_secs(15));
    }

    #[test]
    fn test_from_lookup_all_vars() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "9000"),
            ("CORS_ORIGINS", "http://a.example, http://b.example"),
            ("APP_VERSION", "2.1.0"),
            ("HEARTBEAT_SECS", "5"),
            ("SUBSCRIBER_QUEUE_CAPACITY", "32"),
            ("SUBSCRIBER_OVERFLOW", "disconnect"),
            ("MAX_SUBSCRIBERS", "100"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:9000".parse().unwrap());
        assert_eq!(
            config.cors_origins,
            vec!["http://a.example".to_string(), "http://b.example".to_string()]
        );
        assert_eq!(config.version, "2.1.0");
        assert_eq!(config.registry.heartbeat_interval, Duration::from_secs(5));
        assert_eq!(config.registry.queue_capacity, 32);
        assert_eq!(config.registry.overflow_policy, OverflowPolicy::Disconnect);
        assert_eq!(config.registry.max_subscribers, 100);
    }

    #[test]
    fn test_from_lookup_invalid_port() {
        let result = ServerConfig::from_lookup(lookup(&[("PORT", "not-a-port")]));

        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_from_lookup_zero_heartbeat() {
        let result = ServerConfig::from_lookup(lookup(&[("HEARTBEAT_SECS", "0")]));

        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_cors_wildcard_means_any() {
        let config = ServerConfig::default().cors_origins("*");
        assert!(config.cors_origins.is_empty());

        let config = ServerConfig::default().cors_origins("http://a.example,*");
        assert!(config.cors_origins.is_empty());
    }
}
