//! Application configuration domain model

use serde::{Deserialize, Serialize};

/// Top-level application configuration.
///
/// Loaded from a TOML file by the server binary; every section has defaults
/// so a missing file or a partial file still yields a runnable configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub hub: HubConfig,
}

/// HTTP/WebSocket listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address the ingress listens on.
    pub listen_addr: String,

    /// Allowed CORS origin for the REST API. "*" allows any origin.
    pub allowed_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            allowed_origin: "*".to_string(),
        }
    }
}

/// Durable storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite database path or URL.
    pub database_url: String,

    /// Number of entries served by history queries and kept warm in the cache.
    pub history_limit: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_url: "shareboard.db".to_string(),
            history_limit: 20,
        }
    }
}

/// What to do when a subscriber's outbound buffer is full and a new
/// entry must be enqueued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Evict the oldest buffered entry to make room for the new one.
    DropOldest,
    /// Keep the buffer as-is and drop the new entry.
    DropNewest,
}

/// Broadcast hub tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    /// Capacity of each subscriber session's outbound buffer.
    pub buffer_capacity: usize,

    /// Buffer-full policy.
    pub overflow: OverflowPolicy,

    /// Drops tolerated within `drop_window_ms` before the session is evicted.
    pub max_drops: u32,

    /// Length of the drop-counting window, milliseconds.
    pub drop_window_ms: u64,

    /// Sessions with no heartbeat for this long are evicted, milliseconds.
    pub heartbeat_timeout_ms: u64,

    /// Interval of the background task that evicts timed-out sessions,
    /// milliseconds.
    pub reaper_interval_ms: u64,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: 64,
            overflow: OverflowPolicy::DropOldest,
            max_drops: 32,
            drop_window_ms: 10_000,
            heartbeat_timeout_ms: 60_000,
            reaper_interval_ms: 5_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_runnable() {
        let config = AppConfig::default();
        assert_eq!(config.storage.history_limit, 20);
        assert_eq!(config.hub.overflow, OverflowPolicy::DropOldest);
        assert!(config.hub.buffer_capacity > 0);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [server]
            listen_addr = "127.0.0.1:9000"

            [hub]
            overflow = "drop_newest"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.listen_addr, "127.0.0.1:9000");
        assert_eq!(config.server.allowed_origin, "*");
        assert_eq!(config.hub.overflow, OverflowPolicy::DropNewest);
        assert_eq!(config.storage.database_url, "shareboard.db");
    }
}
