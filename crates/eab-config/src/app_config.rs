//! Application configuration structures.

use crate::CacheConfig;
use eab_core::telemetry::TelemetryConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application name and metadata.
    #[serde(default)]
    pub app: AppMetadata,

    /// Capability cache configuration.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Tracing configuration.
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Application metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppMetadata {
    /// Application name.
    pub name: String,
    /// Application version.
    pub version: String,
    /// Environment (development, staging, production).
    pub environment: String,
    /// Subscription the cache instance serves.
    #[serde(default = "default_sub_id")]
    pub sub_id: i32,
}

fn default_sub_id() -> i32 {
    1
}

impl Default for AppMetadata {
    fn default() -> Self {
        Self {
            name: "eab".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: "development".to_string(),
            sub_id: default_sub_id(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database URL.
    pub url: String,
    /// Minimum connection pool size.
    pub min_connections: u32,
    /// Maximum connection pool size.
    pub max_connections: u32,
    /// Connection timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Idle timeout in seconds.
    pub idle_timeout_secs: u64,
    /// Run embedded migrations at startup.
    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,
}

fn default_run_migrations() -> bool {
    true
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://eab.db?mode=rwc".to_string(),
            min_connections: 1,
            max_connections: 5,
            connect_timeout_secs: 30,
            idle_timeout_secs: 600,
            run_migrations: default_run_migrations(),
        }
    }
}

impl DatabaseConfig {
    /// In-memory database, used by tests and ephemeral deployments.
    ///
    /// A single connection keeps every query on the same in-memory database.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            min_connections: 1,
            max_connections: 1,
            ..Self::default()
        }
    }

    /// Returns the connect timeout as a Duration.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Returns the idle timeout as a Duration.
    #[must_use]
    pub const fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_RCS_CAPABILITIES_CACHE_EXPIRATION_SECS;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.app.name, "eab");
        assert_eq!(config.app.sub_id, 1);
        assert!(config.database.url.starts_with("sqlite:"));
        assert_eq!(
            config.cache.expiration.rcs_capabilities_cache_expiration_secs,
            DEFAULT_RCS_CAPABILITIES_CACHE_EXPIRATION_SECS
        );
        assert!(config.cache.subscriptions.is_empty());
    }

    #[test]
    fn test_in_memory_database() {
        let config = DatabaseConfig::in_memory();
        assert_eq!(config.url, "sqlite::memory:");
        assert_eq!(config.max_connections, 1);
        assert_eq!(config.connect_timeout(), Duration::from_secs(30));
        assert_eq!(config.idle_timeout(), Duration::from_secs(600));
    }

    #[test]
    fn test_parse_from_toml() {
        let config: AppConfig = toml::from_str(
            r#"
            [app]
            name = "eab-test"
            version = "0.0.1"
            environment = "test"
            sub_id = 3

            [cache.expiration]
            rcs_capabilities_cache_expiration_secs = 60

            [[cache.subscriptions]]
            sub_id = 3
            non_rcs_capabilities_cache_expiration_secs = 0
            "#,
        )
        .unwrap();

        assert_eq!(config.app.sub_id, 3);
        let effective = config
            .cache
            .expiration_for(eab_core::SubscriptionId::new(3));
        assert_eq!(effective.rcs_capabilities_cache_expiration_secs, 60);
        assert_eq!(effective.non_rcs_capabilities_cache_expiration_secs, 0);
        assert_eq!(config.database.max_connections, 5);
    }
}
