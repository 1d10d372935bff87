use serde::{Deserialize, Serialize};

/// Main configuration structure for the rolodex service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Cache configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// HTTP server configuration
    #[serde(default)]
    pub http: HttpConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DatabaseConfig {
    /// Path to `SQLite` database file
    #[serde(default = "default_database_path")]
    pub path: String,

    /// Maximum number of database connections in pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Minimum number of idle connections kept in pool
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    /// Pool acquire timeout in seconds
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

fn default_database_path() -> String {
    ".rolodex/rolodex.db".to_string()
}

const fn default_max_connections() -> u32 {
    10
}

const fn default_min_connections() -> u32 {
    1
}

const fn default_acquire_timeout_secs() -> u64 {
    3
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            acquire_timeout_secs: default_acquire_timeout_secs(),
        }
    }
}

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CacheConfig {
    /// Maximum number of cached entries
    #[serde(default = "default_max_entries")]
    pub max_entries: u64,

    /// TTL for cached list pages in seconds
    #[serde(default = "default_list_ttl_secs")]
    pub list_ttl_secs: u64,

    /// TTL for cached single-customer lookups in seconds
    #[serde(default = "default_entity_ttl_secs")]
    pub entity_ttl_secs: u64,

    /// TTL for cached tenant stats in seconds
    #[serde(default = "default_stats_ttl_secs")]
    pub stats_ttl_secs: u64,
}

const fn default_max_entries() -> u64 {
    10_000
}

const fn default_list_ttl_secs() -> u64 {
    60
}

const fn default_entity_ttl_secs() -> u64 {
    300
}

const fn default_stats_ttl_secs() -> u64 {
    120
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
            list_ttl_secs: default_list_ttl_secs(),
            entity_ttl_secs: default_entity_ttl_secs(),
            stats_ttl_secs: default_stats_ttl_secs(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct HttpConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Whether to enable permissive CORS
    #[serde(default = "default_enable_cors")]
    pub enable_cors: bool,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    8080
}

const fn default_enable_cors() -> bool {
    true
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            enable_cors: default_enable_cors(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.cache.list_ttl_secs, 60);
        assert_eq!(config.cache.entity_ttl_secs, 300);
        assert_eq!(config.cache.stats_ttl_secs, 120);
        assert_eq!(config.http.port, 8080);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_config_deserializes_partial() {
        let config: Config = serde_json::from_str(r#"{"http": {"port": 9000}}"#).unwrap();
        assert_eq!(config.http.port, 9000);
        assert_eq!(config.http.host, "127.0.0.1");
        assert_eq!(config.database.path, ".rolodex/rolodex.db");
    }
}
