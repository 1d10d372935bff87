use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::Config;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Database path cannot be empty")]
    EmptyDatabasePath,

    #[error("Invalid max_connections: {0}. Must be at least 1")]
    InvalidMaxConnections(u32),

    #[error("min_connections ({0}) cannot exceed max_connections ({1})")]
    InvalidMinConnections(u32, u32),

    #[error("Invalid cache max_entries: {0}. Must be at least 1")]
    InvalidCacheCapacity(u64),

    #[error("Invalid cache TTL for {0}: must be at least 1 second")]
    InvalidCacheTtl(&'static str),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .rolodex/config.yaml (project config)
    /// 3. .rolodex/local.yaml (local overrides, optional)
    /// 4. Environment variables (ROLODEX_* prefix, highest priority)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".rolodex/config.yaml"))
            .merge(Yaml::file(".rolodex/local.yaml"))
            .merge(Env::prefixed("ROLODEX_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.database.path.is_empty() {
            return Err(ConfigError::EmptyDatabasePath);
        }

        if config.database.max_connections == 0 {
            return Err(ConfigError::InvalidMaxConnections(
                config.database.max_connections,
            ));
        }

        if config.database.min_connections > config.database.max_connections {
            return Err(ConfigError::InvalidMinConnections(
                config.database.min_connections,
                config.database.max_connections,
            ));
        }

        if config.cache.max_entries == 0 {
            return Err(ConfigError::InvalidCacheCapacity(config.cache.max_entries));
        }

        for (name, ttl) in [
            ("list", config.cache.list_ttl_secs),
            ("entity", config.cache.entity_ttl_secs),
            ("stats", config.cache.stats_ttl_secs),
        ] {
            if ttl == 0 {
                return Err(ConfigError::InvalidCacheTtl(name));
            }
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Config;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ConfigLoader::validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_rejects_zero_connections() {
        let config = Config {
            database: crate::domain::models::DatabaseConfig {
                max_connections: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidMaxConnections(0))
        ));
    }

    #[test]
    fn test_rejects_zero_ttl() {
        let config = Config {
            cache: crate::domain::models::CacheConfig {
                list_ttl_secs: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidCacheTtl("list"))
        ));
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        let config = Config {
            logging: crate::domain::models::LoggingConfig {
                level: "verbose".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidLogLevel(_))
        ));
    }
}
