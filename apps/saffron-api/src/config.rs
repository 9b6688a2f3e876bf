//! # API Configuration
//!
//! ## Loading Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Defaults (ApiConfig::default)                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  2. TOML file: --config <path>, else <config dir>/saffron.toml         │
//! │       │        (missing file is fine, broken file is an error)         │
//! │       ▼                                                                 │
//! │  3. SAFFRON_* environment variables                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  4. validate()                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example File
//! ```toml
//! [server]
//! bind_addr = "0.0.0.0"
//! port = 8080
//!
//! [database]
//! path = "/var/lib/saffron/saffron.db"
//! max_connections = 8
//!
//! [auth]
//! jwt_secret = "replace-me"
//!
//! [kitchen]
//! channel_capacity = 256
//!
//! [logging]
//! level = "info"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use saffron_db::DbConfig;
use saffron_kitchen::DEFAULT_CHANNEL_CAPACITY;

/// Secret used when nothing else is configured. Fine for a laptop, never for a till.
const DEV_JWT_SECRET: &str = "saffron-dev-secret-change-in-production";

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSection {
    /// SQLite file, or `:memory:`.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSection {
    /// HS256 secret shared with the staff auth service.
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KitchenSection {
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSection {
    /// Default filter; `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./saffron.db")
}

fn default_max_connections() -> u32 {
    5
}

fn default_jwt_secret() -> String {
    DEV_JWT_SECRET.to_string()
}

fn default_channel_capacity() -> usize {
    DEFAULT_CHANNEL_CAPACITY
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerSection {
    fn default() -> Self {
        ServerSection {
            bind_addr: default_bind_addr(),
            port: default_port(),
        }
    }
}

impl Default for DatabaseSection {
    fn default() -> Self {
        DatabaseSection {
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

impl Default for AuthSection {
    fn default() -> Self {
        AuthSection {
            jwt_secret: default_jwt_secret(),
        }
    }
}

impl Default for KitchenSection {
    fn default() -> Self {
        KitchenSection {
            channel_capacity: default_channel_capacity(),
        }
    }
}

impl Default for LoggingSection {
    fn default() -> Self {
        LoggingSection {
            level: default_log_level(),
        }
    }
}

// =============================================================================
// ApiConfig
// =============================================================================

/// Complete server configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub database: DatabaseSection,
    #[serde(default)]
    pub auth: AuthSection,
    #[serde(default)]
    pub kitchen: KitchenSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

impl ApiConfig {
    /// Loads defaults, then the TOML file, then `SAFFRON_*` overrides, then validates.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;

        Ok(config)
    }

    /// Parses a TOML file. Missing sections and keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&contents)?)
    }

    /// Applies `SAFFRON_*` overrides read through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup("SAFFRON_BIND_ADDR") {
            self.server.bind_addr = addr;
        }

        if let Some(port) = lookup("SAFFRON_PORT") {
            self.server.port = parse_var("SAFFRON_PORT", &port)?;
        }

        if let Some(path) = lookup("SAFFRON_DATABASE_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = PathBuf::from(path);
        }

        if let Some(max) = lookup("SAFFRON_DB_MAX_CONNECTIONS") {
            self.database.max_connections = parse_var("SAFFRON_DB_MAX_CONNECTIONS", &max)?;
        }

        if let Some(secret) = lookup("SAFFRON_JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }

        if let Some(capacity) = lookup("SAFFRON_KITCHEN_CAPACITY") {
            self.kitchen.channel_capacity = parse_var("SAFFRON_KITCHEN_CAPACITY", &capacity)?;
        }

        if let Some(level) = lookup("SAFFRON_LOG_LEVEL") {
            self.logging.level = level;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Invalid("auth.jwt_secret must not be empty".into()));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be greater than 0".into(),
            ));
        }

        if self.kitchen.channel_capacity == 0 {
            return Err(ConfigError::Invalid(
                "kitchen.channel_capacity must be greater than 0".into(),
            ));
        }

        if self.server.bind_addr.trim().is_empty() {
            return Err(ConfigError::Invalid("server.bind_addr must not be empty".into()));
        }

        Ok(())
    }

    /// `host:port` for the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.bind_addr, self.server.port)
    }

    /// True when the secret was never changed from the built-in default.
    pub fn uses_dev_secret(&self) -> bool {
        self.auth.jwt_secret == DEV_JWT_SECRET
    }

    /// Database settings for saffron-db.
    pub fn db_config(&self) -> DbConfig {
        if self.database.path.as_os_str() == ":memory:" {
            DbConfig::in_memory()
        } else {
            DbConfig::new(self.database.path.clone()).max_connections(self.database.max_connections)
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "saffron", "pos").map(|dirs| dirs.config_dir().join("saffron.toml"))
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue(key.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_are_valid() {
        let config = ApiConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert!(config.uses_dev_secret());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: ApiConfig = toml::from_str(
            r#"
            [server]
            port = 9090

            [auth]
            jwt_secret = "kitchen-secret"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.bind_addr, "0.0.0.0");
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.kitchen.channel_capacity, DEFAULT_CHANNEL_CAPACITY);
        assert!(!config.uses_dev_secret());
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("SAFFRON_PORT", "3000"),
            ("SAFFRON_DATABASE_PATH", ":memory:"),
            ("SAFFRON_JWT_SECRET", "from-env"),
            ("SAFFRON_LOG_LEVEL", "debug"),
        ]);

        let mut config = ApiConfig::default();
        config
            .apply_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.auth.jwt_secret, "from-env");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.db_config().max_connections, 1);
    }

    #[test]
    fn test_bad_env_value() {
        let mut config = ApiConfig::default();
        let err = config
            .apply_overrides(|key| (key == "SAFFRON_PORT").then(|| "eighty".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref key) if key == "SAFFRON_PORT"));
    }

    #[test]
    fn test_validation_failures() {
        let mut config = ApiConfig::default();
        config.auth.jwt_secret = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = ApiConfig::default();
        config.kitchen.channel_capacity = 0;
        assert!(config.validate().is_err());

        let mut config = ApiConfig::default();
        config.database.max_connections = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saffron.toml");
        std::fs::write(&path, "[kitchen]\nchannel_capacity = 32\n").unwrap();

        let config = ApiConfig::from_file(&path).unwrap();
        assert_eq!(config.kitchen.channel_capacity, 32);

        std::fs::write(&path, "[kitchen\n").unwrap();
        assert!(matches!(ApiConfig::from_file(&path), Err(ConfigError::Parse(_))));
    }
}
