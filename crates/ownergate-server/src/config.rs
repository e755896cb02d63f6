//! Configuration management for the ownergate server.
//!
//! This module provides configuration loading with multiple sources:
//! 1. Default values (hardcoded)
//! 2. Configuration file (YAML)
//! 3. Environment variables (override)
//!
//! # Configuration Hierarchy
//!
//! Environment variables take precedence over config file values,
//! which take precedence over defaults.
//!
//! # Example
//!
//! ```ignore
//! use ownergate_server::config::ServerConfig;
//!
//! // Load from file with env overrides
//! let config = ServerConfig::load("ownergate.yaml")?;
//!
//! // Or load from environment only
//! let config = ServerConfig::from_env()?;
//! ```

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Prefix of environment variable overrides, e.g. `OWNERGATE_SERVER__PORT`.
pub const ENV_PREFIX: &str = "OWNERGATE";

/// Server configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct ServerConfig {
    /// Server settings
    #[serde(default)]
    pub server: ServerSettings,

    /// Identity and login settings
    #[serde(default)]
    pub auth: AuthSettings,

    /// Page content settings
    #[serde(default)]
    pub content: ContentSettings,

    /// Storage settings
    #[serde(default)]
    pub storage: StorageSettings,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSettings,

    /// Metrics settings
    #[serde(default)]
    pub metrics: MetricsSettings,
}

/// Server network settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ServerSettings {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Largest accepted request body, in bytes
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_body_limit() -> usize {
    64 * 1024
}

/// How requesters are identified and where anonymous ones are sent.
///
/// The identity itself is resolved upstream (a gateway or session layer)
/// and passed along in `identity_header`.
///
/// # Example YAML Configuration
///
/// ```yaml
/// auth:
///   identity_header: x-authenticated-user
///   login_path: /auth/login/
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct AuthSettings {
    /// Request header carrying the authenticated username.
    ///
    /// Environment variable: `OWNERGATE_AUTH__IDENTITY_HEADER`
    #[serde(default = "default_identity_header")]
    pub identity_header: String,

    /// Path of the login page used in login redirects.
    ///
    /// Environment variable: `OWNERGATE_AUTH__LOGIN_PATH`
    #[serde(default = "default_login_path")]
    pub login_path: String,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            identity_header: default_identity_header(),
            login_path: default_login_path(),
        }
    }
}

fn default_identity_header() -> String {
    "x-authenticated-user".to_string()
}

fn default_login_path() -> String {
    "/auth/login/".to_string()
}

/// Page content settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ContentSettings {
    /// Number of news items on the news home page
    #[serde(default = "default_news_per_page")]
    pub news_per_page: usize,
}

impl Default for ContentSettings {
    fn default() -> Self {
        Self {
            news_per_page: default_news_per_page(),
        }
    }
}

fn default_news_per_page() -> usize {
    10
}

/// Storage backend settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct StorageSettings {
    /// Storage backend type. Only "memory" is available.
    #[serde(default = "default_storage_backend")]
    pub backend: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: default_storage_backend(),
        }
    }
}

fn default_storage_backend() -> String {
    "memory".to_string()
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LoggingSettings {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Use JSON format (true for production, false for development)
    #[serde(default)]
    pub json: bool,

    /// Also log each closed span with its busy and idle time
    #[serde(default)]
    pub span_events: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
            span_events: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Metrics settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct MetricsSettings {
    /// Enable the Prometheus endpoint
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for MetricsSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

fn default_true() -> bool {
    true
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] ConfigError),

    #[error("configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("invalid configuration: {message}")]
    Invalid { message: String },
}

impl ServerConfig {
    /// Load configuration from a YAML file with environment variable overrides.
    ///
    /// Environment variables are prefixed with `OWNERGATE_` and use `__` as
    /// separator. For example:
    /// - `OWNERGATE_SERVER__PORT=9090` overrides `server.port`
    /// - `OWNERGATE_CONTENT__NEWS_PER_PAGE=5` overrides `content.news_per_page`
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigLoadError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let config = Config::builder()
            .add_source(Config::try_from(&ServerConfig::default())?)
            .add_source(File::from(path).format(FileFormat::Yaml))
            .add_source(env_source())
            .build()?;

        let server_config: ServerConfig = config.try_deserialize()?;
        server_config.validate()?;

        Ok(server_config)
    }

    /// Load configuration from environment variables only.
    ///
    /// Uses default values and allows overrides via `OWNERGATE_` prefixed env vars.
    pub fn from_env() -> Result<Self, ConfigLoadError> {
        let config = Config::builder()
            .add_source(Config::try_from(&ServerConfig::default())?)
            .add_source(env_source())
            .build()?;

        let server_config: ServerConfig = config.try_deserialize()?;
        server_config.validate()?;

        Ok(server_config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.server.port == 0 {
            return Err(invalid("server.port must be greater than 0"));
        }

        if self.server.body_limit_bytes == 0 {
            return Err(invalid("server.body_limit_bytes must be greater than 0"));
        }

        let valid_backends = ["memory"];
        if !valid_backends.contains(&self.storage.backend.as_str()) {
            return Err(invalid(format!(
                "storage.backend must be one of: {:?}, got: {}",
                valid_backends, self.storage.backend
            )));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(invalid(format!(
                "logging.level must be one of: {:?}, got: {}",
                valid_levels, self.logging.level
            )));
        }

        let header = self.auth.identity_header.trim();
        if header.is_empty()
            || !header
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        {
            return Err(invalid(format!(
                "auth.identity_header must be a non-empty header name, got: {:?}",
                self.auth.identity_header
            )));
        }

        if !self.auth.login_path.starts_with('/') {
            return Err(invalid(format!(
                "auth.login_path must start with '/', got: {}",
                self.auth.login_path
            )));
        }

        if self.content.news_per_page == 0 {
            return Err(invalid("content.news_per_page must be greater than 0"));
        }

        Ok(())
    }
}

fn env_source() -> Environment {
    // OWNERGATE_SERVER__PORT -> server.port
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}

fn invalid(message: impl Into<String>) -> ConfigLoadError {
    ConfigLoadError::Invalid {
        message: message.into(),
    }
}
