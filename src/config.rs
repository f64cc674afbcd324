//! Configuration module for Aula.

use serde::Deserialize;
use std::path::Path;

use crate::{AulaError, Result};

/// Minimum length of the session secret in bytes.
///
/// The cookie sealing key is derived from this secret; anything shorter
/// is rejected at startup.
pub const MIN_SESSION_SECRET_LENGTH: usize = 32;

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origins.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Whether to serve the static front-end bundle.
    #[serde(default)]
    pub serve_static: bool,
    /// Path to the static front-end bundle.
    #[serde(default = "default_static_path")]
    pub static_path: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_static_path() -> String {
    "web/dist".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![],
            serve_static: false,
            static_path: default_static_path(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/aula.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Session cookie configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Secret used to derive the cookie sealing key (min 32 bytes).
    #[serde(default)]
    pub secret: String,
    /// Session lifetime in days.
    #[serde(default = "default_session_ttl_days")]
    pub ttl_days: u64,
    /// Whether cookies carry the Secure attribute (set in production).
    #[serde(default)]
    pub secure_cookies: bool,
}

fn default_session_ttl_days() -> u64 {
    7
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            ttl_days: default_session_ttl_days(),
            secure_cookies: false,
        }
    }
}

/// Upload storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    /// Public directory under which uploads are written and served.
    #[serde(default = "default_upload_dir")]
    pub public_dir: String,
    /// Maximum upload size in megabytes.
    #[serde(default = "default_max_upload_size")]
    pub max_size_mb: u64,
}

fn default_upload_dir() -> String {
    "public".to_string()
}

fn default_max_upload_size() -> u64 {
    10
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            public_dir: default_upload_dir(),
            max_size_mb: default_max_upload_size(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file (empty for console-only).
    #[serde(default)]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: String::new(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Session cookie configuration.
    #[serde(default)]
    pub session: SessionConfig,
    /// Upload storage configuration.
    #[serde(default)]
    pub uploads: UploadConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(AulaError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| AulaError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `AULA_SESSION_SECRET`: Override the session cookie secret
    /// - `AULA_ENV`: `production` turns on Secure cookies
    pub fn apply_env_overrides(&mut self) {
        if let Ok(secret) = std::env::var("AULA_SESSION_SECRET") {
            if !secret.is_empty() {
                self.session.secret = secret;
            }
        }
        if let Ok(env) = std::env::var("AULA_ENV") {
            if env.eq_ignore_ascii_case("production") {
                self.session.secure_cookies = true;
            }
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if the session secret is missing or too short to
    /// derive a sealing key from.
    pub fn validate(&self) -> Result<()> {
        if self.session.secret.len() < MIN_SESSION_SECRET_LENGTH {
            return Err(AulaError::Config(format!(
                "session secret must be at least {MIN_SESSION_SECRET_LENGTH} bytes. \
                 Set it in config.toml or via AULA_SESSION_SECRET environment variable."
            )));
        }
        Ok(())
    }
}
