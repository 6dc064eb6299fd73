//! Configuration module for Agora.

use serde::Deserialize;
use std::path::Path;

use crate::auth::{DEFAULT_IDLE_TIMEOUT_SECS, DEFAULT_UNCONFIRMED_TIMEOUT_SECS};
use crate::{AgoraError, Result};

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
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
    "data/agora.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/agora.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Web API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    /// CORS allowed origins.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// JWT secret key (required).
    #[serde(default)]
    pub jwt_secret: String,
    /// Access token expiry in seconds.
    #[serde(default = "default_jwt_access_expiry")]
    pub jwt_access_token_expiry_secs: u64,
    /// Refresh token expiry in days.
    #[serde(default = "default_jwt_refresh_expiry")]
    pub jwt_refresh_token_expiry_days: u64,
    /// Name of the visitor session cookie.
    #[serde(default = "default_session_cookie")]
    pub session_cookie: String,
    /// Visitor sessions idle longer than this are discarded.
    #[serde(default = "default_session_idle_timeout")]
    pub session_idle_timeout_secs: u64,
    /// Sessions whose cookie never comes back are discarded after this.
    #[serde(default = "default_session_unconfirmed_timeout")]
    pub session_unconfirmed_timeout_secs: u64,
}

fn default_jwt_access_expiry() -> u64 {
    900 // 15 minutes
}

fn default_jwt_refresh_expiry() -> u64 {
    7
}

fn default_session_cookie() -> String {
    "agora_session".to_string()
}

fn default_session_idle_timeout() -> u64 {
    DEFAULT_IDLE_TIMEOUT_SECS
}

fn default_session_unconfirmed_timeout() -> u64 {
    DEFAULT_UNCONFIRMED_TIMEOUT_SECS
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            cors_origins: vec![],
            jwt_secret: String::new(),
            jwt_access_token_expiry_secs: default_jwt_access_expiry(),
            jwt_refresh_token_expiry_days: default_jwt_refresh_expiry(),
            session_cookie: default_session_cookie(),
            session_idle_timeout_secs: default_session_idle_timeout(),
            session_unconfirmed_timeout_secs: default_session_unconfirmed_timeout(),
        }
    }
}

/// Forum listing configuration.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ForumConfig {
    /// Topics shown per page of a board listing.
    #[serde(default = "default_topics_per_page")]
    pub topics_per_page: u32,
    /// Posts shown per page of a topic.
    #[serde(default = "default_posts_per_page")]
    pub posts_per_page: u32,
}

fn default_topics_per_page() -> u32 {
    20
}

fn default_posts_per_page() -> u32 {
    20
}

impl Default for ForumConfig {
    fn default() -> Self {
        Self {
            topics_per_page: default_topics_per_page(),
            posts_per_page: default_posts_per_page(),
        }
    }
}

/// A board created at startup when no board with the same name exists.
#[derive(Debug, Clone, Deserialize)]
pub struct BoardSeed {
    /// Board name.
    pub name: String,
    /// Board description.
    #[serde(default)]
    pub description: String,
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
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Web API configuration.
    #[serde(default)]
    pub web: WebConfig,
    /// Forum listing configuration.
    #[serde(default)]
    pub forum: ForumConfig,
    /// Boards to seed.
    #[serde(default)]
    pub boards: Vec<BoardSeed>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(AgoraError::Io)?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| AgoraError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `AGORA_JWT_SECRET`: Override the JWT secret key
    pub fn apply_env_overrides(&mut self) {
        if let Ok(jwt_secret) = std::env::var("AGORA_JWT_SECRET") {
            if !jwt_secret.is_empty() {
                self.web.jwt_secret = jwt_secret;
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.web.jwt_secret.is_empty() {
            return Err(AgoraError::Config(
                "jwt_secret is not set. \
                 Set it in config.toml or via AGORA_JWT_SECRET environment variable."
                    .to_string(),
            ));
        }
        if self.forum.topics_per_page == 0 || self.forum.posts_per_page == 0 {
            return Err(AgoraError::Config(
                "topics_per_page and posts_per_page must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
