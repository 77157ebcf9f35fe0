//! Process configuration
//!
//! One JSON file configures both surfaces. Every field has a default so an
//! empty `{}` is a valid development config; `validate()` rejects values
//! that cannot produce a working process.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cli::errors::{CliError, CliResult};

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// SQLite database URL shared by the gate and the control plane
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Gate endpoint settings
    #[serde(default)]
    pub gate: GateConfig,

    /// Session token settings
    #[serde(default)]
    pub auth: AuthConfig,

    /// Rows per page in the control-plane bundle list
    #[serde(default = "default_apps_per_page")]
    pub apps_per_page: u32,
}

/// Gate endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 9000)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request header carrying the bundle identifier
    #[serde(default = "default_app_id_header")]
    pub app_id_header: String,

    /// Response body when execution is allowed
    #[serde(default = "default_allowed_response")]
    pub allowed_response: String,

    /// Response body when execution is denied
    #[serde(default = "default_blocked_response")]
    pub blocked_response: String,
}

/// Session token configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for signing session tokens (256-bit minimum recommended)
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,

    /// Session token lifetime in seconds
    #[serde(default = "default_token_ttl")]
    pub token_ttl_seconds: i64,
}

fn default_database_url() -> String {
    "sqlite://rungate.db".to_string()
}
fn default_apps_per_page() -> u32 {
    10
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    9000
}
fn default_app_id_header() -> String {
    "APP_ID".to_string()
}
fn default_allowed_response() -> String {
    "OK".to_string()
}
fn default_blocked_response() -> String {
    "BLOCKED".to_string()
}
fn default_jwt_secret() -> String {
    "CHANGE_THIS_SECRET_IN_PRODUCTION".to_string()
}
fn default_token_ttl() -> i64 {
    3600
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            gate: GateConfig::default(),
            auth: AuthConfig::default(),
            apps_per_page: default_apps_per_page(),
        }
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            app_id_header: default_app_id_header(),
            allowed_response: default_allowed_response(),
            blocked_response: default_blocked_response(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            token_ttl_seconds: default_token_ttl(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file; missing file yields defaults
    pub fn load(path: &Path) -> CliResult<Self> {
        let config = if path.exists() {
            let content = fs::read_to_string(path)
                .map_err(|e| CliError::Config(format!("failed to read config: {}", e)))?;
            serde_json::from_str(&content)
                .map_err(|e| CliError::Config(format!("invalid config JSON: {}", e)))?
        } else {
            Config::default()
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    fn validate(&self) -> CliResult<()> {
        if self.database_url.is_empty() {
            return Err(CliError::Config("database_url must not be empty".into()));
        }
        if self.auth.jwt_secret.is_empty() {
            return Err(CliError::Config("auth.jwt_secret must not be empty".into()));
        }
        if self.auth.token_ttl_seconds <= 0 {
            return Err(CliError::Config(
                "auth.token_ttl_seconds must be > 0".into(),
            ));
        }
        if self.apps_per_page == 0 {
            return Err(CliError::Config("apps_per_page must be > 0".into()));
        }
        if self.gate.app_id_header.is_empty() {
            return Err(CliError::Config(
                "gate.app_id_header must not be empty".into(),
            ));
        }
        Ok(())
    }
}

impl GateConfig {
    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
