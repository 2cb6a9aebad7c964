//! Configuration schema definitions

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub cookies: CookieConfig,
}

/// Server configuration for the HTTP API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    4000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Token signing configuration.
///
/// Access and refresh tokens use distinct secrets so one kind can
/// never be replayed as the other.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_access_secret")]
    pub access_secret: String,

    #[serde(default = "default_refresh_secret")]
    pub refresh_secret: String,

    /// Access token lifetime in seconds
    #[serde(default = "default_access_ttl")]
    pub access_ttl_secs: i64,

    /// Refresh token lifetime in seconds
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_secs: i64,
}

fn default_access_secret() -> String {
    "clipstream-access-secret-change-in-production".to_string()
}

fn default_refresh_secret() -> String {
    "clipstream-refresh-secret-change-in-production".to_string()
}

fn default_access_ttl() -> i64 {
    3600 // 1 hour
}

fn default_refresh_ttl() -> i64 {
    864_000 // 10 days
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_secret: default_access_secret(),
            refresh_secret: default_refresh_secret(),
            access_ttl_secs: default_access_ttl(),
            refresh_ttl_secs: default_refresh_ttl(),
        }
    }
}

/// Attributes applied to the session cookies written on login and
/// refresh and cleared on logout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CookieConfig {
    #[serde(default = "default_true")]
    pub http_only: bool,

    #[serde(default = "default_true")]
    pub secure: bool,

    #[serde(default = "default_same_site")]
    pub same_site: String,
}

fn default_true() -> bool {
    true
}

fn default_same_site() -> String {
    "Lax".to_string()
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            http_only: default_true(),
            secure: default_true(),
            same_site: default_same_site(),
        }
    }
}
