//! HTTP listener and CORS settings.

use serde::{Deserialize, Serialize};

/// `[server]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

impl ServerConfig {
    /// `host:port` as passed to the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors: CorsConfig::default(),
        }
    }
}

/// `[server.cors]` table. A lone `"*"` entry in a list means "any".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<String>,
    /// The API key header has to be listed here for browser clients.
    pub allowed_headers: Vec<String>,
    /// Preflight cache lifetime.
    pub max_age_seconds: u64,
}

impl CorsConfig {
    pub fn any_origin(&self) -> bool {
        is_wildcard(&self.allowed_origins)
    }

    pub fn any_header(&self) -> bool {
        is_wildcard(&self.allowed_headers)
    }
}

fn is_wildcard(list: &[String]) -> bool {
    list.iter().any(|entry| entry.trim() == "*")
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: owned(&["http://localhost:3000"]),
            allowed_methods: owned(&["GET", "POST", "PUT", "DELETE", "OPTIONS"]),
            allowed_headers: owned(&["Content-Type", "Authorization", "X-API-Key"]),
            max_age_seconds: 3600,
        }
    }
}
