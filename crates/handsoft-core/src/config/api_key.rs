//! API-key gate configuration.

use serde::{Deserialize, Serialize};

/// Static API keys accepted on every `/api` route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKeyConfig {
    /// Request header carrying the key.
    #[serde(default = "default_header_name")]
    pub header_name: String,
    /// Accepted keys. Must not be empty.
    #[serde(default)]
    pub keys: Vec<String>,
}

impl Default for ApiKeyConfig {
    fn default() -> Self {
        Self {
            header_name: default_header_name(),
            keys: Vec::new(),
        }
    }
}

fn default_header_name() -> String {
    "X-API-Key".to_string()
}
