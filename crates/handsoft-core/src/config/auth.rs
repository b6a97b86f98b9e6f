//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Token signing and credential policy configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for JWT signing (HMAC-SHA256).
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Value of the `iss` claim; tokens with any other issuer are rejected.
    #[serde(default = "default_jwt_issuer")]
    pub jwt_issuer: String,
    /// Access token TTL in minutes.
    #[serde(default = "default_access_ttl")]
    pub access_ttl_minutes: u64,
    /// Minimum password length.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// Maximum password length.
    #[serde(default = "default_password_max")]
    pub password_max_length: usize,
    /// Role assigned to every newly registered user.
    #[serde(default = "default_role")]
    pub default_role: String,
    /// Role name that grants access to the administration routes.
    #[serde(default = "default_super_admin_role")]
    pub super_admin_role: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            jwt_issuer: default_jwt_issuer(),
            access_ttl_minutes: default_access_ttl(),
            password_min_length: default_password_min(),
            password_max_length: default_password_max(),
            default_role: default_role(),
            super_admin_role: default_super_admin_role(),
        }
    }
}

fn default_jwt_secret() -> String {
    "dev-secret-change-me".to_string()
}

fn default_jwt_issuer() -> String {
    "handsoft-api".to_string()
}

fn default_access_ttl() -> u64 {
    24 * 60
}

fn default_password_min() -> usize {
    8
}

fn default_password_max() -> usize {
    72
}

fn default_role() -> String {
    "user".to_string()
}

fn default_super_admin_role() -> String {
    "super_admin".to_string()
}
