//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod api_key;
pub mod app;
pub mod auth;
pub mod database;
pub mod logging;

use serde::{Deserialize, Serialize};

pub use self::api_key::ApiKeyConfig;
pub use self::app::{CorsConfig, ServerConfig};
pub use self::auth::AuthConfig;
pub use self::database::DatabaseConfig;
pub use self::logging::LoggingConfig;

use crate::error::AppError;

/// Prefix of environment variables that override file settings.
const ENV_PREFIX: &str = "HANDSOFT";

/// One year.
const MAX_ACCESS_TTL_MINUTES: u64 = 365 * 24 * 60;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database connection settings.
    pub database: DatabaseConfig,
    /// Token and password settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// API-key gate settings.
    #[serde(default)]
    pub api_key: ApiKeyConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from `config/default.toml`.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `HANDSOFT__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        Self::load_from("config/default", env)
    }

    /// Load configuration starting from an explicit base file.
    ///
    /// The overlay `config/{env}` is looked up next to the working
    /// directory, not next to `base`.
    pub fn load_from(base: &str, env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(base).required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("api_key.keys")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the server cannot safely run with.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.api_key.keys.iter().all(|k| k.trim().is_empty()) {
            return Err(AppError::configuration(
                "api_key.keys must contain at least one non-empty key",
            ));
        }
        if self.auth.jwt_secret.is_empty() {
            return Err(AppError::configuration("auth.jwt_secret must not be empty"));
        }
        if !(1..=MAX_ACCESS_TTL_MINUTES).contains(&self.auth.access_ttl_minutes) {
            return Err(AppError::configuration(format!(
                "auth.access_ttl_minutes must be between 1 and {MAX_ACCESS_TTL_MINUTES}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml: &str) -> AppConfig {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults_fill_missing_sections() {
        let cfg = parse(
            r#"
            [database]
            url = "postgres://localhost/handsoft"

            [api_key]
            keys = ["k1"]
            "#,
        );

        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.auth.jwt_issuer, "handsoft-api");
        assert_eq!(cfg.auth.access_ttl_minutes, 24 * 60);
        assert_eq!(cfg.api_key.header_name, "X-API-Key");
        assert_eq!(cfg.auth.super_admin_role, "super_admin");
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_validate_requires_api_keys() {
        let cfg = parse(
            r#"
            [database]
            url = "postgres://localhost/handsoft"
            "#,
        );

        let err = cfg.validate().unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::Configuration);
    }
}
