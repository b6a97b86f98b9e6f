//! CORS layer built from `[server.cors]`.

use std::str::FromStr;
use std::time::Duration;

use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

use handsoft_core::config::CorsConfig;

/// Entries that fail to parse are logged and skipped.
fn parse_all<T: FromStr>(kind: &str, entries: &[String]) -> Vec<T> {
    entries
        .iter()
        .filter_map(|raw| match raw.trim().parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(kind, entry = %raw, "Ignoring unparseable CORS entry");
                None
            }
        })
        .collect()
}

pub fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods(parse_all::<Method>("method", &config.allowed_methods))
        .max_age(Duration::from_secs(config.max_age_seconds));

    let layer = if config.any_origin() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(parse_all::<HeaderValue>("origin", &config.allowed_origins))
    };

    if config.any_header() {
        layer.allow_headers(Any)
    } else {
        layer.allow_headers(parse_all::<HeaderName>("header", &config.allowed_headers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_skips_garbage() {
        let methods: Vec<Method> =
            parse_all("method", &["GET".to_string(), "bad method".to_string()]);
        assert_eq!(methods, vec![Method::GET]);

        let headers: Vec<HeaderName> = parse_all("header", &[" X-API-Key ".to_string()]);
        assert_eq!(headers[0].as_str(), "x-api-key");
    }

    #[test]
    fn test_wildcards_build() {
        let config = CorsConfig {
            allowed_origins: vec!["*".into()],
            allowed_headers: vec!["*".into()],
            ..CorsConfig::default()
        };
        let _ = build_cors_layer(&config);
        let _ = build_cors_layer(&CorsConfig::default());
    }
}
