//! Handsoft server
//!
//! Main entry point: loads configuration, initializes logging, connects to
//! PostgreSQL, applies migrations and serves the HTTP API.

use tracing_subscriber::{EnvFilter, fmt};

use handsoft_core::config::AppConfig;
use handsoft_core::error::AppError;
use handsoft_database::DatabasePool;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Load configuration from file and environment.
///
/// `HANDSOFT_CONFIG` names the base file (default `config/default`) and
/// `HANDSOFT_ENV` the overlay (default `development`).
fn load_configuration() -> Result<AppConfig, AppError> {
    let base = std::env::var("HANDSOFT_CONFIG").unwrap_or_else(|_| "config/default".to_string());
    let env = std::env::var("HANDSOFT_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load_from(&base, &env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Handsoft v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    tracing::info!("Connecting to database...");
    let db = DatabasePool::connect(&config.database).await?;

    handsoft_database::migration::run_migrations(db.pool()).await?;
    tracing::info!("Database migrations complete");

    // ── Step 2: Serve until shutdown ─────────────────────────────
    handsoft_api::run_server(config, db.pool().clone()).await?;

    db.close().await;
    tracing::info!("Handsoft server shut down gracefully");
    Ok(())
}
