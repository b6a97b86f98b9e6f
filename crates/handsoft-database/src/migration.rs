//! Embedded schema migrations from the workspace `migrations/` directory.

use sqlx::PgPool;
use sqlx::migrate::Migrator;
use tracing::{debug, info};

use handsoft_core::error::{AppError, ErrorKind};
use handsoft_core::result::AppResult;

/// Migrations compiled into the binary.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Apply every migration not yet recorded in `_sqlx_migrations`.
pub async fn run_migrations(pool: &PgPool) -> AppResult<()> {
    let known = MIGRATOR.iter().count();
    debug!(known, "Applying schema migrations");

    MIGRATOR
        .run(pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Schema migration failed", e))?;

    info!(known, "Schema is up to date");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_migration_is_embedded() {
        let first = MIGRATOR.iter().next().unwrap();
        assert_eq!(first.version, 1);
        assert_eq!(first.description, "initial");
    }
}
