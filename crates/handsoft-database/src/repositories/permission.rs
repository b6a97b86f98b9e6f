//! Permission repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use handsoft_core::error::{AppError, ErrorKind};
use handsoft_core::result::AppResult;
use handsoft_entity::rbac::Permission;

use crate::stores::PermissionStore;

/// Postgres-backed permission catalogue.
#[derive(Debug, Clone)]
pub struct PermissionRepository {
    pool: PgPool,
}

impl PermissionRepository {
    /// Create a new permission repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a permission by its unique code.
    pub async fn find_by_code(&self, code: &str) -> AppResult<Option<Permission>> {
        sqlx::query_as::<_, Permission>("SELECT * FROM permissions WHERE code = $1")
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find permission", e))
    }

    /// Insert a permission unless the code exists. Returns the stored row.
    pub async fn ensure(&self, code: &str) -> AppResult<Permission> {
        sqlx::query("INSERT INTO permissions (code) VALUES ($1) ON CONFLICT (code) DO NOTHING")
            .bind(code)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to ensure permission", e))?;

        self.find_by_code(code)
            .await?
            .ok_or_else(|| AppError::internal(format!("Permission '{code}' missing after insert")))
    }
}

#[async_trait]
impl PermissionStore for PermissionRepository {
    async fn list_permissions(&self) -> AppResult<Vec<Permission>> {
        sqlx::query_as::<_, Permission>("SELECT * FROM permissions ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list permissions", e))
    }

    async fn create_permission(&self, code: &str, description: &str) -> AppResult<Permission> {
        sqlx::query_as::<_, Permission>(
            "INSERT INTO permissions (code, description) VALUES ($1, $2) RETURNING *",
        )
        .bind(code)
        .bind(description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("permissions_code_key") =>
            {
                AppError::conflict(format!("Permission '{code}' already exists"))
            }
            other => AppError::with_source(ErrorKind::Database, "Failed to create permission", other),
        })
    }

    /// Role links are removed by the foreign key cascade.
    async fn delete_permission(&self, permission_id: i64) -> AppResult<bool> {
        sqlx::query("DELETE FROM permissions WHERE id = $1")
            .bind(permission_id)
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected() > 0)
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete permission", e))
    }
}
