//! Role repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use handsoft_core::error::{AppError, ErrorKind};
use handsoft_core::result::AppResult;
use handsoft_entity::rbac::{Permission, Role};

use crate::stores::{RbacStore, RoleChanges, RoleStore};

/// Postgres-backed roles and their permission links.
#[derive(Debug, Clone)]
pub struct RoleRepository {
    pool: PgPool,
}

impl RoleRepository {
    /// Create a new role repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a role by its unique name.
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find role", e))
    }

    /// Insert a role unless one with the same name exists, then make sure
    /// the super-admin flag matches. Returns the stored row.
    pub async fn ensure(&self, name: &str, is_super_admin: bool) -> AppResult<Role> {
        sqlx::query_as::<_, Role>(
            "INSERT INTO roles (name, is_super_admin) VALUES ($1, $2) \
             ON CONFLICT (name) DO UPDATE SET is_super_admin = EXCLUDED.is_super_admin \
             RETURNING *",
        )
        .bind(name)
        .bind(is_super_admin)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to ensure role", e))
    }

    /// Link a single permission to a role. Returns `false` when the link
    /// already existed.
    pub async fn grant(&self, role_id: i64, permission_id: i64) -> AppResult<bool> {
        sqlx::query(
            "INSERT INTO role_permissions (role_id, permission_id) VALUES ($1, $2) \
             ON CONFLICT DO NOTHING",
        )
        .bind(role_id)
        .bind(permission_id)
        .execute(&self.pool)
        .await
        .map(|r| r.rows_affected() > 0)
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to grant permission", e))
    }
}

#[async_trait]
impl RoleStore for RoleRepository {
    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        sqlx::query_as::<_, Role>("SELECT * FROM roles ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list roles", e))
    }

    async fn find_role(&self, role_id: i64) -> AppResult<Option<Role>> {
        sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE id = $1")
            .bind(role_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find role", e))
    }

    async fn create_role(
        &self,
        name: &str,
        description: &str,
        is_super_admin: bool,
    ) -> AppResult<Role> {
        sqlx::query_as::<_, Role>(
            "INSERT INTO roles (name, description, is_super_admin) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(name)
        .bind(description)
        .bind(is_super_admin)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| name_conflict(e, name, "Failed to create role"))
    }

    async fn update_role(&self, role_id: i64, changes: &RoleChanges) -> AppResult<Option<Role>> {
        let name = changes.name.as_deref().unwrap_or_default();
        sqlx::query_as::<_, Role>(
            "UPDATE roles SET \
             name = COALESCE($2, name), \
             description = COALESCE($3, description), \
             is_super_admin = COALESCE($4, is_super_admin), \
             updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(role_id)
        .bind(changes.name.as_deref())
        .bind(changes.description.as_deref())
        .bind(changes.is_super_admin)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| name_conflict(e, name, "Failed to update role"))
    }

    async fn delete_role(&self, role_id: i64) -> AppResult<bool> {
        sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(role_id)
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected() > 0)
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete role", e))
    }

    async fn role_permissions(&self, role_id: i64) -> AppResult<Vec<Permission>> {
        sqlx::query_as::<_, Permission>(
            "SELECT p.* FROM permissions p \
             JOIN role_permissions rp ON rp.permission_id = p.id \
             WHERE rp.role_id = $1 ORDER BY p.code ASC",
        )
        .bind(role_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list role permissions", e)
        })
    }

    async fn replace_role_permissions(&self, role_id: i64, codes: &[String]) -> AppResult<u64> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        sqlx::query("DELETE FROM role_permissions WHERE role_id = $1")
            .bind(role_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to clear role permissions", e)
            })?;

        let assigned = sqlx::query(
            "INSERT INTO role_permissions (role_id, permission_id) \
             SELECT $1, id FROM permissions WHERE code = ANY($2)",
        )
        .bind(role_id)
        .bind(codes)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to link permissions", e))?
        .rows_affected();

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit permission replacement", e)
        })?;

        Ok(assigned)
    }
}

#[async_trait]
impl RbacStore for RoleRepository {
    async fn any_super_admin(&self, role_names: &[String]) -> AppResult<bool> {
        if role_names.is_empty() {
            return Ok(false);
        }
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM roles WHERE name = ANY($1) AND is_super_admin)",
        )
        .bind(role_names)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to resolve super-admin roles", e)
        })
    }

    async fn any_grants(&self, role_names: &[String], code: &str) -> AppResult<bool> {
        if role_names.is_empty() {
            return Ok(false);
        }
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(\
                SELECT 1 FROM roles r \
                JOIN role_permissions rp ON rp.role_id = r.id \
                JOIN permissions p ON p.id = rp.permission_id \
                WHERE r.name = ANY($1) AND p.code = $2)",
        )
        .bind(role_names)
        .bind(code)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to resolve permission", e))
    }
}

fn name_conflict(e: sqlx::Error, name: &str, context: &str) -> AppError {
    match e {
        sqlx::Error::Database(ref db_err) if db_err.constraint() == Some("roles_name_key") => {
            AppError::conflict(format!("Role '{name}' already exists"))
        }
        other => AppError::with_source(ErrorKind::Database, context.to_string(), other),
    }
}
