//! Administration of roles, permissions and role assignments.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use handsoft_core::error::AppError;
use handsoft_core::result::AppResult;
use handsoft_database::stores::{CredentialStore, PermissionStore, RoleChanges, RoleStore};
use handsoft_entity::rbac::{Permission, PermissionCode, Role};

use crate::context::RequestContext;

/// Data for a role about to be created.
#[derive(Debug, Clone, Default)]
pub struct NewRoleInput {
    pub name: String,
    pub description: Option<String>,
    pub is_super_admin: bool,
}

/// Outcome of replacing a role's permission set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PermissionAssignment {
    pub role_id: i64,
    /// Codes that matched an existing permission and are now linked.
    pub assigned: u64,
    /// Distinct codes in the request.
    pub requested: u64,
}

/// Manages the role/permission relation and user role sets.
#[derive(Clone)]
pub struct AdminService {
    roles: Arc<dyn RoleStore>,
    permissions: Arc<dyn PermissionStore>,
    credentials: Arc<dyn CredentialStore>,
}

impl std::fmt::Debug for AdminService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminService").finish_non_exhaustive()
    }
}

impl AdminService {
    /// Creates a new admin service.
    pub fn new(
        roles: Arc<dyn RoleStore>,
        permissions: Arc<dyn PermissionStore>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            roles,
            permissions,
            credentials,
        }
    }

    // ── Roles ────────────────────────────────────────────────────────

    pub async fn list_roles(&self) -> AppResult<Vec<Role>> {
        self.roles.list_roles().await
    }

    /// Create a role. The name is trimmed and must not be empty.
    pub async fn create_role(&self, ctx: &RequestContext, input: NewRoleInput) -> AppResult<Role> {
        let name = required_name(&input.name)?;
        let description = input.description.as_deref().map(str::trim).unwrap_or_default();

        let role = self
            .roles
            .create_role(name, description, input.is_super_admin)
            .await?;

        info!(
            admin_id = ctx.user_id,
            role_id = role.id,
            role = %role.name,
            is_super_admin = role.is_super_admin,
            "Role created"
        );
        Ok(role)
    }

    /// Partially update a role. A present name is trimmed and must not be
    /// empty.
    pub async fn update_role(
        &self,
        ctx: &RequestContext,
        role_id: i64,
        mut changes: RoleChanges,
    ) -> AppResult<Role> {
        if let Some(name) = changes.name.take() {
            changes.name = Some(required_name(&name)?.to_string());
        }
        if let Some(description) = changes.description.take() {
            changes.description = Some(description.trim().to_string());
        }

        let role = self
            .roles
            .update_role(role_id, &changes)
            .await?
            .ok_or_else(|| role_not_found(role_id))?;

        info!(admin_id = ctx.user_id, role_id, "Role updated");
        Ok(role)
    }

    /// Delete a role. Super-admin roles cannot be deleted.
    pub async fn delete_role(&self, ctx: &RequestContext, role_id: i64) -> AppResult<()> {
        let role = self
            .roles
            .find_role(role_id)
            .await?
            .ok_or_else(|| role_not_found(role_id))?;

        if role.is_super_admin {
            return Err(AppError::validation("Super-admin roles cannot be deleted"));
        }

        if !self.roles.delete_role(role_id).await? {
            return Err(role_not_found(role_id));
        }

        info!(admin_id = ctx.user_id, role_id, role = %role.name, "Role deleted");
        Ok(())
    }

    pub async fn role_permissions(&self, role_id: i64) -> AppResult<Vec<Permission>> {
        self.roles
            .find_role(role_id)
            .await?
            .ok_or_else(|| role_not_found(role_id))?;
        self.roles.role_permissions(role_id).await
    }

    /// Atomically replace the permissions of a role. Codes are trimmed and
    /// deduplicated; codes with no matching permission are ignored.
    pub async fn set_role_permissions(
        &self,
        ctx: &RequestContext,
        role_id: i64,
        codes: &[String],
    ) -> AppResult<PermissionAssignment> {
        self.roles
            .find_role(role_id)
            .await?
            .ok_or_else(|| role_not_found(role_id))?;

        let mut codes: Vec<String> = codes.iter().map(|c| c.trim().to_string()).collect();
        codes.sort();
        codes.dedup();

        let assigned = self.roles.replace_role_permissions(role_id, &codes).await?;

        info!(
            admin_id = ctx.user_id,
            role_id,
            assigned,
            requested = codes.len(),
            "Role permissions replaced"
        );

        Ok(PermissionAssignment {
            role_id,
            assigned,
            requested: codes.len() as u64,
        })
    }

    // ── Permissions ──────────────────────────────────────────────────

    pub async fn list_permissions(&self) -> AppResult<Vec<Permission>> {
        self.permissions.list_permissions().await
    }

    /// Create a permission. The code must be `module:action` or `module:*`.
    pub async fn create_permission(
        &self,
        ctx: &RequestContext,
        code: &str,
        description: Option<&str>,
    ) -> AppResult<Permission> {
        let code: PermissionCode = code.trim().parse()?;
        let permission = self
            .permissions
            .create_permission(&code.to_string(), description.map(str::trim).unwrap_or_default())
            .await?;

        info!(
            admin_id = ctx.user_id,
            permission = %permission.code,
            module = code.module(),
            wildcard = code.is_wildcard(),
            "Permission created"
        );
        Ok(permission)
    }

    pub async fn delete_permission(&self, ctx: &RequestContext, permission_id: i64) -> AppResult<()> {
        if !self.permissions.delete_permission(permission_id).await? {
            return Err(AppError::not_found(format!(
                "Permission {permission_id} not found"
            )));
        }
        info!(admin_id = ctx.user_id, permission_id, "Permission deleted");
        Ok(())
    }

    // ── User roles ───────────────────────────────────────────────────

    /// Atomically replace a user's roles. Returns the new role names.
    ///
    /// Tokens issued before the change keep their embedded roles until
    /// they expire.
    pub async fn set_user_roles(
        &self,
        ctx: &RequestContext,
        user_id: i64,
        role_names: &[String],
    ) -> AppResult<Vec<String>> {
        let mut names: Vec<String> = role_names.iter().map(|n| n.trim().to_string()).collect();
        names.sort();
        names.dedup();

        let roles = self.credentials.replace_roles(user_id, &names).await?;
        info!(admin_id = ctx.user_id, user_id, roles = ?roles, "User roles replaced");
        Ok(roles)
    }
}

fn required_name(name: &str) -> AppResult<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Role name is required"));
    }
    Ok(name)
}

fn role_not_found(role_id: i64) -> AppError {
    AppError::not_found(format!("Role {role_id} not found"))
}
