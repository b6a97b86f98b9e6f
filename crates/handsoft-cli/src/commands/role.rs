//! Role and permission management commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use handsoft_core::config::AppConfig;
use handsoft_core::error::AppError;
use handsoft_database::repositories::permission::PermissionRepository;
use handsoft_database::repositories::role::RoleRepository;
use handsoft_database::stores::RoleStore;
use handsoft_entity::rbac::{Permission, PermissionCode, Role};

use crate::output::{self, OutputFormat};

/// Arguments for role commands
#[derive(Debug, Args)]
pub struct RoleArgs {
    /// Role subcommand
    #[command(subcommand)]
    pub command: RoleCommand,
}

/// Role subcommands
#[derive(Debug, Subcommand)]
pub enum RoleCommand {
    /// List all roles
    List,
    /// Create a role, or update its super-admin flag if it exists
    Ensure {
        /// Role name
        #[arg(short, long)]
        name: String,
        /// Mark the role as super-admin
        #[arg(long)]
        super_admin: bool,
    },
    /// Grant a permission code to a role, creating the permission if needed
    Grant {
        /// Role name
        #[arg(short, long)]
        role: String,
        /// Permission code, `module:action` or `module:*`
        #[arg(short, long)]
        permission: String,
    },
    /// List the permissions granted to a role
    Permissions {
        /// Role name
        #[arg(short, long)]
        role: String,
    },
}

#[derive(Debug, Serialize, Tabled)]
struct RoleRow {
    id: i64,
    name: String,
    super_admin: bool,
    description: String,
}

impl From<Role> for RoleRow {
    fn from(r: Role) -> Self {
        Self {
            id: r.id,
            name: r.name,
            super_admin: r.is_super_admin,
            description: r.description,
        }
    }
}

#[derive(Debug, Serialize, Tabled)]
struct PermissionRow {
    id: i64,
    code: String,
    description: String,
}

impl From<Permission> for PermissionRow {
    fn from(p: Permission) -> Self {
        Self {
            id: p.id,
            code: p.code,
            description: p.description,
        }
    }
}

/// Execute role commands
pub async fn execute(
    args: &RoleArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let pool = super::create_db_pool(config).await?;
    let roles = RoleRepository::new(pool.clone());

    match &args.command {
        RoleCommand::List => {
            let rows: Vec<RoleRow> = roles
                .list_roles()
                .await?
                .into_iter()
                .map(Into::into)
                .collect();
            format.print(&rows)?;
        }
        RoleCommand::Ensure { name, super_admin } => {
            let name = name.trim();
            if name.is_empty() {
                return Err(AppError::validation("Role name must not be empty"));
            }
            let role = roles.ensure(name, *super_admin).await?;
            output::Notice::Done.emit(&format!("Role '{}' ready (id: {})", role.name, role.id));
        }
        RoleCommand::Grant { role, permission } => {
            let code: PermissionCode = permission.trim().parse()?;
            let role = roles
                .find_by_name(role.trim())
                .await?
                .ok_or_else(|| AppError::not_found(format!("Role '{}' not found", role.trim())))?;

            let permission = PermissionRepository::new(pool.clone())
                .ensure(&code.to_string())
                .await?;

            if roles.grant(role.id, permission.id).await? {
                let scope = if code.is_wildcard() {
                    format!(" (every '{}' action)", code.module())
                } else {
                    String::new()
                };
                output::Notice::Done.emit(&format!(
                    "Granted '{}'{scope} to role '{}'",
                    permission.code, role.name
                ));
            } else {
                output::Notice::Warn.emit(&format!(
                    "Role '{}' already has '{}'",
                    role.name, permission.code
                ));
            }
        }
        RoleCommand::Permissions { role } => {
            let role = roles
                .find_by_name(role.trim())
                .await?
                .ok_or_else(|| AppError::not_found(format!("Role '{}' not found", role.trim())))?;
            let rows: Vec<PermissionRow> = roles
                .role_permissions(role.id)
                .await?
                .into_iter()
                .map(Into::into)
                .collect();
            format.print(&rows)?;
        }
    }

    pool.close().await;
    Ok(())
}
