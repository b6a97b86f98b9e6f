//! Role, permission and user-role administration handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use handsoft_entity::rbac::{Permission, Role};
use handsoft_service::admin::PermissionAssignment;

use crate::dto::request::{
    CreatePermissionRequest, CreateRoleRequest, SetRolePermissionsRequest, SetUserRolesRequest,
    UpdateRoleRequest,
};
use crate::dto::response::UserRolesResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

// ── Roles ────────────────────────────────────────────────────────────

/// GET /api/admin/roles
pub async fn list_roles(State(state): State<AppState>) -> Result<Json<Vec<Role>>, ApiError> {
    Ok(Json(state.admin_service.list_roles().await?))
}

/// POST /api/admin/roles
pub async fn create_role(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateRoleRequest>,
) -> Result<(StatusCode, Json<Role>), ApiError> {
    let role = state.admin_service.create_role(&auth, req.into()).await?;
    Ok((StatusCode::CREATED, Json(role)))
}

/// PUT /api/admin/roles/{id}
pub async fn update_role(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateRoleRequest>,
) -> Result<Json<Role>, ApiError> {
    Ok(Json(state.admin_service.update_role(&auth, id, req.into()).await?))
}

/// DELETE /api/admin/roles/{id}
pub async fn delete_role(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.admin_service.delete_role(&auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/admin/roles/{id}/permissions
pub async fn role_permissions(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Permission>>, ApiError> {
    Ok(Json(state.admin_service.role_permissions(id).await?))
}

/// PUT /api/admin/roles/{id}/permissions
pub async fn set_role_permissions(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<SetRolePermissionsRequest>,
) -> Result<Json<PermissionAssignment>, ApiError> {
    let assignment = state
        .admin_service
        .set_role_permissions(&auth, id, &req.permission_codes)
        .await?;
    Ok(Json(assignment))
}

// ── Permissions ──────────────────────────────────────────────────────

/// GET /api/admin/permissions
pub async fn list_permissions(
    State(state): State<AppState>,
) -> Result<Json<Vec<Permission>>, ApiError> {
    Ok(Json(state.admin_service.list_permissions().await?))
}

/// POST /api/admin/permissions
pub async fn create_permission(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreatePermissionRequest>,
) -> Result<(StatusCode, Json<Permission>), ApiError> {
    let permission = state
        .admin_service
        .create_permission(&auth, &req.code, req.description.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(permission)))
}

/// DELETE /api/admin/permissions/{id}
pub async fn delete_permission(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.admin_service.delete_permission(&auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── User roles ───────────────────────────────────────────────────────

/// PUT /api/admin/users/{id}/roles
pub async fn set_user_roles(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<i64>,
    ValidatedJson(req): ValidatedJson<SetUserRolesRequest>,
) -> Result<Json<UserRolesResponse>, ApiError> {
    let roles = state
        .admin_service
        .set_user_roles(&auth, user_id, &req.role_names)
        .await?;
    Ok(Json(UserRolesResponse { user_id, roles }))
}
