//! Warehousing handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use handsoft_entity::warehouse::{Space, SpaceFloor, SpaceTree, Warehouse};
use handsoft_service::warehouse::WarehouseDetail;

use crate::dto::request::{
    CreateFloorRequest, CreateSpaceRequest, UpdateWarehouseConfigRequest, WarehouseRequest,
};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// POST /api/warehouse/spaces
pub async fn create_space(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateSpaceRequest>,
) -> Result<(StatusCode, Json<Space>), ApiError> {
    let space = state.warehouse_service.create_space(&auth, req.into()).await?;
    Ok((StatusCode::CREATED, Json(space)))
}

/// GET /api/warehouse/spaces
pub async fn list_spaces(State(state): State<AppState>) -> Result<Json<Vec<Space>>, ApiError> {
    Ok(Json(state.warehouse_service.list_spaces().await?))
}

/// GET /api/warehouse/spaces/{id}
pub async fn get_space(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<SpaceTree>, ApiError> {
    Ok(Json(state.warehouse_service.get_space(id).await?))
}

/// POST /api/warehouse/spaces/{id}/floors
pub async fn create_floor(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(space_id): Path<i64>,
    ValidatedJson(req): ValidatedJson<CreateFloorRequest>,
) -> Result<(StatusCode, Json<SpaceFloor>), ApiError> {
    let floor = state
        .warehouse_service
        .create_floor(&auth, space_id, req.number)
        .await?;
    Ok((StatusCode::CREATED, Json(floor)))
}

/// POST /api/warehouse/floors/{floor_id}/warehouses
pub async fn create_warehouse_in_floor(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(floor_id): Path<i64>,
    ValidatedJson(req): ValidatedJson<WarehouseRequest>,
) -> Result<(StatusCode, Json<Warehouse>), ApiError> {
    let warehouse = state
        .warehouse_service
        .create_warehouse_in_floor(&auth, floor_id, req.into())
        .await?;
    Ok((StatusCode::CREATED, Json(warehouse)))
}

/// PUT /api/warehouse/warehouses/{id}/config
pub async fn update_config(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateWarehouseConfigRequest>,
) -> Result<Json<Warehouse>, ApiError> {
    let warehouse = state
        .warehouse_service
        .update_config(&auth, id, req.into())
        .await?;
    Ok(Json(warehouse))
}

/// GET /api/warehouse/warehouses/{id}
pub async fn get_warehouse(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<WarehouseDetail>, ApiError> {
    Ok(Json(state.warehouse_service.get_warehouse(id).await?))
}
