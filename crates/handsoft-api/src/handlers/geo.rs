//! Geography lookup handlers.

use axum::Json;
use axum::extract::{Path, Query, State};

use handsoft_entity::geo::{City, Commune, CommuneDetail, Region};

use crate::dto::request::CommuneSearchQuery;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/geo/regions
pub async fn regions(State(state): State<AppState>) -> Result<Json<Vec<Region>>, ApiError> {
    Ok(Json(state.geo_service.regions().await?))
}

/// GET /api/geo/regions/{region_id}/cities
pub async fn cities(
    State(state): State<AppState>,
    Path(region_id): Path<i64>,
) -> Result<Json<Vec<City>>, ApiError> {
    Ok(Json(state.geo_service.cities(region_id).await?))
}

/// GET /api/geo/cities/{city_id}/communes
pub async fn communes(
    State(state): State<AppState>,
    Path(city_id): Path<i64>,
) -> Result<Json<Vec<Commune>>, ApiError> {
    Ok(Json(state.geo_service.communes(city_id).await?))
}

/// GET /api/geo/communes?search=
pub async fn search_communes(
    State(state): State<AppState>,
    Query(query): Query<CommuneSearchQuery>,
) -> Result<Json<Vec<Commune>>, ApiError> {
    Ok(Json(state.geo_service.search(&query.search).await?))
}

/// GET /api/geo/communes/{commune_id}
pub async fn commune(
    State(state): State<AppState>,
    Path(commune_id): Path<i64>,
) -> Result<Json<CommuneDetail>, ApiError> {
    Ok(Json(state.geo_service.commune(commune_id).await?))
}
