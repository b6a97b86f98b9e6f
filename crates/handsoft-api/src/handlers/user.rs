//! User self-service handlers.

use axum::Json;
use axum::extract::State;

use crate::dto::response::ProfileResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/users/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = state.user_service.profile(&auth).await?;
    Ok(Json(profile.into()))
}
