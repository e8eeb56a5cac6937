use axum::Json;
use axum::extract::State;
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::profiles::model::{Profile, UpdateProfileDto};
use crate::modules::profiles::service::ProfileService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

/// Get the authenticated caller's profile
#[utoipa::path(
    get,
    path = "/api/auth/profile",
    responses(
        (status = 200, description = "The caller's profile", body = Profile),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Profile"
)]
#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Profile>, AppError> {
    let profile = ProfileService::get_by_user_id(&state.db, auth_user.user_id()?).await?;
    Ok(Json(profile))
}

/// Partially update the authenticated caller's profile
///
/// Only `role`, `phone`, `avatar_url`, and `is_active` are writable;
/// `email`, names, and identifiers in the body are ignored.
#[utoipa::path(
    put,
    path = "/api/auth/profile/update",
    request_body = UpdateProfileDto,
    responses(
        (status = 200, description = "Updated profile", body = Profile),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Profile"
)]
#[instrument(skip(state, dto))]
pub async fn update_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<UpdateProfileDto>,
) -> Result<Json<Profile>, AppError> {
    let profile = ProfileService::update(&state.db, auth_user.user_id()?, dto).await?;
    Ok(Json(profile))
}
