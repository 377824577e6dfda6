//! User handlers guarded by ownership.

use axum::Json;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use uuid::Uuid;

use campus_auth::AuthError;

use crate::dto::response::{ApiResponse, CountResponse, UserResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::middleware::rbac::require_owner;
use crate::state::AppState;

/// GET /api/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    auth: AuthUser,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let Path(id) = path?;
    require_owner(&auth, id)?;

    let user = state
        .identities
        .find_identity_by_id(id)
        .await
        .map_err(AuthError::from)?
        .ok_or_else(|| ApiError(campus_core::AppError::not_found("User not found")))?;

    Ok(Json(ApiResponse::ok(UserResponse::from(&user))))
}

/// DELETE /api/users/{id}/sessions
pub async fn revoke_sessions(
    State(state): State<AppState>,
    auth: AuthUser,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<ApiResponse<CountResponse>>, ApiError> {
    let Path(id) = path?;
    require_owner(&auth, id)?;

    let count = state.session_manager.logout_all(id).await?;
    tracing::info!(user_id = %id, by = %auth.subject_id, count, "Sessions revoked");

    Ok(Json(ApiResponse::ok(CountResponse {
        message: "Sessions revoked".to_string(),
        count,
    })))
}
