//! Auth handlers: login, refresh, logout, me.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use validator::Validate;

use campus_auth::AuthError;

use crate::dto::request::{LoginRequest, RefreshRequest};
use crate::dto::response::{
    ApiResponse, CountResponse, LoginResponse, MessageResponse, TokenPairResponse, UserResponse,
};
use crate::error::ApiError;
use crate::extractors::{AuthUser, MaybeAuthUser};
use crate::state::AppState;

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let Json(req) = payload?;
    req.validate()?;

    let result = state
        .session_manager
        .login(&req.username, &req.password)
        .await?;

    Ok(Json(ApiResponse::ok(LoginResponse {
        session_id: result.session.id,
        tokens: TokenPairResponse::from(result.tokens),
        user: UserResponse::from(&result.user),
    })))
}

/// POST /api/auth/refresh
///
/// The body carries the refresh token. An access token may accompany it, in
/// which case both must belong to the same identity.
pub async fn refresh(
    State(state): State<AppState>,
    auth: MaybeAuthUser,
    payload: Result<Json<RefreshRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<TokenPairResponse>>, ApiError> {
    let Json(req) = payload?;
    req.validate()?;

    let tokens = state
        .session_manager
        .refresh_for(&req.refresh_token, auth.principal().map(|p| p.subject_id))
        .await?;

    Ok(Json(ApiResponse::ok(TokenPairResponse::from(tokens))))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state
        .session_manager
        .logout(auth.subject_id, auth.session_id)
        .await?;

    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Logged out successfully",
    ))))
}

/// POST /api/auth/logout-all
pub async fn logout_all(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<CountResponse>>, ApiError> {
    let count = state.session_manager.logout_all(auth.subject_id).await?;

    Ok(Json(ApiResponse::ok(CountResponse {
        message: "All sessions terminated".to_string(),
        count,
    })))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let user = state
        .identities
        .find_identity_by_id(auth.subject_id)
        .await
        .map_err(AuthError::from)?
        .ok_or(AuthError::Unauthorized)?;

    Ok(Json(ApiResponse::ok(UserResponse::from(&user))))
}
