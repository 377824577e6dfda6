//! Invitation handlers.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use validator::Validate;

use campus_auth::InvitationSummary;

use crate::dto::request::{CompleteInvitationRequest, CreateInvitationRequest};
use crate::dto::response::{
    ApiResponse, InvitationResponse, LoginResponse, TokenPairResponse, UserResponse,
};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::middleware::rbac::require_admin;
use crate::state::AppState;

/// POST /api/admin/invitations
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<CreateInvitationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<InvitationResponse>>), ApiError> {
    require_admin(&auth)?;

    let Json(req) = payload?;
    req.validate()?;

    let issued = state
        .invitation_service
        .create(
            auth.subject_id,
            &req.email,
            req.role,
            req.teacher_ref.as_deref(),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(InvitationResponse::from(issued))),
    ))
}

/// GET /api/invitations/{token}
pub async fn fetch(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<ApiResponse<InvitationSummary>>, ApiError> {
    let summary = state.invitation_service.fetch(&token).await?;
    Ok(Json(ApiResponse::ok(summary)))
}

/// POST /api/invitations/{token}/complete
pub async fn complete(
    State(state): State<AppState>,
    Path(token): Path<String>,
    payload: Result<Json<CompleteInvitationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<LoginResponse>>), ApiError> {
    let Json(req) = payload?;
    req.validate()?;

    let result = state
        .invitation_service
        .complete(&token, &req.username, &req.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(LoginResponse {
            session_id: result.session.id,
            tokens: TokenPairResponse::from(result.tokens),
            user: UserResponse::from(&result.user),
        })),
    ))
}
