//! Bootstrap handler.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use validator::Validate;

use campus_auth::AdminCredentials;

use crate::dto::request::BootstrapRequest;
use crate::dto::response::{ApiResponse, BootstrapResponse, TokenPairResponse, UserResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/bootstrap/init
pub async fn init(
    State(state): State<AppState>,
    payload: Result<Json<BootstrapRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<BootstrapResponse>>), ApiError> {
    let Json(req) = payload?;
    req.validate()?;

    let result = state
        .bootstrap_service
        .init(AdminCredentials {
            username: req.username,
            password: req.password,
            email: req.email,
        })
        .await?;

    let response = BootstrapResponse {
        user: UserResponse::from(&result.user),
        admin_token: result.admin_token.token,
        admin_token_expires_at: result.admin_token.expires_at,
        session_id: result.session.id,
        tokens: TokenPairResponse::from(result.tokens),
        certificate: result.certificate,
        key_directory: result
            .key_directory
            .map(|dir| dir.to_string_lossy().into_owned()),
    };

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(response))))
}
