//! Health check handler.

use axum::Json;
use axum::extract::State;

use crate::dto::response::{ApiResponse, HealthResponse};
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let database = match &state.database {
        Some(db) => match db.ping().await {
            Ok(()) => "connected",
            Err(_) => "unavailable",
        },
        None => "not_configured",
    };

    let status = if database == "unavailable" {
        "degraded"
    } else {
        "ok"
    };

    Json(ApiResponse::ok(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    }))
}
