//! Route definitions for the Campus API.
//!
//! All routes are mounted under `/api`. Authenticated groups carry their
//! own bearer token layer; handlers then apply role and ownership checks.

use axum::{
    Router, middleware as axum_middleware,
    routing::{delete, get, post},
};

use crate::handlers;
use crate::middleware::auth::{self, ACCESS_ONLY, AuthGuard, SIGNED_IN};
use crate::state::AppState;

/// Build the API router with the state applied to every route.
pub fn build_router(state: AppState) -> Router {
    let signed_in = AuthGuard::new(state.access.clone(), SIGNED_IN);
    let optional = AuthGuard::new(state.access.clone(), ACCESS_ONLY);

    let api_routes = Router::new()
        .merge(public_routes())
        .merge(refresh_routes(optional))
        .merge(session_routes(signed_in.clone()))
        .merge(admin_routes(signed_in.clone()))
        .merge(user_routes(signed_in));

    Router::new().nest("/api", api_routes).with_state(state)
}

/// Endpoints open to anonymous callers.
fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/bootstrap/init", post(handlers::bootstrap::init))
        .route("/auth/login", post(handlers::auth::login))
        .route("/invitations/{token}", get(handlers::invitation::fetch))
        .route(
            "/invitations/{token}/complete",
            post(handlers::invitation::complete),
        )
}

/// Refresh accepts, but does not require, an access token.
fn refresh_routes(guard: AuthGuard) -> Router<AppState> {
    Router::new()
        .route("/auth/refresh", post(handlers::auth::refresh))
        .route_layer(axum_middleware::from_fn_with_state(
            guard,
            auth::optional_auth,
        ))
}

/// Session endpoints for the signed-in caller.
fn session_routes(guard: AuthGuard) -> Router<AppState> {
    Router::new()
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/logout-all", post(handlers::auth::logout_all))
        .route("/auth/me", get(handlers::auth::me))
        .route_layer(axum_middleware::from_fn_with_state(
            guard,
            auth::require_auth,
        ))
}

/// Admin-only endpoints.
fn admin_routes(guard: AuthGuard) -> Router<AppState> {
    Router::new()
        .route("/admin/invitations", post(handlers::invitation::create))
        .route_layer(axum_middleware::from_fn_with_state(
            guard,
            auth::require_auth,
        ))
}

/// Per-user endpoints guarded by ownership.
fn user_routes(guard: AuthGuard) -> Router<AppState> {
    Router::new()
        .route("/users/{id}", get(handlers::user::get_user))
        .route("/users/{id}/sessions", delete(handlers::user::revoke_sessions))
        .route_layer(axum_middleware::from_fn_with_state(
            guard,
            auth::require_auth,
        ))
}
