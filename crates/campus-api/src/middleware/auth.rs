//! Bearer token middleware.
//!
//! The verified [`Principal`] is stored in the request extensions, where the
//! `AuthUser` and `MaybeAuthUser` extractors pick it up.

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::{Authorization, HeaderMapExt};

use campus_auth::{AccessControl, Principal, TokenType};

use crate::error::ApiError;

/// Token types accepted on routes used by signed-in identities.
pub const SIGNED_IN: &[TokenType] = &[TokenType::Access, TokenType::Admin];

/// Token types accepted where a bearer is optional.
pub const ACCESS_ONLY: &[TokenType] = &[TokenType::Access];

/// Which tokens a group of routes accepts.
#[derive(Debug, Clone)]
pub struct AuthGuard {
    /// Verifier.
    pub access: AccessControl,
    /// Accepted token types.
    pub expected: &'static [TokenType],
}

impl AuthGuard {
    /// Creates a guard over the given verifier.
    pub fn new(access: AccessControl, expected: &'static [TokenType]) -> Self {
        Self { access, expected }
    }
}

/// Extracts the raw bearer token, if the header is present and well formed.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .typed_get::<Authorization<Bearer>>()
        .map(|Authorization(bearer)| bearer.token().to_string())
}

/// Rejects the request with 401 unless it carries a valid bearer token.
pub async fn require_auth(
    State(guard): State<AuthGuard>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let bearer = bearer_token(request.headers());
    let principal = guard
        .access
        .require_auth(bearer.as_deref(), guard.expected)?;

    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

/// Attaches the principal when a valid bearer token is present and
/// continues anonymously otherwise.
pub async fn optional_auth(
    State(guard): State<AuthGuard>,
    mut request: Request,
    next: Next,
) -> Response {
    let bearer = bearer_token(request.headers());
    if let Some(principal) = guard
        .access
        .optional_auth(bearer.as_deref(), guard.expected)
    {
        request.extensions_mut().insert::<Principal>(principal);
    }
    next.run(request).await
}
