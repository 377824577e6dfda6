//! `AuthUser` and `MaybeAuthUser` extractors.
//!
//! Both read the [`Principal`] placed in the request extensions by the
//! bearer token middleware; neither verifies tokens itself.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use campus_auth::{AuthError, Principal};

use crate::error::ApiError;

/// An authenticated caller. Rejects with 401 when no principal is attached.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Principal);

impl AuthUser {
    /// Returns the inner `Principal`.
    pub fn principal(&self) -> &Principal {
        &self.0
    }
}

impl std::ops::Deref for AuthUser {
    type Target = Principal;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| AuthError::Unauthorized.into())
    }
}

/// A caller that may or may not be authenticated.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<Principal>);

impl MaybeAuthUser {
    /// Returns the principal, if any.
    pub fn principal(&self) -> Option<&Principal> {
        self.0.as_ref()
    }
}

impl<S: Send + Sync> FromRequestParts<S> for MaybeAuthUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeAuthUser(parts.extensions.get::<Principal>().cloned()))
    }
}
