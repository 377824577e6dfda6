//! Authentication and authorization decisions.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use campus_entity::user::UserRole;

use super::principal::Principal;
use crate::error::AuthError;
use crate::jwt::{TokenType, TokenVerifier, peek_subject};

/// Verifies bearer tokens into [`Principal`]s.
#[derive(Clone)]
pub struct AccessControl {
    verifier: Arc<dyn TokenVerifier>,
}

impl std::fmt::Debug for AccessControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessControl").finish_non_exhaustive()
    }
}

impl AccessControl {
    /// Creates access control over a token verifier.
    pub fn new(verifier: Arc<dyn TokenVerifier>) -> Self {
        Self { verifier }
    }

    /// Requires a valid bearer token of one of the expected types.
    ///
    /// Every failure is reported as the same [`AuthError::Unauthorized`].
    pub fn require_auth(
        &self,
        bearer: Option<&str>,
        expected: &[TokenType],
    ) -> Result<Principal, AuthError> {
        let token = bearer.ok_or(AuthError::Unauthorized)?;
        let claims = self.verifier.verify(token, expected).map_err(|e| {
            debug!(reason = %e, claimed_subject = ?peek_subject(token), "Bearer token rejected");
            AuthError::Unauthorized
        })?;
        Ok(Principal::from(claims))
    }

    /// Like [`Self::require_auth`], but yields `None` instead of failing.
    pub fn optional_auth(&self, bearer: Option<&str>, expected: &[TokenType]) -> Option<Principal> {
        self.require_auth(bearer, expected).ok()
    }
}

/// Requires the principal's role to be at least `minimum`.
///
/// Admin > Teacher > Student. No principal is unauthorized, an insufficient
/// role is forbidden.
pub fn require_role(
    principal: Option<&Principal>,
    minimum: UserRole,
) -> Result<&Principal, AuthError> {
    let principal = principal.ok_or(AuthError::Unauthorized)?;
    if principal.role.satisfies(minimum) {
        Ok(principal)
    } else {
        Err(AuthError::Forbidden)
    }
}

/// Requires the principal to own `owner_id`, or to be an admin.
pub fn require_ownership(
    principal: Option<&Principal>,
    owner_id: Uuid,
) -> Result<&Principal, AuthError> {
    let principal = principal.ok_or(AuthError::Unauthorized)?;
    if principal.is_admin() || principal.subject_id == owner_id {
        Ok(principal)
    } else {
        Err(AuthError::Forbidden)
    }
}
