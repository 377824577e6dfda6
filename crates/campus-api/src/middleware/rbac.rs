//! Role and ownership checks for handlers.

use uuid::Uuid;

use campus_entity::user::UserRole;

use crate::error::ApiError;
use crate::extractors::AuthUser;

/// Checks that the authenticated user has the Admin role.
pub fn require_admin(auth: &AuthUser) -> Result<(), ApiError> {
    campus_auth::require_role(Some(auth.principal()), UserRole::Admin)?;
    Ok(())
}

/// Checks that the authenticated user is `owner_id`, or an admin.
pub fn require_owner(auth: &AuthUser, owner_id: Uuid) -> Result<(), ApiError> {
    campus_auth::require_ownership(Some(auth.principal()), owner_id)?;
    Ok(())
}
