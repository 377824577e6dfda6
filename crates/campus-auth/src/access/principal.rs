//! The authenticated caller attached to a request.

use serde::Serialize;
use uuid::Uuid;

use campus_entity::user::UserRole;

use crate::jwt::{Claims, TokenType};

/// Identity asserted by a verified bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    /// User ID from the token subject.
    pub subject_id: Uuid,
    /// Role at token issuance.
    pub role: UserRole,
    /// Which kind of token authenticated the request.
    pub token_type: TokenType,
    /// Session the token belongs to.
    pub session_id: Option<Uuid>,
}

impl Principal {
    /// Check if the principal is an admin.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl From<Claims> for Principal {
    fn from(claims: Claims) -> Self {
        Self {
            subject_id: claims.sub,
            role: claims.role,
            token_type: claims.token_type,
            session_id: claims.sid,
        }
    }
}
