//! JWT claims structure shared by every token type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use campus_entity::user::UserRole;

/// JWT claims payload embedded in every token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user ID, or the invitation ID for invitation tokens.
    pub sub: Uuid,
    /// Role at the time of issuance. For invitations, the role being offered.
    pub role: UserRole,
    /// What the token may be used for.
    pub token_type: TokenType,
    /// Unique token ID. Two tokens issued in the same second still differ.
    pub jti: Uuid,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Not-before timestamp (seconds since epoch).
    pub nbf: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Session the token belongs to, for access, refresh and admin tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sid: Option<Uuid>,
}

/// Token type discriminant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    /// Short-lived token for API requests.
    Access,
    /// Long-lived token exchanged for a new pair.
    Refresh,
    /// Single-purpose token identifying an invitation.
    Invitation,
    /// Long-lived administrator token issued once at bootstrap.
    Admin,
}

impl Claims {
    /// Returns the subject ID.
    pub fn subject(&self) -> Uuid {
        self.sub
    }

    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }
}
