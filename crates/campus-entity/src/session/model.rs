//! Session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A refresh session.
///
/// Created on login, bootstrap and invitation completion. Rotated on every
/// refresh and deleted on logout. Only the fingerprint of the refresh token
/// is stored.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    /// Unique session identifier, carried in the `sid` claim.
    pub id: Uuid,
    /// The user this session belongs to.
    pub user_id: Uuid,
    /// SHA-256 hex digest of the refresh token.
    #[serde(skip_serializing, default)]
    pub refresh_token_hash: String,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
    /// When the session expires (absolute timeout).
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Check whether the session has expired.
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

/// Data required to create a new session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSession {
    /// Pre-generated session ID matching the `sid` of the issued tokens.
    pub id: Uuid,
    /// The user this session belongs to.
    pub user_id: Uuid,
    /// SHA-256 hex digest of the refresh token.
    pub refresh_token_hash: String,
    /// When the session expires.
    pub expires_at: DateTime<Utc>,
}

impl CreateSession {
    /// Materialize the row this request would produce, as of `now`.
    pub fn into_session(self, now: DateTime<Utc>) -> Session {
        Session {
            id: self.id,
            user_id: self.user_id,
            refresh_token_hash: self.refresh_token_hash,
            created_at: now,
            expires_at: self.expires_at,
        }
    }
}
