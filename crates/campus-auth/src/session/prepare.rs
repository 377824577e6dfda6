//! Building a session row together with the tokens bound to it.

use uuid::Uuid;

use campus_entity::session::{CreateSession, TokenPair};
use campus_entity::user::UserRole;

use crate::error::AuthError;
use crate::fingerprint::fingerprint;
use crate::jwt::JwtEncoder;

/// A session row ready to insert, and the token pair it authorizes.
#[derive(Debug, Clone)]
pub struct PreparedSession {
    /// Row to insert. Its id is the `sid` of both tokens.
    pub record: CreateSession,
    /// Tokens carrying the new session id.
    pub tokens: TokenPair,
}

impl PreparedSession {
    /// The new session's id.
    pub fn session_id(&self) -> Uuid {
        self.record.id
    }
}

/// Issues a token pair for a new session and fingerprints its refresh token.
///
/// Used by login, refresh, bootstrap and invitation completion, so every
/// path stores sessions the same way.
pub fn prepare_session(
    encoder: &JwtEncoder,
    user_id: Uuid,
    role: UserRole,
) -> Result<PreparedSession, AuthError> {
    let session_id = Uuid::now_v7();
    let tokens = encoder.generate_token_pair(user_id, session_id, role)?;
    let record = CreateSession {
        id: session_id,
        user_id,
        refresh_token_hash: fingerprint(&tokens.refresh_token.token),
        expires_at: tokens.refresh_token.expires_at,
    };
    Ok(PreparedSession { record, tokens })
}
