//! Session lifecycle manager: login, logout and refresh token flows.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use campus_database::{IdentityStore, SessionStore};
use campus_entity::session::{Session, TokenPair};
use campus_entity::user::User;

use super::prepare::prepare_session;
use crate::error::AuthError;
use crate::fingerprint::fingerprint;
use crate::jwt::{JwtDecoder, JwtEncoder, TokenType, peek_subject};
use crate::password::PasswordHasher;

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginResult {
    /// Generated token pair.
    pub tokens: TokenPair,
    /// Created session.
    pub session: Session,
    /// The authenticated user.
    pub user: User,
}

/// Manages the complete session lifecycle.
#[derive(Clone)]
pub struct SessionManager {
    /// Token issuance.
    jwt_encoder: Arc<JwtEncoder>,
    /// Token verification.
    jwt_decoder: Arc<JwtDecoder>,
    /// Identity lookup.
    identities: Arc<dyn IdentityStore>,
    /// Session persistence.
    sessions: Arc<dyn SessionStore>,
    /// Password verification.
    password_hasher: PasswordHasher,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("jwt_encoder", &self.jwt_encoder)
            .finish()
    }
}

impl SessionManager {
    /// Creates a new session manager with all required dependencies.
    pub fn new(
        jwt_encoder: Arc<JwtEncoder>,
        jwt_decoder: Arc<JwtDecoder>,
        identities: Arc<dyn IdentityStore>,
        sessions: Arc<dyn SessionStore>,
        password_hasher: PasswordHasher,
    ) -> Self {
        Self {
            jwt_encoder,
            jwt_decoder,
            identities,
            sessions,
            password_hasher,
        }
    }

    /// Performs the login flow:
    ///
    /// 1. Find the user (an unknown name still costs one hash verification)
    /// 2. Verify the password
    /// 3. Reject inactive accounts
    /// 4. Create the session and its token pair
    /// 5. Record the login time
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResult, AuthError> {
        let Some(user) = self
            .identities
            .find_identity_by_username(username.trim())
            .await?
        else {
            self.password_hasher.verify_dummy_async(password).await;
            warn!("Login failed: unknown username");
            return Err(AuthError::InvalidCredentials);
        };

        match self
            .password_hasher
            .verify_password_async(password, &user.password_hash)
            .await
        {
            Ok(()) => {}
            Err(AuthError::Mismatch) => {
                warn!(user_id = %user.id, "Login failed: wrong password");
                return Err(AuthError::InvalidCredentials);
            }
            Err(e) => return Err(e),
        }

        // Only reported after a correct password, so it reveals nothing to guessers.
        if !user.can_login() {
            warn!(user_id = %user.id, "Login rejected: account inactive");
            return Err(AuthError::Inactive);
        }

        let prepared = prepare_session(&self.jwt_encoder, user.id, user.role)?;
        let session = self.sessions.create_session(prepared.record).await?;

        if let Err(e) = self.identities.touch_last_login(user.id, Utc::now()).await {
            error!(user_id = %user.id, error = %e, "Failed to record last login");
        }

        info!(user_id = %user.id, session_id = %session.id, "Login successful");

        Ok(LoginResult {
            tokens: prepared.tokens,
            session,
            user,
        })
    }

    /// Exchanges a refresh token for a new pair, rotating its session.
    ///
    /// The presented token's session row is deleted in the same transaction
    /// that creates the successor. A token whose row is gone (already
    /// rotated or logged out) fails without creating anything.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        self.refresh_for(refresh_token, None).await
    }

    /// Like [`Self::refresh`], but when the caller also presented an access
    /// token, the refresh token must belong to the same identity.
    pub async fn refresh_for(
        &self,
        refresh_token: &str,
        bearer: Option<Uuid>,
    ) -> Result<TokenPair, AuthError> {
        let claims = self
            .jwt_decoder
            .verify(refresh_token, &[TokenType::Refresh])
            .map_err(|e| {
                debug!(
                    reason = %e,
                    claimed_subject = ?peek_subject(refresh_token),
                    "Refresh token rejected"
                );
                AuthError::InvalidOrRevoked
            })?;

        if let Some(bearer) = bearer.filter(|b| *b != claims.sub) {
            warn!(
                user_id = %claims.sub,
                bearer_id = %bearer,
                "Refresh rejected: token belongs to another identity"
            );
            return Err(AuthError::InvalidOrRevoked);
        }

        let user = self
            .identities
            .find_identity_by_id(claims.sub)
            .await?
            .filter(User::can_login)
            .ok_or(AuthError::InvalidOrRevoked)?;

        let prepared = prepare_session(&self.jwt_encoder, user.id, user.role)?;
        let rotated = self
            .sessions
            .rotate_session(user.id, &fingerprint(refresh_token), prepared.record)
            .await?;

        match rotated {
            Some(session) => {
                info!(
                    user_id = %user.id,
                    previous_session_id = ?claims.sid,
                    session_id = %session.id,
                    "Token refreshed"
                );
                Ok(prepared.tokens)
            }
            None => {
                warn!(
                    user_id = %user.id,
                    session_id = ?claims.sid,
                    "Refresh rejected: session already rotated or revoked"
                );
                Err(AuthError::InvalidOrRevoked)
            }
        }
    }

    /// Deletes the given session of the user. Idempotent.
    ///
    /// A token without a session id has nothing to delete.
    pub async fn logout(&self, user_id: Uuid, session_id: Option<Uuid>) -> Result<(), AuthError> {
        let Some(session_id) = session_id else {
            debug!(user_id = %user_id, "Logout without session id");
            return Ok(());
        };

        let removed = self.sessions.delete_session(user_id, session_id).await?;
        info!(user_id = %user_id, session_id = %session_id, removed, "Logout completed");
        Ok(())
    }

    /// Deletes every session of the user. Idempotent. Returns the count removed.
    pub async fn logout_all(&self, user_id: Uuid) -> Result<u64, AuthError> {
        let removed = self.sessions.delete_sessions_for_identity(user_id).await?;
        info!(user_id = %user_id, removed, "All sessions terminated");
        Ok(removed)
    }
}
